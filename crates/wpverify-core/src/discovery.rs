//! Discovery of WordPress installations below a search root.
//!
//! An installation is recognised by its `wp-includes/version.php` marker,
//! which also declares the core release.

use crate::IntegrityError;
use crate::Result;
use crate::policy::normalize_relative;
use crate::version::core_version;
use crate::walker::FileWalker;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::warn;

const MARKER: &str = "wp-includes/version.php";

/// Marker depth below the installation root.
const MARKER_DEPTH: usize = 2;

/// A WordPress installation found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// Installation root (the directory holding `wp-includes`).
    pub root: PathBuf,
    /// Core release declared by the marker file.
    pub version: String,
}

/// Finds the installations below `search_root`.
///
/// `max_depth` bounds how many levels below `search_root` an installation
/// root may lie: `Some(0)` only considers `search_root` itself, `None`
/// searches the whole tree. Results are in walk order (sorted by name).
///
/// # Errors
///
/// Returns `SearchRootNotFound` if `search_root` is not a directory.
///
/// # Examples
///
/// ```no_run
/// use wpverify_core::find_installations;
///
/// # fn main() -> wpverify_core::Result<()> {
/// for installation in find_installations("/var/www", Some(2))? {
///     println!("{} {}", installation.root.display(), installation.version);
/// }
/// # Ok(())
/// # }
/// ```
pub fn find_installations(
    search_root: impl AsRef<Path>,
    max_depth: Option<usize>,
) -> Result<Vec<Installation>> {
    let search_root = search_root.as_ref();
    if !search_root.is_dir() {
        return Err(IntegrityError::SearchRootNotFound {
            path: search_root.to_path_buf(),
        });
    }

    let mut installations: Vec<Installation> = Vec::new();
    let walker = FileWalker::new(search_root)
        .extension("php")
        .max_depth_opt(max_depth.map(|depth| depth.saturating_add(MARKER_DEPTH)));

    for marker in walker.files() {
        let Some(relative) = normalize_relative(search_root, &marker) else {
            continue;
        };
        if relative != MARKER && !relative.ends_with(&format!("/{MARKER}")) {
            continue;
        }

        let Some(root) = marker.parent().and_then(Path::parent) else {
            continue;
        };
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

        let text = match std::fs::read(&marker) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(path = %marker.display(), error = %e, "cannot read version marker");
                continue;
            }
        };
        let Some(version) = core_version(&text) else {
            warn!(path = %marker.display(), "no core version in marker");
            continue;
        };

        if installations.iter().any(|found| found.root == root) {
            continue;
        }
        debug!(root = %root.display(), %version, "installation found");
        installations.push(Installation { root, version });
    }

    Ok(installations)
}
