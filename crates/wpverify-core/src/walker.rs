//! Directory tree walking with filtering.
//!
//! Version-control directories, dot entries and unreadable directories are
//! skipped. Entries are yielded in file-name order within each directory so
//! repeated scans of an unchanged tree produce identical results.

use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use walkdir::DirEntry;
use walkdir::WalkDir;

/// Directory names used by version-control systems.
const VCS_DIRS: &[&str] = &[
    ".svn",
    "_svn",
    "CVS",
    "_darcs",
    ".arch-params",
    ".monotone",
    ".bzr",
    ".git",
    ".hg",
];

/// Walks a directory tree, yielding files or directories.
///
/// # Examples
///
/// ```no_run
/// use wpverify_core::walker::FileWalker;
///
/// for path in FileWalker::new("/var/www/html").extension("php").files() {
///     println!("{}", path.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileWalker {
    root: PathBuf,
    extension: Option<String>,
    max_depth: Option<usize>,
}

impl FileWalker {
    /// Creates a walker over everything below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: None,
            max_depth: None,
        }
    }

    /// Only yields files whose extension equals `extension`.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Limits the walk to `depth` levels below the root (1 = direct
    /// children).
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Same as [`max_depth`](Self::max_depth), accepting an optional bound.
    #[must_use]
    pub fn max_depth_opt(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Yields regular files (and symlinks resolving to files).
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.entries().filter_map(move |entry| {
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            (is_file && self.matches_extension(entry.path())).then(|| entry.into_path())
        })
    }

    /// Yields directories.
    pub fn directories(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.entries()
            .filter(|entry| entry.file_type().is_dir())
            .map(DirEntry::into_path)
    }

    fn entries(&self) -> impl Iterator<Item = DirEntry> + '_ {
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        walker
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    None
                }
            })
    }

    fn matches_extension(&self, path: &Path) -> bool {
        self.extension.as_deref().is_none_or(|wanted| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == wanted)
        })
    }
}

/// Checks if an entry is a dot entry or a version-control directory.
fn is_ignored(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| {
        name.starts_with('.') || (entry.file_type().is_dir() && VCS_DIRS.contains(&name))
    })
}
