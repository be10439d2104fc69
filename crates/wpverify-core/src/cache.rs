//! On-disk cache of reference archives.
//!
//! Layout:
//!
//! ```text
//! <root>/<component>-<version>.zip
//! <root>/<component>-<version>.zip.md5
//! <root>/plugins/<name>.<version>.zip
//! ```
//!
//! Entries are written to a temporary file in the destination directory and
//! renamed into place, so a reader never observes a partially written file.

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Handle on the cache directory.
#[derive(Debug, Clone)]
pub struct ArchiveCache {
    root: PathBuf,
}

impl ArchiveCache {
    /// Creates a cache rooted at `root`. Nothing is created until a write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the cached core archive.
    pub fn core_archive_path(&self, component: &str, version: &str) -> io::Result<PathBuf> {
        validate_key(component)?;
        validate_key(version)?;
        Ok(self.root.join(format!("{component}-{version}.zip")))
    }

    /// Path of the cached core digest manifest.
    pub fn core_checksum_path(&self, component: &str, version: &str) -> io::Result<PathBuf> {
        validate_key(component)?;
        validate_key(version)?;
        Ok(self.root.join(format!("{component}-{version}.zip.md5")))
    }

    /// Path of the cached plugin archive.
    pub fn plugin_archive_path(&self, name: &str, version: &str) -> io::Result<PathBuf> {
        validate_key(name)?;
        validate_key(version)?;
        Ok(self.root.join("plugins").join(format!("{name}.{version}.zip")))
    }

    /// Atomically writes `data` to `path`, creating parent directories.
    pub fn store(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Removes a cached file; a missing file is not an error.
    pub fn remove(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Rejects key parts that would escape the cache directory.
fn validate_key(part: &str) -> io::Result<()> {
    if part.is_empty() || part == "." || part == ".." || part.contains(['/', '\\', '\0']) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid cache key component: {part:?}"),
        ));
    }
    Ok(())
}
