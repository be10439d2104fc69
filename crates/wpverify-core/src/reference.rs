//! Reference archives and read access to their entries.

use crate::IntegrityError;
use crate::Result;
use crate::digest::digest_reader;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use zip::ZipArchive;
use zip::result::ZipError;

/// A reference archive held in the cache.
///
/// Only archives returned by the acquirer are `verified`; checkers refuse
/// to compare against anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceArchive {
    /// Component name (`wordpress` or a plugin slug).
    pub component: String,

    /// Component version.
    pub version: String,

    /// Location of the zip archive in the cache.
    pub path: PathBuf,

    /// Whether the archive passed acquisition checks.
    pub verified: bool,
}

impl ReferenceArchive {
    /// Opens the archive for entry lookups.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceUnavailable` for an unverified archive and
    /// `ArchiveOpenFailure` if the file cannot be read as a zip archive.
    pub fn open(&self) -> Result<ReferenceReader> {
        if !self.verified {
            return Err(IntegrityError::ReferenceUnavailable {
                component: self.component.clone(),
                version: self.version.clone(),
                reason: "archive has not been verified".to_string(),
            });
        }
        ReferenceReader::open(&self.path)
    }
}

/// Opened zip view of a reference archive.
pub struct ReferenceReader {
    path: PathBuf,
    zip: ZipArchive<File>,
}

impl ReferenceReader {
    /// Opens the zip archive at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let open_failure = |reason: String| IntegrityError::ArchiveOpenFailure {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|e| open_failure(e.to_string()))?;
        let zip = ZipArchive::new(file).map_err(|e| open_failure(e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            zip,
        })
    }

    /// Returns the digest of the entry named `key`, or `None` when the
    /// archive has no such file.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveOpenFailure` if the entry exists but cannot be read.
    pub fn entry_digest(&mut self, key: &str) -> Result<Option<String>> {
        let mut entry = match self.zip.by_name(key) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(IntegrityError::ArchiveOpenFailure {
                    path: self.path.clone(),
                    reason: format!("{key}: {e}"),
                });
            }
        };
        if entry.is_dir() {
            return Ok(None);
        }
        let digest = digest_reader(&mut entry).map_err(|e| IntegrityError::ArchiveOpenFailure {
            path: self.path.clone(),
            reason: format!("{key}: {e}"),
        })?;
        Ok(Some(digest))
    }
}

impl std::fmt::Debug for ReferenceReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceReader")
            .field("path", &self.path)
            .field("entries", &self.zip.len())
            .finish()
    }
}
