//! Error conversion utilities for CLI.
//!
//! Converts wpverify-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use wpverify_core::IntegrityError;

/// Converts `IntegrityError` to user-friendly anyhow error with context
pub fn convert_integrity_error(err: IntegrityError, search_root: &Path) -> anyhow::Error {
    match err {
        IntegrityError::SearchRootNotFound { path } => {
            anyhow!(
                "Search path not found: {}\n\
                 HINT: Pass the directory that contains your WordPress sites.",
                path.display()
            )
        }
        IntegrityError::Io(io_err) => {
            anyhow!(
                "I/O error while searching '{}': {}",
                search_root.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err).context(format!(
            "Error searching '{}'",
            search_root.display()
        )),
    }
}

/// Adds context to a discovery error
pub fn add_search_context<T>(
    result: Result<T, IntegrityError>,
    search_root: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_integrity_error(e, search_root))
}

/// Short guidance for a component that could not be checked
pub fn hint(err: &IntegrityError) -> Option<&'static str> {
    match err {
        IntegrityError::VersionNotFound { .. } => {
            Some("No 'Version:' header was found in the plugin's top-level files.")
        }
        IntegrityError::ReferenceUnavailable { .. } => {
            Some("The reference archive could not be fetched or verified; check the network.")
        }
        IntegrityError::ArchiveOpenFailure { .. } => {
            Some("The cached archive is unreadable; delete it to force a new download.")
        }
        IntegrityError::Io(_) | IntegrityError::SearchRootNotFound { .. } => None,
    }
}
