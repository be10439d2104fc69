//! Error types for integrity verification.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `IntegrityError`.
pub type Result<T> = std::result::Result<T, IntegrityError>;

/// Errors that prevent a component from being checked.
///
/// Per-file findings are not errors; they are reported as
/// [`IntegrityProblem`](crate::IntegrityProblem) entries.
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The declared version of a component could not be determined.
    #[error("version not found in {path}")]
    VersionNotFound {
        /// The installation marker or plugin directory that was inspected.
        path: PathBuf,
    },

    /// The reference archive could not be downloaded or validated.
    #[error("reference archive unavailable for {component} {version}: {reason}")]
    ReferenceUnavailable {
        /// Component name (`wordpress` or a plugin slug).
        component: String,
        /// Requested component version.
        version: String,
        /// Why the last acquisition attempt failed.
        reason: String,
    },

    /// The reference archive exists but cannot be read as a zip archive.
    #[error("cannot open reference archive {path}: {reason}")]
    ArchiveOpenFailure {
        /// Path of the cached archive.
        path: PathBuf,
        /// Reason reported by the archive reader.
        reason: String,
    },

    /// The directory to search for installations does not exist.
    #[error("search root not found: {path}")]
    SearchRootNotFound {
        /// The path that was requested.
        path: PathBuf,
    },
}

impl IntegrityError {
    /// Returns `true` if the error means no trustworthy reference was
    /// available for comparison.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpverify_core::IntegrityError;
    ///
    /// let err = IntegrityError::ReferenceUnavailable {
    ///     component: "wordpress".into(),
    ///     version: "6.4.2".into(),
    ///     reason: "checksum mismatch".into(),
    /// };
    /// assert!(err.is_reference_failure());
    /// ```
    #[must_use]
    pub const fn is_reference_failure(&self) -> bool {
        matches!(
            self,
            Self::ReferenceUnavailable { .. } | Self::ArchiveOpenFailure { .. }
        )
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::ReferenceUnavailable { reason, .. } | Self::ArchiveOpenFailure { reason, .. } => {
                Some(reason)
            }
            _ => None,
        }
    }
}
