//! Digest comparison of local files against a reference archive.

use crate::IntegrityError;
use crate::Result;
use crate::digest::EMPTY_DIGEST;
use crate::digest::digest_file;
use crate::policy::ScanPolicy;
use crate::policy::normalize_relative;
use crate::reference::ReferenceReader;
use crate::report::IntegrityProblem;
use crate::report::IntegrityReport;
use crate::report::ProblemKind;
use crate::report::ScanObserver;
use crate::walker::FileWalker;
use std::path::Path;
use tracing::debug;
use tracing::warn;

/// Compares local files with the entries of an opened reference archive,
/// using `P` to exclude files and to name archive entries.
pub struct FileDigestComparator<'r, P: ScanPolicy> {
    reader: &'r mut ReferenceReader,
    policy: P,
}

impl<'r, P: ScanPolicy> FileDigestComparator<'r, P> {
    /// Creates a comparator reading from `reader`.
    pub fn new(reader: &'r mut ReferenceReader, policy: P) -> Self {
        Self { reader, policy }
    }

    /// Compares the file at `local`, known by its normalized `relative`
    /// path, with its reference entry.
    ///
    /// An empty local file without a reference entry matches, since both
    /// stand for "no content".
    ///
    /// # Errors
    ///
    /// Returns `Io` if the local file cannot be read and
    /// `ArchiveOpenFailure` if the reference entry cannot be read.
    pub fn compare(&mut self, local: &Path, relative: &str) -> Result<Option<IntegrityProblem>> {
        let local_digest = digest_file(local)?;
        let key = self.policy.archive_key(relative);
        let reference_digest = self.reader.entry_digest(&key)?;

        let expected = reference_digest.as_deref().unwrap_or(EMPTY_DIGEST);
        if local_digest == expected {
            return Ok(None);
        }

        let kind = if reference_digest.is_none() {
            ProblemKind::MissingInReference
        } else {
            ProblemKind::DigestMismatch
        };
        debug!(%key, ?kind, "integrity problem");
        Ok(Some(IntegrityProblem {
            path: local.to_path_buf(),
            relative: relative.to_string(),
            kind,
        }))
    }

    /// Compares every file with `extension` below `root`, recording
    /// problems in `report` in enumeration order.
    ///
    /// Files that cannot be read are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference archive becomes unreadable.
    pub fn scan(
        &mut self,
        root: &Path,
        extension: &str,
        report: &mut IntegrityReport,
        observer: &mut dyn ScanObserver,
    ) -> Result<()> {
        for path in FileWalker::new(root).extension(extension).files() {
            let Some(relative) = normalize_relative(root, &path) else {
                continue;
            };

            if self.policy.is_excluded(&relative) {
                report.files_excluded += 1;
                continue;
            }

            match self.compare(&path, &relative) {
                Ok(Some(problem)) => report.add_problem(problem),
                Ok(None) => {}
                Err(IntegrityError::Io(e)) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
                Err(e) => return Err(e),
            }

            report.files_checked += 1;
            observer.on_file_checked(&relative);
        }
        Ok(())
    }
}
