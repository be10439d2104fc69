//! Integrity check of the WordPress core files.

use crate::Result;
use crate::acquire::ReferenceAcquirer;
use crate::compare::FileDigestComparator;
use crate::config::AuditConfig;
use crate::policy::CorePolicy;
use crate::report::IntegrityReport;
use crate::report::ScanObserver;
use std::path::Path;
use tracing::info;
use tracing::warn;

/// Compares an installation's core files with the verified core archive.
///
/// The site configuration, third-party themes, plugins and the reserved
/// must-use subtree are excluded (see [`CorePolicy`]).
pub struct CoreIntegrityChecker<'a> {
    config: &'a AuditConfig,
    acquirer: &'a ReferenceAcquirer<'a>,
}

impl<'a> CoreIntegrityChecker<'a> {
    /// Creates a checker.
    #[must_use]
    pub fn new(config: &'a AuditConfig, acquirer: &'a ReferenceAcquirer<'a>) -> Self {
        Self { config, acquirer }
    }

    /// Checks the core files below `root` against release `version`.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceUnavailable` if no verified archive could be
    /// obtained and `ArchiveOpenFailure` if it cannot be read. No partial
    /// report is produced in either case.
    pub fn check(
        &self,
        root: &Path,
        version: &str,
        observer: &mut dyn ScanObserver,
    ) -> Result<IntegrityReport> {
        let component = self.config.core_component.as_str();
        observer.on_component_start(component);
        let outcome = self.compare_tree(root, version, observer);
        observer.on_component_complete(component);

        match &outcome {
            Ok(report) => info!(
                root = %root.display(),
                version,
                checked = report.files_checked,
                problems = report.problems.len(),
                "core check complete"
            ),
            Err(e) => warn!(root = %root.display(), version, error = %e, "core not checked"),
        }
        outcome
    }

    fn compare_tree(
        &self,
        root: &Path,
        version: &str,
        observer: &mut dyn ScanObserver,
    ) -> Result<IntegrityReport> {
        let reference = self.acquirer.acquire_core(version)?;
        let mut reader = reference.open()?;

        let mut report = IntegrityReport::new(&self.config.core_component, version);
        FileDigestComparator::new(&mut reader, CorePolicy::new(self.config)).scan(
            root,
            &self.config.file_extension,
            &mut report,
            observer,
        )?;
        Ok(report)
    }
}
