//! High-level API: discover installations and audit them.

use crate::Result;
use crate::acquire::ReferenceAcquirer;
use crate::config::AuditConfig;
use crate::core_check::CoreIntegrityChecker;
use crate::discovery::Installation;
use crate::discovery::find_installations;
use crate::fetch::Fetcher;
use crate::fetch::HttpFetcher;
use crate::plugin_check::PluginIntegrityChecker;
use crate::report::ComponentResult;
use crate::report::InstallationAudit;
use crate::report::ScanObserver;
use std::path::Path;
use tracing::info;

/// Entry point of the library.
///
/// Owns the configuration and the fetcher used to obtain reference
/// archives.
pub struct Auditor {
    config: AuditConfig,
    fetcher: Box<dyn Fetcher>,
}

impl Auditor {
    /// Creates an auditor downloading over HTTP.
    #[must_use]
    pub fn new(config: AuditConfig) -> Self {
        Self::with_fetcher(config, Box::new(HttpFetcher))
    }

    /// Creates an auditor with a custom fetcher.
    #[must_use]
    pub fn with_fetcher(config: AuditConfig, fetcher: Box<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Finds installations below `search_root`, see [`find_installations`].
    ///
    /// # Errors
    ///
    /// Returns `SearchRootNotFound` if `search_root` is not a directory.
    pub fn discover(
        &self,
        search_root: impl AsRef<Path>,
        max_depth: Option<usize>,
    ) -> Result<Vec<Installation>> {
        find_installations(search_root, max_depth)
    }

    /// Checks the core and every plugin of `installation`.
    ///
    /// Never fails as a whole: a component that cannot be checked is
    /// reported as such and the audit moves on.
    pub fn audit(
        &self,
        installation: &Installation,
        observer: &mut dyn ScanObserver,
    ) -> InstallationAudit {
        info!(
            root = %installation.root.display(),
            version = %installation.version,
            "auditing installation"
        );

        let acquirer = ReferenceAcquirer::new(&self.config, self.fetcher.as_ref());

        let core_outcome = CoreIntegrityChecker::new(&self.config, &acquirer).check(
            &installation.root,
            &installation.version,
            observer,
        );
        let core = ComponentResult::new(
            self.config.core_component.clone(),
            Some(installation.version.clone()),
            core_outcome,
        );

        let plugins = PluginIntegrityChecker::new(&self.config, &acquirer)
            .check(&installation.root, observer);

        InstallationAudit::new(installation.clone(), core, plugins)
    }
}

impl std::fmt::Debug for Auditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
