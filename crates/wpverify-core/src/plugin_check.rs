//! Integrity check of installed plugins.
//!
//! Every directory directly below `wp-content/plugins` is a plugin. Each one
//! is checked independently: a missing version header or an unavailable
//! archive only affects that plugin's result.

use crate::IntegrityError;
use crate::Result;
use crate::acquire::ReferenceAcquirer;
use crate::compare::FileDigestComparator;
use crate::config::AuditConfig;
use crate::policy::PluginPolicy;
use crate::report::ComponentResult;
use crate::report::IntegrityReport;
use crate::report::ScanObserver;
use crate::version::plugin_version;
use crate::walker::FileWalker;
use std::path::Path;
use tracing::info;
use tracing::warn;

/// An installed plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    /// Plugin slug (its directory name).
    pub name: String,
    /// Plugin directory.
    pub path: std::path::PathBuf,
    /// Version declared in the plugin header.
    pub version: Option<String>,
}

/// Compares each installed plugin with its published archive.
pub struct PluginIntegrityChecker<'a> {
    config: &'a AuditConfig,
    acquirer: &'a ReferenceAcquirer<'a>,
}

impl<'a> PluginIntegrityChecker<'a> {
    /// Creates a checker.
    #[must_use]
    pub fn new(config: &'a AuditConfig, acquirer: &'a ReferenceAcquirer<'a>) -> Self {
        Self { config, acquirer }
    }

    /// Lists the plugins installed below `root`, in directory name order.
    #[must_use]
    pub fn plugins(&self, root: &Path) -> Vec<Plugin> {
        FileWalker::new(root.join(&self.config.plugins_dir))
            .max_depth(1)
            .directories()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                let version = plugin_version(&path, &self.config.file_extension);
                Some(Plugin {
                    name,
                    path,
                    version,
                })
            })
            .collect()
    }

    /// Checks every plugin installed below `root`.
    ///
    /// Returns one result per plugin; failures never stop the scan.
    pub fn check(&self, root: &Path, observer: &mut dyn ScanObserver) -> Vec<ComponentResult> {
        self.plugins(root)
            .into_iter()
            .map(|plugin| {
                observer.on_component_start(&plugin.name);
                let outcome = self.check_plugin(&plugin, observer);
                observer.on_component_complete(&plugin.name);

                match &outcome {
                    Ok(report) => info!(
                        plugin = %plugin.name,
                        checked = report.files_checked,
                        problems = report.problems.len(),
                        "plugin check complete"
                    ),
                    Err(e) => warn!(plugin = %plugin.name, error = %e, "plugin not checked"),
                }
                ComponentResult::new(plugin.name, plugin.version, outcome)
            })
            .collect()
    }

    /// Checks a single plugin.
    ///
    /// # Errors
    ///
    /// Returns `VersionNotFound` if the plugin declares no version, and the
    /// acquisition or archive errors otherwise.
    pub fn check_plugin(
        &self,
        plugin: &Plugin,
        observer: &mut dyn ScanObserver,
    ) -> Result<IntegrityReport> {
        let version = plugin
            .version
            .as_deref()
            .ok_or_else(|| IntegrityError::VersionNotFound {
                path: plugin.path.clone(),
            })?;

        let reference = self.acquirer.acquire_plugin(&plugin.name, version)?;
        let mut reader = reference.open()?;

        let mut report = IntegrityReport::new(&plugin.name, version);
        FileDigestComparator::new(&mut reader, PluginPolicy::new(&plugin.name)).scan(
            &plugin.path,
            &self.config.file_extension,
            &mut report,
            observer,
        )?;
        Ok(report)
    }
}
