//! Scan policies: which files are compared and under which archive key.
//!
//! Core and plugin checks differ only in their exclusion rules and in how a
//! relative path maps to an entry of the reference archive. Both operate on
//! normalized relative paths (forward slashes, no leading separator), never
//! on absolute paths.

use crate::config::AuditConfig;
use std::path::Path;

/// Exclusion predicate and archive key formatter for one component.
pub trait ScanPolicy {
    /// Returns `true` if the file must not be compared.
    fn is_excluded(&self, relative: &str) -> bool;

    /// Returns the archive entry name holding the reference of `relative`.
    fn archive_key(&self, relative: &str) -> String;
}

/// Converts `path` into a forward-slash path relative to `root`.
///
/// Returns `None` if `path` is not below `root`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use wpverify_core::policy::normalize_relative;
///
/// let rel = normalize_relative(Path::new("/srv/wp"), Path::new("/srv/wp/wp-admin/index.php"));
/// assert_eq!(rel.as_deref(), Some("wp-admin/index.php"));
/// ```
#[must_use]
pub fn normalize_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().replace('\\', "/"))
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Returns `true` if `relative` is `dir` itself or lies below it.
fn is_under(relative: &str, dir: &str) -> bool {
    let dir = dir.trim_end_matches('/');
    relative
        .strip_prefix(dir)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Policy of the core check.
///
/// Excludes the site configuration file, third-party themes, the plugins
/// subtree (checked separately) and the configured extra subtrees. Archive
/// keys are `<component>/<relative>`.
#[derive(Debug, Clone, Copy)]
pub struct CorePolicy<'a> {
    config: &'a AuditConfig,
}

impl<'a> CorePolicy<'a> {
    /// Creates the core policy from `config`.
    #[must_use]
    pub fn new(config: &'a AuditConfig) -> Self {
        Self { config }
    }
}

impl ScanPolicy for CorePolicy<'_> {
    fn is_excluded(&self, relative: &str) -> bool {
        let config = self.config;

        if relative == config.config_file {
            return true;
        }

        if is_under(relative, &config.themes_dir) {
            let themes = config.themes_dir.trim_end_matches('/');
            let is_default_theme = config
                .default_themes
                .iter()
                .any(|theme| is_under(relative, &format!("{themes}/{theme}")));
            if !is_default_theme {
                return true;
            }
        }

        if is_under(relative, &config.plugins_dir) {
            return true;
        }

        config
            .excluded_subtrees
            .iter()
            .any(|subtree| is_under(relative, subtree))
    }

    fn archive_key(&self, relative: &str) -> String {
        format!("{}/{relative}", self.config.core_component)
    }
}

/// Policy of a plugin check: nothing is excluded and archive keys are the
/// plugin slug followed by the path inside the plugin directory.
#[derive(Debug, Clone, Copy)]
pub struct PluginPolicy<'a> {
    name: &'a str,
}

impl<'a> PluginPolicy<'a> {
    /// Creates the policy of plugin `name`.
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }
}

impl ScanPolicy for PluginPolicy<'_> {
    fn is_excluded(&self, _relative: &str) -> bool {
        false
    }

    fn archive_key(&self, relative: &str) -> String {
        format!("{}/{relative}", self.name)
    }
}
