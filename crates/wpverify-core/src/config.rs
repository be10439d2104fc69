//! Audit configuration.

use std::path::PathBuf;

/// Default archive URL template for the core component.
pub const DEFAULT_CORE_ARCHIVE_URL: &str = "https://wordpress.org/{component}-{version}.zip";

/// Default digest manifest URL template for the core component.
pub const DEFAULT_CORE_CHECKSUM_URL: &str = "https://wordpress.org/{component}-{version}.zip.md5";

/// Default archive URL template for plugins.
pub const DEFAULT_PLUGIN_ARCHIVE_URL: &str =
    "https://downloads.wordpress.org/plugin/{name}.{version}.zip";

/// Configuration for reference acquisition and the core exclusion policy.
///
/// URL templates accept the placeholders `{component}`, `{name}` and
/// `{version}`.
///
/// # Examples
///
/// ```
/// use wpverify_core::AuditConfig;
///
/// let config = AuditConfig::default()
///     .with_cache_root("/tmp/wpverify-cache")
///     .with_max_attempts(3);
/// assert_eq!(config.max_attempts, 3);
/// assert_eq!(config.core_component, "wordpress");
/// ```
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Directory holding cached reference archives.
    pub cache_root: PathBuf,

    /// Name of the core component; also the top directory of its archive.
    pub core_component: String,

    /// URL template of the core reference archive.
    pub core_archive_url: String,

    /// URL template of the core digest manifest.
    pub core_checksum_url: String,

    /// URL template of plugin reference archives.
    pub plugin_archive_url: String,

    /// Total number of core acquisition attempts.
    pub max_attempts: usize,

    /// Extension (without the dot) of the files that are compared.
    pub file_extension: String,

    /// Site configuration file, never compared.
    pub config_file: String,

    /// Themes subtree, excluded except for `default_themes`.
    pub themes_dir: String,

    /// Theme directories shipped with the core archive.
    pub default_themes: Vec<String>,

    /// Plugins subtree; checked separately against plugin archives.
    pub plugins_dir: String,

    /// Additional subtrees excluded from the core check.
    pub excluded_subtrees: Vec<String>,
}

impl Default for AuditConfig {
    /// Default values:
    /// - `cache_root`: `cache`
    /// - `core_component`: `wordpress`
    /// - `max_attempts`: 2
    /// - `default_themes`: `twentyfifteen`, `twentyfourteen`, `twentysixteen`
    /// - `excluded_subtrees`: `wp-content/mu-plugins/Sept24`
    fn default() -> Self {
        Self {
            cache_root: PathBuf::from("cache"),
            core_component: "wordpress".to_string(),
            core_archive_url: DEFAULT_CORE_ARCHIVE_URL.to_string(),
            core_checksum_url: DEFAULT_CORE_CHECKSUM_URL.to_string(),
            plugin_archive_url: DEFAULT_PLUGIN_ARCHIVE_URL.to_string(),
            max_attempts: 2,
            file_extension: "php".to_string(),
            config_file: "wp-config.php".to_string(),
            themes_dir: "wp-content/themes".to_string(),
            default_themes: vec![
                "twentyfifteen".to_string(),
                "twentyfourteen".to_string(),
                "twentysixteen".to_string(),
            ],
            plugins_dir: "wp-content/plugins".to_string(),
            excluded_subtrees: vec!["wp-content/mu-plugins/Sept24".to_string()],
        }
    }
}

impl AuditConfig {
    /// Sets the cache directory.
    pub fn with_cache_root(mut self, cache_root: impl Into<PathBuf>) -> Self {
        self.cache_root = cache_root.into();
        self
    }

    /// Sets the total number of core acquisition attempts (at least one).
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the core archive and manifest URL templates.
    pub fn with_core_urls(
        mut self,
        archive: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        self.core_archive_url = archive.into();
        self.core_checksum_url = checksum.into();
        self
    }

    /// Sets the plugin archive URL template.
    pub fn with_plugin_url(mut self, template: impl Into<String>) -> Self {
        self.plugin_archive_url = template.into();
        self
    }

    /// URL of the core archive for `version`.
    #[must_use]
    pub fn core_archive_url(&self, version: &str) -> String {
        render_template(&self.core_archive_url, &self.core_component, version)
    }

    /// URL of the core digest manifest for `version`.
    #[must_use]
    pub fn core_checksum_url(&self, version: &str) -> String {
        render_template(&self.core_checksum_url, &self.core_component, version)
    }

    /// URL of the archive for plugin `name` at `version`.
    #[must_use]
    pub fn plugin_archive_url(&self, name: &str, version: &str) -> String {
        render_template(&self.plugin_archive_url, name, version)
    }
}

/// Substitutes `{component}`/`{name}` and `{version}` in a URL template.
///
/// # Examples
///
/// ```
/// use wpverify_core::config::render_template;
///
/// let url = render_template("https://example.test/{name}.{version}.zip", "akismet", "5.3");
/// assert_eq!(url, "https://example.test/akismet.5.3.zip");
/// ```
#[must_use]
pub fn render_template(template: &str, name: &str, version: &str) -> String {
    template
        .replace("{component}", name)
        .replace("{name}", name)
        .replace("{version}", version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = AuditConfig::default();
        assert_eq!(
            config.core_archive_url("6.4.2"),
            "https://wordpress.org/wordpress-6.4.2.zip"
        );
        assert_eq!(
            config.core_checksum_url("6.4.2"),
            "https://wordpress.org/wordpress-6.4.2.zip.md5"
        );
        assert_eq!(
            config.plugin_archive_url("akismet", "5.3"),
            "https://downloads.wordpress.org/plugin/akismet.5.3.zip"
        );
    }

    #[test]
    fn test_max_attempts_floor() {
        let config = AuditConfig::default().with_max_attempts(0);
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_custom_templates() {
        let config = AuditConfig::default()
            .with_core_urls(
                "http://mirror.test/{component}/{version}.zip",
                "http://mirror.test/{version}.md5",
            )
            .with_plugin_url("http://mirror.test/p/{name}/{version}");
        assert_eq!(
            config.core_archive_url("6.0"),
            "http://mirror.test/wordpress/6.0.zip"
        );
        assert_eq!(config.core_checksum_url("6.0"), "http://mirror.test/6.0.md5");
        assert_eq!(
            config.plugin_archive_url("jetpack", "13.1"),
            "http://mirror.test/p/jetpack/13.1"
        );
    }
}
