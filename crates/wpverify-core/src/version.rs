//! Declared version extraction.
//!
//! Plugins declare their version in a header comment of one of their
//! top-level PHP files:
//!
//! ```text
//! /**
//!  * Plugin Name: Akismet Anti-spam
//!  * Version: 5.3 (stable)
//!  */
//! ```
//!
//! The core declares it in `wp-includes/version.php` as
//! `$wp_version = '6.4.2';`.

use crate::walker::FileWalker;
use std::path::Path;
use tracing::debug;

const VERSION_LABEL: &str = "version:";

/// Characters allowed before the `Version:` label.
const LEADER_CHARS: &[char] = &[' ', '\t', '/', '*', '#', '@'];

/// Extracts the version declared by a `Version:` header line.
///
/// Only the first line carrying the label is considered. The version is
/// the first whitespace-delimited token after the colon.
///
/// # Examples
///
/// ```
/// use wpverify_core::extract_version;
///
/// assert_eq!(extract_version(" * Version: 2.3.1 (beta)").as_deref(), Some("2.3.1"));
/// assert_eq!(extract_version("# version:1.0").as_deref(), Some("1.0"));
/// assert_eq!(extract_version("Plugin Name: Hello"), None);
/// ```
#[must_use]
pub fn extract_version(text: &str) -> Option<String> {
    let value = text.lines().find_map(|line| {
        let rest = line.trim_start_matches(LEADER_CHARS);
        let label = rest.get(..VERSION_LABEL.len())?;
        label
            .eq_ignore_ascii_case(VERSION_LABEL)
            .then(|| &rest[VERSION_LABEL.len()..])
    })?;
    value.split_whitespace().next().map(str::to_string)
}

/// Resolves a plugin's version from its top-level PHP files.
///
/// Files are scanned in name order and the first one declaring a version
/// wins. Unreadable files are skipped.
#[must_use]
pub fn plugin_version(plugin_dir: &Path, extension: &str) -> Option<String> {
    FileWalker::new(plugin_dir)
        .extension(extension)
        .max_depth(1)
        .files()
        .find_map(|path| {
            let bytes = std::fs::read(&path)
                .inspect_err(|e| {
                    debug!(path = %path.display(), error = %e, "skipping unreadable header file");
                })
                .ok()?;
            extract_version(&String::from_utf8_lossy(&bytes))
        })
}

/// Extracts the core version from the content of `wp-includes/version.php`.
///
/// A blank assignment declares no version.
///
/// # Examples
///
/// ```
/// use wpverify_core::version::core_version;
///
/// let text = "<?php\n$wp_version = '6.4.2';\n$wp_db_version = 56657;\n";
/// assert_eq!(core_version(text).as_deref(), Some("6.4.2"));
/// ```
#[must_use]
pub fn core_version(text: &str) -> Option<String> {
    const ASSIGNMENT: &str = "$wp_version = '";

    text.lines().find_map(|line| {
        let start = line.find(ASSIGNMENT)? + ASSIGNMENT.len();
        let rest = &line[start..];
        let end = rest.rfind("';")?;
        let version = rest[..end].trim();
        (!version.is_empty()).then(|| version.to_string())
    })
}
