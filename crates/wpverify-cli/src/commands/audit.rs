//! Audit command implementation

use crate::cli::AuditArgs;
use crate::error::add_search_context;
use crate::output::OutputFormatter;
use crate::progress::ScanProgress;
use anyhow::Result;
use directories_next::ProjectDirs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use wpverify_core::AuditConfig;
use wpverify_core::Auditor;
use wpverify_core::NoopObserver;

pub fn execute(
    args: &AuditArgs,
    search_root: &Path,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let auditor = Auditor::new(build_config(args));
    debug!(cache = %auditor.config().cache_root.display(), "reference cache");

    formatter.format_search_start(search_root);
    let installations = add_search_context(auditor.discover(search_root, args.depth), search_root)?;

    let audits: Vec<_> = installations
        .iter()
        .map(|installation| {
            if show_progress {
                auditor.audit(installation, &mut ScanProgress::new())
            } else {
                auditor.audit(installation, &mut NoopObserver)
            }
        })
        .collect();

    // Findings are the result of a completed run, not a failure.
    formatter.format_audit_results(search_root, &audits)
}

/// Builds the library configuration from the command-line flags.
fn build_config(args: &AuditArgs) -> AuditConfig {
    let cache_dir = args.cache_dir.clone().unwrap_or_else(default_cache_dir);
    let mut config = AuditConfig::default()
        .with_cache_root(cache_dir)
        .with_max_attempts(usize::from(args.max_attempts));

    if let (Some(archive), Some(checksum)) = (&args.core_url, &args.checksum_url) {
        config = config.with_core_urls(archive, checksum);
    }
    if let Some(template) = &args.plugin_url {
        config = config.with_plugin_url(template);
    }
    config
}

/// Per-user cache directory, or `./cache` when no home directory is known.
fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("org", "wpverify", "wpverify")
        .map_or_else(|| PathBuf::from("cache"), |dirs| dirs.cache_dir().to_path_buf())
}
