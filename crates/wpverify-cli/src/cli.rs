//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wpverify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to search for WordPress installations
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    #[command(flatten)]
    pub audit: AuditArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the files with problems
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct AuditArgs {
    /// Maximum depth below PATH at which installations are searched
    #[arg(short, long, value_name = "N")]
    pub depth: Option<usize>,

    /// Directory where reference archives are cached
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// URL template of the core archive ({component}, {version})
    #[arg(long, value_name = "TEMPLATE", requires = "checksum_url")]
    pub core_url: Option<String>,

    /// URL template of the core archive MD5 manifest
    #[arg(long, value_name = "TEMPLATE", requires = "core_url")]
    pub checksum_url: Option<String>,

    /// URL template of plugin archives ({name}, {version})
    #[arg(long, value_name = "TEMPLATE")]
    pub plugin_url: Option<String>,

    /// Number of attempts to obtain a verified core archive
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..))]
    pub max_attempts: u8,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_path_is_optional() {
        let cli = Cli::try_parse_from(["wpverify"]).unwrap();
        assert!(cli.path.is_none());
        assert_eq!(cli.audit.max_attempts, 2);
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "wpverify",
            "/var/www",
            "--depth",
            "3",
            "--cache-dir",
            "/tmp/cache",
            "--plugin-url",
            "https://mirror.test/{name}.{version}.zip",
            "--max-attempts",
            "4",
            "-j",
        ])
        .unwrap();

        assert_eq!(cli.path, Some(PathBuf::from("/var/www")));
        assert_eq!(cli.audit.depth, Some(3));
        assert_eq!(cli.audit.cache_dir, Some(PathBuf::from("/tmp/cache")));
        assert_eq!(cli.audit.max_attempts, 4);
        assert!(cli.json);
    }

    #[test]
    fn test_core_urls_come_in_pairs() {
        assert!(
            Cli::try_parse_from(["wpverify", ".", "--core-url", "https://a/{version}.zip"]).is_err()
        );
        assert!(
            Cli::try_parse_from([
                "wpverify",
                ".",
                "--core-url",
                "https://a/{version}.zip",
                "--checksum-url",
                "https://a/{version}.zip.md5",
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_rejects_zero_attempts() {
        assert!(Cli::try_parse_from(["wpverify", ".", "--max-attempts", "0"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["wpverify", ".", "-q", "-v"]).is_err());
    }
}
