//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::error::hint;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use wpverify_core::AuditSummary;
use wpverify_core::CheckStatus;
use wpverify_core::ComponentResult;
use wpverify_core::InstallationAudit;
use wpverify_core::IntegrityError;
use wpverify_core::IntegrityProblem;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn status_label(&self, status: CheckStatus) -> String {
        if !self.use_colors {
            return status.to_string();
        }
        match status {
            CheckStatus::Ok => style(status).green().bold().to_string(),
            CheckStatus::ProblemsFound => style(status).red().bold().to_string(),
            CheckStatus::Unchecked => style(status).yellow().bold().to_string(),
        }
    }

    fn format_component(&self, heading: &str, result: &ComponentResult, is_core: bool) {
        self.line(&format!(
            "{heading}... {}",
            self.status_label(result.status())
        ));

        match &result.outcome {
            Ok(report) => {
                if self.verbose {
                    self.line(&format!(
                        "  Files checked: {}, excluded: {}",
                        Self::format_number(report.files_checked),
                        Self::format_number(report.files_excluded)
                    ));
                }
                if !report.problems.is_empty() {
                    self.line("Potential problems found:");
                    for row in Self::problem_table(&report.problems) {
                        self.line(&row);
                    }
                }
            }
            Err(err) => {
                self.line(&format!("  {}", Self::unchecked_message(err, is_core)));
                if self.verbose {
                    self.line(&format!("  {err}"));
                    if let Some(hint) = hint(err) {
                        self.line(&format!("  HINT: {hint}"));
                    }
                }
            }
        }
    }

    fn format_installation(&self, audit: &InstallationAudit) {
        let installation = &audit.installation;
        self.line(&format!(
            "WordPress found in path {} version {}",
            installation.root.display(),
            installation.version
        ));

        self.format_component("Checking core integrity", &audit.core, true);

        if audit.plugins.is_empty() {
            self.line("No plugins installed.");
        }
        for plugin in &audit.plugins {
            let heading = format!(
                "Checking plugin - {} {}",
                plugin.name,
                plugin.version.as_deref().unwrap_or("(no version)")
            );
            self.format_component(&heading, plugin, false);
        }

        self.line(&Self::summary_line(&audit.summary()));
        self.line("");
    }

    /// Aligned two-column table of problems, header first.
    fn problem_table(problems: &[IntegrityProblem]) -> Vec<String> {
        let paths: Vec<String> = problems
            .iter()
            .map(|p| p.path.display().to_string())
            .collect();
        let width = paths
            .iter()
            .map(|p| console::measure_text_width(p))
            .max()
            .unwrap_or(0)
            .max("File".len());

        let mut rows = Vec::with_capacity(problems.len() + 1);
        rows.push(format!("  {:<width$}  Problem", "File"));
        for (path, problem) in paths.iter().zip(problems) {
            rows.push(format!("  {path:<width$}  {}", problem.kind));
        }
        rows
    }

    fn unchecked_message(err: &IntegrityError, is_core: bool) -> &'static str {
        match err {
            IntegrityError::VersionNotFound { .. } => "Could not determine plugin version.",
            err if is_core && err.is_reference_failure() => {
                "Could not obtain a verified core integrity package."
            }
            IntegrityError::ReferenceUnavailable { .. } => {
                "Could not find plugin integrity package."
            }
            IntegrityError::ArchiveOpenFailure { .. } => "Could not read integrity package.",
            IntegrityError::Io(_) | IntegrityError::SearchRootNotFound { .. } => {
                "Could not be checked."
            }
        }
    }

    /// One-line stderr notice for a component that could not be checked.
    fn unchecked_notice(result: &ComponentResult, is_core: bool) -> Option<String> {
        let err = result.outcome.as_ref().err()?;
        let message = Self::unchecked_message(err, is_core);
        Some(match err.context() {
            Some(reason) => format!("{}: {message} ({reason})", result.name),
            None => format!("{}: {message}", result.name),
        })
    }

    fn summary_line(summary: &AuditSummary) -> String {
        format!(
            "Summary: {} OK, {} with problems, {} unchecked ({} problems)",
            summary.ok,
            summary.with_problems,
            summary.unchecked,
            Self::format_number(summary.total_problems)
        )
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_search_start(&self, search_root: &Path) {
        if self.quiet {
            return;
        }
        self.line(&format!(
            "Searching for WordPress installation in the path: {}",
            search_root.display()
        ));
    }

    fn format_audit_results(
        &self,
        _search_root: &Path,
        audits: &[InstallationAudit],
    ) -> Result<()> {
        if self.quiet {
            // Findings on stdout, unchecked components on stderr
            let stderr = Term::stderr();
            for audit in audits {
                let notices = std::iter::once((&audit.core, true))
                    .chain(audit.plugins.iter().map(|plugin| (plugin, false)))
                    .filter_map(|(result, is_core)| Self::unchecked_notice(result, is_core));
                for notice in notices {
                    let _ = stderr.write_line(&format!("WARNING: {notice}"));
                }
                for problem in audit.components().flat_map(ComponentResult::problems) {
                    self.line(&format!("{}: {}", problem.path.display(), problem.kind));
                }
            }
            return Ok(());
        }

        if audits.is_empty() {
            self.line("None found!");
            return Ok(());
        }

        for audit in audits {
            self.format_installation(audit);
        }
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wpverify_core::ProblemKind;

    fn problem(path: &str, kind: ProblemKind) -> IntegrityProblem {
        IntegrityProblem {
            path: PathBuf::from(path),
            relative: path.rsplit('/').next().unwrap_or(path).to_string(),
            kind,
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_problem_table_is_aligned() {
        let rows = HumanFormatter::problem_table(&[
            problem("/srv/wp/index.php", ProblemKind::DigestMismatch),
            problem("/srv/wp/x.php", ProblemKind::MissingInReference),
        ]);

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("  File "));
        assert!(rows[1].ends_with("MD5 is not the same as the original archive."));
        assert!(rows[2].ends_with("File not found in original archive."));

        let column = rows[0].find("Problem").unwrap();
        assert_eq!(rows[1].find("MD5").unwrap(), column);
        assert_eq!(rows[2].find("File not found").unwrap(), column);
    }

    #[test]
    fn test_unchecked_message_depends_on_component() {
        let unavailable = IntegrityError::ReferenceUnavailable {
            component: "akismet".into(),
            version: "5.3".into(),
            reason: "not found".into(),
        };
        assert_eq!(
            HumanFormatter::unchecked_message(&unavailable, false),
            "Could not find plugin integrity package."
        );
        assert_ne!(
            HumanFormatter::unchecked_message(&unavailable, true),
            "Could not find plugin integrity package."
        );
    }

    #[test]
    fn test_unreadable_core_package_message() {
        let unreadable = IntegrityError::ArchiveOpenFailure {
            path: PathBuf::from("cache/wordpress-6.4.2.zip"),
            reason: "invalid Zip archive".into(),
        };
        assert_eq!(
            HumanFormatter::unchecked_message(&unreadable, true),
            "Could not obtain a verified core integrity package."
        );
        assert_eq!(
            HumanFormatter::unchecked_message(&unreadable, false),
            "Could not read integrity package."
        );
    }

    #[test]
    fn test_unchecked_notice() {
        let core = ComponentResult::new(
            "wordpress",
            Some("6.4.2".into()),
            Err(IntegrityError::ArchiveOpenFailure {
                path: PathBuf::from("cache/wordpress-6.4.2.zip"),
                reason: "invalid Zip archive".into(),
            }),
        );
        assert_eq!(
            HumanFormatter::unchecked_notice(&core, true).unwrap(),
            "wordpress: Could not obtain a verified core integrity package. (invalid Zip archive)"
        );

        let plugin = ComponentResult::new(
            "custom",
            None,
            Err(IntegrityError::VersionNotFound {
                path: PathBuf::from("/srv/wp/wp-content/plugins/custom"),
            }),
        );
        assert_eq!(
            HumanFormatter::unchecked_notice(&plugin, false).unwrap(),
            "custom: Could not determine plugin version."
        );

        let clean = ComponentResult::new(
            "akismet",
            Some("5.3".into()),
            Ok(wpverify_core::IntegrityReport::new("akismet", "5.3")),
        );
        assert!(HumanFormatter::unchecked_notice(&clean, false).is_none());
    }

    #[test]
    fn test_summary_line() {
        let summary = AuditSummary {
            ok: 2,
            with_problems: 1,
            unchecked: 0,
            total_problems: 1200,
        };
        assert_eq!(
            HumanFormatter::summary_line(&summary),
            "Summary: 2 OK, 1 with problems, 0 unchecked (1,200 problems)"
        );
    }
}
