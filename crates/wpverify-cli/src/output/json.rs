//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use wpverify_core::CheckStatus;
use wpverify_core::ComponentResult;
use wpverify_core::InstallationAudit;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct AuditOutput {
    search_root: String,
    installations: Vec<InstallationOutput>,
}

#[derive(Debug, Serialize)]
struct InstallationOutput {
    root: String,
    version: String,
    summary: SummaryOutput,
    core: ComponentOutput,
    plugins: Vec<ComponentOutput>,
}

#[derive(Debug, Serialize)]
struct SummaryOutput {
    ok: usize,
    with_problems: usize,
    unchecked: usize,
    total_problems: usize,
}

#[derive(Debug, Serialize)]
struct ComponentOutput {
    name: String,
    version: Option<String>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    files_checked: usize,
    files_excluded: usize,
    problems: Vec<ProblemOutput>,
}

#[derive(Debug, Serialize)]
struct ProblemOutput {
    path: String,
    relative: String,
    kind: &'static str,
    message: String,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn component(result: &ComponentResult) -> ComponentOutput {
        let status = match result.status() {
            CheckStatus::Ok => "ok",
            CheckStatus::ProblemsFound => "problems",
            CheckStatus::Unchecked => "unchecked",
        };
        let (files_checked, files_excluded) = result
            .outcome
            .as_ref()
            .map_or((0, 0), |report| (report.files_checked, report.files_excluded));

        ComponentOutput {
            name: result.name.clone(),
            version: result.version.clone(),
            status,
            error: result.outcome.as_ref().err().map(ToString::to_string),
            files_checked,
            files_excluded,
            problems: result
                .problems()
                .iter()
                .map(|problem| ProblemOutput {
                    path: problem.path.display().to_string(),
                    relative: problem.relative.clone(),
                    kind: problem.kind.as_str(),
                    message: problem.kind.to_string(),
                })
                .collect(),
        }
    }

    fn installation(audit: &InstallationAudit) -> InstallationOutput {
        let summary = audit.summary();
        InstallationOutput {
            root: audit.installation.root.display().to_string(),
            version: audit.installation.version.clone(),
            summary: SummaryOutput {
                ok: summary.ok,
                with_problems: summary.with_problems,
                unchecked: summary.unchecked,
                total_problems: summary.total_problems,
            },
            core: Self::component(&audit.core),
            plugins: audit.plugins.iter().map(Self::component).collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_search_start(&self, _search_root: &Path) {}

    fn format_audit_results(
        &self,
        search_root: &Path,
        audits: &[InstallationAudit],
    ) -> Result<()> {
        let data = AuditOutput {
            search_root: search_root.display().to_string(),
            installations: audits.iter().map(Self::installation).collect(),
        };

        let output = JsonOutput::success("audit", data);
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("audit", format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
