//! Integrity findings and their aggregation.

use crate::IntegrityError;
use crate::discovery::Installation;
use std::fmt;
use std::path::PathBuf;

/// Why a file was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// The file has content but no counterpart in the reference archive.
    MissingInReference,
    /// The file differs from its counterpart in the reference archive.
    DigestMismatch,
}

impl ProblemKind {
    /// Stable identifier used in machine-readable output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingInReference => "missing_in_reference",
            Self::DigestMismatch => "digest_mismatch",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInReference => write!(f, "File not found in original archive."),
            Self::DigestMismatch => write!(f, "MD5 is not the same as the original archive."),
        }
    }
}

/// A single file that does not match its reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityProblem {
    /// Path of the file on disk.
    pub path: PathBuf,
    /// Normalized path relative to the component root.
    pub relative: String,
    /// Kind of discrepancy.
    pub kind: ProblemKind,
}

/// Findings for one component, in file-enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Component name.
    pub component: String,
    /// Version compared against.
    pub version: String,
    /// Discrepancies found; empty means the component is intact.
    pub problems: Vec<IntegrityProblem>,
    /// Number of files compared.
    pub files_checked: usize,
    /// Number of files skipped by the exclusion policy.
    pub files_excluded: usize,
}

impl IntegrityReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(component: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Records a problem.
    pub fn add_problem(&mut self, problem: IntegrityProblem) {
        self.problems.push(problem);
    }

    /// Returns `true` if no problem was found.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }

    /// Number of problems of the given kind.
    #[must_use]
    pub fn count(&self, kind: ProblemKind) -> usize {
        self.problems.iter().filter(|p| p.kind == kind).count()
    }
}

/// Outcome of checking one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckStatus {
    /// Checked; every file matches.
    Ok,
    /// Checked; at least one problem.
    ProblemsFound,
    /// Could not be checked.
    Unchecked,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::ProblemsFound => write!(f, "PROBLEMS"),
            Self::Unchecked => write!(f, "UNCHECKED"),
        }
    }
}

/// Result of checking one component (core or plugin).
#[derive(Debug)]
pub struct ComponentResult {
    /// Component name.
    pub name: String,
    /// Declared version, if it could be determined.
    pub version: Option<String>,
    /// Findings, or why the component could not be checked.
    pub outcome: Result<IntegrityReport, IntegrityError>,
}

impl ComponentResult {
    /// Creates a component result.
    pub fn new(
        name: impl Into<String>,
        version: Option<String>,
        outcome: Result<IntegrityReport, IntegrityError>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            outcome,
        }
    }

    /// Classifies the outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpverify_core::CheckStatus;
    /// use wpverify_core::ComponentResult;
    /// use wpverify_core::IntegrityReport;
    ///
    /// let result = ComponentResult::new(
    ///     "akismet",
    ///     Some("5.3".into()),
    ///     Ok(IntegrityReport::new("akismet", "5.3")),
    /// );
    /// assert_eq!(result.status(), CheckStatus::Ok);
    /// ```
    #[must_use]
    pub fn status(&self) -> CheckStatus {
        match &self.outcome {
            Ok(report) if report.is_ok() => CheckStatus::Ok,
            Ok(_) => CheckStatus::ProblemsFound,
            Err(_) => CheckStatus::Unchecked,
        }
    }

    /// Problems found, empty when unchecked.
    #[must_use]
    pub fn problems(&self) -> &[IntegrityProblem] {
        match &self.outcome {
            Ok(report) => &report.problems,
            Err(_) => &[],
        }
    }
}

/// Counts over all components of an installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditSummary {
    /// Components without problems.
    pub ok: usize,
    /// Components with at least one problem.
    pub with_problems: usize,
    /// Components that could not be checked.
    pub unchecked: usize,
    /// Problems over all components.
    pub total_problems: usize,
}

impl AuditSummary {
    /// Returns `true` if every component was checked and is intact.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.with_problems == 0 && self.unchecked == 0
    }
}

/// Everything found for one installation.
#[derive(Debug)]
pub struct InstallationAudit {
    /// The audited installation.
    pub installation: Installation,
    /// Core check result.
    pub core: ComponentResult,
    /// Plugin check results, in plugin directory order.
    pub plugins: Vec<ComponentResult>,
}

impl InstallationAudit {
    /// Groups the results of one installation.
    #[must_use]
    pub fn new(
        installation: Installation,
        core: ComponentResult,
        plugins: Vec<ComponentResult>,
    ) -> Self {
        Self {
            installation,
            core,
            plugins,
        }
    }

    /// Iterates over the core result followed by plugin results.
    pub fn components(&self) -> impl Iterator<Item = &ComponentResult> {
        std::iter::once(&self.core).chain(&self.plugins)
    }

    /// Aggregates component statuses.
    #[must_use]
    pub fn summary(&self) -> AuditSummary {
        self.components()
            .fold(AuditSummary::default(), |mut summary, component| {
                match component.status() {
                    CheckStatus::Ok => summary.ok += 1,
                    CheckStatus::ProblemsFound => summary.with_problems += 1,
                    CheckStatus::Unchecked => summary.unchecked += 1,
                }
                summary.total_problems += component.problems().len();
                summary
            })
    }
}

/// Callback trait for progress reporting during a scan.
///
/// # Examples
///
/// ```
/// use wpverify_core::ScanObserver;
///
/// struct Counter(usize);
///
/// impl ScanObserver for Counter {
///     fn on_component_start(&mut self, _name: &str) {}
///
///     fn on_file_checked(&mut self, _relative: &str) {
///         self.0 += 1;
///     }
///
///     fn on_component_complete(&mut self, _name: &str) {}
/// }
/// ```
pub trait ScanObserver {
    /// Called before a component is checked.
    fn on_component_start(&mut self, name: &str);

    /// Called after a file has been compared.
    fn on_file_checked(&mut self, relative: &str);

    /// Called once a component is done, whatever its outcome.
    fn on_component_complete(&mut self, name: &str);
}

/// No-op implementation of `ScanObserver`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {
    fn on_component_start(&mut self, _name: &str) {}

    fn on_file_checked(&mut self, _relative: &str) {}

    fn on_component_complete(&mut self, _name: &str) {}
}
