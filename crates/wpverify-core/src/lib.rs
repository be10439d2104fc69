//! Integrity verification engine for WordPress installations.
//!
//! `wpverify-core` compares the PHP files of an installed WordPress core and
//! its plugins against the reference archives published on the WordPress
//! distribution servers, and reports every file that is missing from the
//! reference or whose MD5 digest differs from it.
//!
//! # Examples
//!
//! ```no_run
//! use wpverify_core::AuditConfig;
//! use wpverify_core::Auditor;
//! use wpverify_core::NoopObserver;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let auditor = Auditor::new(AuditConfig::default());
//! for installation in auditor.discover("/var/www", Some(2))? {
//!     let audit = auditor.audit(&installation, &mut NoopObserver);
//!     println!("{}: {:?}", installation.root.display(), audit.summary());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod acquire;
pub mod api;
pub mod cache;
pub mod compare;
pub mod config;
pub mod core_check;
pub mod digest;
pub mod discovery;
pub mod error;
pub mod fetch;
pub mod plugin_check;
pub mod policy;
pub mod reference;
pub mod report;
pub mod version;
pub mod walker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main API types
pub use acquire::ReferenceAcquirer;
pub use api::Auditor;
pub use config::AuditConfig;
pub use discovery::Installation;
pub use discovery::find_installations;
pub use error::IntegrityError;
pub use error::Result;
pub use fetch::FetchError;
pub use fetch::Fetcher;
pub use fetch::HttpFetcher;
pub use reference::ReferenceArchive;
pub use report::AuditSummary;
pub use report::CheckStatus;
pub use report::ComponentResult;
pub use report::InstallationAudit;
pub use report::IntegrityProblem;
pub use report::IntegrityReport;
pub use report::NoopObserver;
pub use report::ProblemKind;
pub use report::ScanObserver;
pub use version::extract_version;
