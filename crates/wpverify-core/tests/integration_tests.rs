//! Integration tests for wpverify-core.
//!
//! These tests audit real installation trees on disk against reference
//! archives served by an in-memory fetcher.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;
use wpverify_core::AuditConfig;
use wpverify_core::Auditor;
use wpverify_core::CheckStatus;
use wpverify_core::IntegrityError;
use wpverify_core::NoopObserver;
use wpverify_core::ProblemKind;
use wpverify_core::ScanObserver;
use wpverify_core::digest::digest_bytes;
use wpverify_core::test_utils::StubFetcher;
use wpverify_core::test_utils::create_prefixed_zip;
use wpverify_core::test_utils::write_tree;

const VERSION: &str = "6.4.2";
const CORE_URL: &str = "https://mirror.test/wordpress-6.4.2.zip";
const CHECKSUM_URL: &str = "https://mirror.test/wordpress-6.4.2.zip.md5";
const AKISMET_URL: &str = "https://plugins.test/akismet.5.3.zip";

const CORE_FILES: &[(&str, &str)] = &[
    ("index.php", "<?php require __DIR__ . '/wp-blog-header.php';"),
    ("wp-blog-header.php", "<?php // blog header"),
    ("wp-admin/admin.php", "<?php // admin bootstrap"),
    ("wp-includes/version.php", "<?php\n$wp_version = '6.4.2';\n"),
    ("wp-content/themes/twentysixteen/functions.php", "<?php // default theme"),
];

const AKISMET_FILES: &[(&str, &str)] = &[
    ("akismet.php", "<?php\n/*\nPlugin Name: Akismet\nVersion: 5.3\n*/"),
    ("class.akismet.php", "<?php class Akismet {}"),
];

struct Fixture {
    temp: TempDir,
    fetcher: Rc<StubFetcher>,
    auditor: Auditor,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let core_zip = create_prefixed_zip("wordpress", CORE_FILES);
        let manifest = format!("{}  wordpress-{VERSION}.zip\n", digest_bytes(&core_zip));
        let akismet_zip = create_prefixed_zip("akismet", AKISMET_FILES);

        let fetcher = Rc::new(
            StubFetcher::new()
                .with_response(CORE_URL, core_zip)
                .with_response(CHECKSUM_URL, manifest.into_bytes())
                .with_response(AKISMET_URL, akismet_zip),
        );

        let config = AuditConfig::default()
            .with_cache_root(temp.path().join("cache"))
            .with_core_urls(
                "https://mirror.test/{component}-{version}.zip",
                "https://mirror.test/{component}-{version}.zip.md5",
            )
            .with_plugin_url("https://plugins.test/{name}.{version}.zip");
        let auditor = Auditor::with_fetcher(config, Box::new(Rc::clone(&fetcher)));

        Self {
            temp,
            fetcher,
            auditor,
        }
    }

    fn site(&self) -> PathBuf {
        self.temp.path().join("www").join("blog")
    }

    fn cache(&self) -> PathBuf {
        self.temp.path().join("cache")
    }

    /// Writes a pristine installation with one plugin.
    fn install(&self) -> PathBuf {
        let site = self.site();
        write_tree(&site, CORE_FILES);
        write_tree(&site.join("wp-content/plugins/akismet"), AKISMET_FILES);
        write_tree(
            &site,
            &[
                ("wp-config.php", "<?php define('DB_PASSWORD', 'secret');"),
                ("wp-content/themes/astra/functions.php", "<?php // third-party"),
                ("wp-content/index.php", ""),
            ],
        );
        site
    }
}

fn only_installation(auditor: &Auditor, root: &Path) -> wpverify_core::Installation {
    let mut found = auditor.discover(root, None).unwrap();
    assert_eq!(found.len(), 1);
    found.remove(0)
}

#[test]
fn test_clean_installation_is_ok() {
    let fixture = Fixture::new();
    fixture.install();

    let installation = only_installation(&fixture.auditor, fixture.temp.path());
    assert_eq!(installation.version, VERSION);

    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);

    assert_eq!(audit.core.status(), CheckStatus::Ok);
    assert_eq!(audit.plugins.len(), 1);
    assert_eq!(audit.plugins[0].name, "akismet");
    assert_eq!(audit.plugins[0].version.as_deref(), Some("5.3"));
    assert_eq!(audit.plugins[0].status(), CheckStatus::Ok);
    assert!(audit.summary().is_clean());
    assert_eq!(fixture.fetcher.call_count(), 3);
}

#[test]
fn test_exclusions_are_not_reported() {
    let fixture = Fixture::new();
    fixture.install();
    let installation = only_installation(&fixture.auditor, fixture.temp.path());

    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);
    let report = audit.core.outcome.as_ref().unwrap();

    // wp-config.php, the astra theme and both akismet files
    assert_eq!(report.files_excluded, 4);
    assert_eq!(report.files_checked, CORE_FILES.len() + 1);
    assert!(report.problems.is_empty());
}

#[test]
fn test_second_audit_uses_cache() {
    let fixture = Fixture::new();
    fixture.install();
    let installation = only_installation(&fixture.auditor, fixture.temp.path());

    fixture.auditor.audit(&installation, &mut NoopObserver);
    fixture.fetcher.reset_calls();
    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);

    assert!(audit.summary().is_clean());
    assert_eq!(fixture.fetcher.call_count(), 0);
}

#[test]
fn test_tampered_and_injected_files_are_reported() {
    let fixture = Fixture::new();
    let site = fixture.install();
    write_tree(
        &site,
        &[
            ("wp-admin/admin.php", "<?php // admin bootstrap\neval($_POST['c']);"),
            ("wp-includes/class-shell.php", "<?php system($_GET['c']);"),
            ("wp-content/plugins/akismet/class.akismet.php", "<?php class Akismet { /* x */ }"),
        ],
    );
    let installation = only_installation(&fixture.auditor, fixture.temp.path());

    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);

    let core = audit.core.problems();
    assert_eq!(core.len(), 2);
    assert_eq!(core[0].relative, "wp-admin/admin.php");
    assert_eq!(core[0].kind, ProblemKind::DigestMismatch);
    assert_eq!(core[1].relative, "wp-includes/class-shell.php");
    assert_eq!(core[1].kind, ProblemKind::MissingInReference);

    let plugin = audit.plugins[0].problems();
    assert_eq!(plugin.len(), 1);
    assert_eq!(plugin[0].relative, "class.akismet.php");
    assert_eq!(plugin[0].kind, ProblemKind::DigestMismatch);

    let summary = audit.summary();
    assert_eq!(summary.with_problems, 2);
    assert_eq!(summary.total_problems, 3);
}

#[test]
fn test_corrupted_cache_is_downloaded_once_more() {
    let fixture = Fixture::new();
    fixture.install();
    let installation = only_installation(&fixture.auditor, fixture.temp.path());
    fixture.auditor.audit(&installation, &mut NoopObserver);

    fs::write(fixture.cache().join("wordpress-6.4.2.zip"), b"truncated").unwrap();
    fixture.fetcher.reset_calls();

    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);

    assert_eq!(audit.core.status(), CheckStatus::Ok);
    assert_eq!(fixture.fetcher.calls(), vec![CORE_URL, CHECKSUM_URL]);
}

#[test]
fn test_corrupted_cached_manifest_is_downloaded_once_more() {
    let fixture = Fixture::new();
    fixture.install();
    let installation = only_installation(&fixture.auditor, fixture.temp.path());
    fixture.auditor.audit(&installation, &mut NoopObserver);

    fs::write(
        fixture.cache().join("wordpress-6.4.2.zip.md5"),
        b"ffffffffffffffffffffffffffffffff  wordpress-6.4.2.zip\n",
    )
    .unwrap();
    fixture.fetcher.reset_calls();

    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);

    assert_eq!(audit.core.status(), CheckStatus::Ok);
    assert_eq!(fixture.fetcher.calls(), vec![CORE_URL, CHECKSUM_URL]);
}

#[test]
fn test_unverifiable_core_is_unchecked_but_plugins_run() {
    let fixture = Fixture::new();
    fixture.install();
    fixture
        .fetcher
        .set_response(CHECKSUM_URL, b"00000000000000000000000000000000\n".to_vec());
    let installation = only_installation(&fixture.auditor, fixture.temp.path());

    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);

    assert!(matches!(
        audit.core.outcome,
        Err(IntegrityError::ReferenceUnavailable { .. })
    ));
    assert_eq!(audit.core.status(), CheckStatus::Unchecked);
    assert_eq!(audit.plugins[0].status(), CheckStatus::Ok);
    // two attempts of archive + manifest, then the plugin archive
    assert_eq!(fixture.fetcher.call_count(), 5);
    assert!(!fixture.cache().join("wordpress-6.4.2.zip").exists());
}

#[test]
fn test_plugin_without_version_does_not_stop_the_audit() {
    let fixture = Fixture::new();
    let site = fixture.install();
    write_tree(
        &site.join("wp-content/plugins"),
        &[("custom/custom.php", "<?php // in-house plugin")],
    );
    let installation = only_installation(&fixture.auditor, fixture.temp.path());

    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);

    assert_eq!(audit.plugins.len(), 2);
    assert_eq!(audit.plugins[0].name, "akismet");
    assert_eq!(audit.plugins[0].status(), CheckStatus::Ok);
    assert_eq!(audit.plugins[1].name, "custom");
    assert_eq!(audit.plugins[1].version, None);
    assert!(matches!(
        audit.plugins[1].outcome,
        Err(IntegrityError::VersionNotFound { .. })
    ));
    assert_eq!(audit.summary().unchecked, 1);
}

#[test]
fn test_unknown_plugin_is_unchecked() {
    let fixture = Fixture::new();
    let site = fixture.install();
    write_tree(
        &site.join("wp-content/plugins"),
        &[("premium/premium.php", "<?php\n/* Version: 2.0 */")],
    );
    let installation = only_installation(&fixture.auditor, fixture.temp.path());

    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);

    let premium = &audit.plugins[1];
    assert_eq!(premium.version.as_deref(), Some("2.0"));
    assert!(matches!(
        premium.outcome,
        Err(IntegrityError::ReferenceUnavailable { .. })
    ));
    assert!(!fixture.cache().join("plugins/premium.2.0.zip").exists());
}

#[test]
fn test_unreadable_reference_archive_is_surfaced() {
    let fixture = Fixture::new();
    fixture.install();
    let garbage = b"this is not a zip archive".to_vec();
    let manifest = format!("{}\n", digest_bytes(&garbage));
    fixture.fetcher.set_response(CORE_URL, garbage);
    fixture.fetcher.set_response(CHECKSUM_URL, manifest.into_bytes());
    let installation = only_installation(&fixture.auditor, fixture.temp.path());

    let audit = fixture.auditor.audit(&installation, &mut NoopObserver);

    assert!(matches!(
        audit.core.outcome,
        Err(IntegrityError::ArchiveOpenFailure { .. })
    ));
    assert_eq!(audit.core.status(), CheckStatus::Unchecked);
}

#[test]
fn test_discovery_respects_depth() {
    let fixture = Fixture::new();
    fixture.install();

    let www = fixture.temp.path().join("www");
    assert_eq!(fixture.auditor.discover(&www, Some(0)).unwrap().len(), 0);
    assert_eq!(fixture.auditor.discover(&www, Some(1)).unwrap().len(), 1);
    assert!(matches!(
        fixture.auditor.discover(www.join("missing"), None),
        Err(IntegrityError::SearchRootNotFound { .. })
    ));
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    files: usize,
}

impl ScanObserver for Recorder {
    fn on_component_start(&mut self, name: &str) {
        self.events.push(format!("start {name}"));
    }

    fn on_file_checked(&mut self, _relative: &str) {
        self.files += 1;
    }

    fn on_component_complete(&mut self, name: &str) {
        self.events.push(format!("end {name}"));
    }
}

#[test]
fn test_observer_sees_every_component() {
    let fixture = Fixture::new();
    fixture.install();
    let installation = only_installation(&fixture.auditor, fixture.temp.path());

    let mut recorder = Recorder::default();
    fixture.auditor.audit(&installation, &mut recorder);

    assert_eq!(
        recorder.events,
        vec!["start wordpress", "end wordpress", "start akismet", "end akismet"]
    );
    assert_eq!(recorder.files, CORE_FILES.len() + 1 + AKISMET_FILES.len());
}
