//! Acquisition and validation of reference archives.
//!
//! The core archive is checked against the digest manifest published next
//! to it; a mismatch deletes both cached files and starts over, up to
//! `AuditConfig::max_attempts` attempts. Plugin archives have no published
//! digest, so the only check is that the download is not empty: a tampered
//! upstream plugin package cannot be detected, only local drift from it.

use crate::IntegrityError;
use crate::Result;
use crate::cache::ArchiveCache;
use crate::config::AuditConfig;
use crate::digest::digest_file;
use crate::digest::parse_manifest;
use crate::fetch::Fetcher;
use crate::reference::ReferenceArchive;
use std::fs;
use std::path::Path;
use tracing::debug;
use tracing::warn;

/// Obtains verified reference archives, downloading into the cache on
/// demand.
///
/// # Examples
///
/// ```no_run
/// use wpverify_core::AuditConfig;
/// use wpverify_core::HttpFetcher;
/// use wpverify_core::ReferenceAcquirer;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AuditConfig::default().with_cache_root("/tmp/wpverify");
/// let acquirer = ReferenceAcquirer::new(&config, &HttpFetcher);
/// let archive = acquirer.acquire_core("6.4.2")?;
/// assert!(archive.verified);
/// # Ok(())
/// # }
/// ```
pub struct ReferenceAcquirer<'a> {
    config: &'a AuditConfig,
    cache: ArchiveCache,
    fetcher: &'a dyn Fetcher,
}

impl<'a> ReferenceAcquirer<'a> {
    /// Creates an acquirer using the cache root from `config`.
    #[must_use]
    pub fn new(config: &'a AuditConfig, fetcher: &'a dyn Fetcher) -> Self {
        Self {
            config,
            cache: ArchiveCache::new(&config.cache_root),
            fetcher,
        }
    }

    /// Returns the verified core reference archive for `version`.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceUnavailable` once every attempt has failed to
    /// produce an archive matching its manifest.
    pub fn acquire_core(&self, version: &str) -> Result<ReferenceArchive> {
        let component = self.config.core_component.as_str();
        let attempts = self.config.max_attempts.max(1);
        let mut last_failure = String::new();

        for attempt in 1..=attempts {
            match self.try_acquire_core(component, version) {
                Ok(archive) => return Ok(archive),
                Err(reason) => {
                    warn!(
                        component,
                        version,
                        attempt,
                        attempts,
                        %reason,
                        "reference acquisition failed"
                    );
                    last_failure = reason;
                }
            }
        }

        Err(IntegrityError::ReferenceUnavailable {
            component: component.to_string(),
            version: version.to_string(),
            reason: format!("{last_failure} (after {attempts} attempts)"),
        })
    }

    /// One acquisition attempt; any failure reason is retried by the caller.
    fn try_acquire_core(
        &self,
        component: &str,
        version: &str,
    ) -> std::result::Result<ReferenceArchive, String> {
        let archive_path = self
            .cache
            .core_archive_path(component, version)
            .map_err(|e| e.to_string())?;
        let checksum_path = self
            .cache
            .core_checksum_path(component, version)
            .map_err(|e| e.to_string())?;

        self.ensure_cached(&archive_path, &self.config.core_archive_url(version))?;
        self.ensure_cached(&checksum_path, &self.config.core_checksum_url(version))?;

        let actual = digest_file(&archive_path).map_err(|e| e.to_string())?;
        let manifest = fs::read_to_string(&checksum_path).map_err(|e| e.to_string())?;
        let expected = parse_manifest(&manifest);

        if expected.as_deref() != Some(actual.as_str()) {
            self.cache.remove(&archive_path).map_err(|e| e.to_string())?;
            self.cache.remove(&checksum_path).map_err(|e| e.to_string())?;
            return Err(format!(
                "checksum mismatch: archive digest {actual}, manifest {}",
                expected.as_deref().unwrap_or("<empty>")
            ));
        }

        debug!(component, version, path = %archive_path.display(), "reference verified");
        Ok(ReferenceArchive {
            component: component.to_string(),
            version: version.to_string(),
            path: archive_path,
            verified: true,
        })
    }

    /// Returns the plugin reference archive for `name` at `version`.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceUnavailable` if the download fails or the archive
    /// is empty. There is no retry.
    pub fn acquire_plugin(&self, name: &str, version: &str) -> Result<ReferenceArchive> {
        let unavailable = |reason: String| IntegrityError::ReferenceUnavailable {
            component: name.to_string(),
            version: version.to_string(),
            reason,
        };

        let path = self
            .cache
            .plugin_archive_path(name, version)
            .map_err(|e| unavailable(e.to_string()))?;

        if path.exists() {
            debug!(plugin = name, version, "using cached plugin archive");
        } else {
            let bytes = self
                .fetcher
                .fetch(&self.config.plugin_archive_url(name, version))
                .map_err(|e| unavailable(e.to_string()))?;
            if bytes.is_empty() {
                return Err(unavailable("downloaded archive is empty".to_string()));
            }
            self.cache
                .store(&path, &bytes)
                .map_err(|e| unavailable(e.to_string()))?;
        }

        let size = fs::metadata(&path)
            .map_err(|e| unavailable(e.to_string()))?
            .len();
        if size == 0 {
            return Err(unavailable(format!(
                "cached archive {} is empty",
                path.display()
            )));
        }

        Ok(ReferenceArchive {
            component: name.to_string(),
            version: version.to_string(),
            path,
            verified: true,
        })
    }

    /// Downloads `url` into `path` unless the file is already cached.
    fn ensure_cached(&self, path: &Path, url: &str) -> std::result::Result<(), String> {
        if path.exists() {
            debug!(path = %path.display(), "cache hit");
            return Ok(());
        }
        let bytes = self.fetcher.fetch(url).map_err(|e| e.to_string())?;
        self.cache.store(path, &bytes).map_err(|e| e.to_string())
    }
}
