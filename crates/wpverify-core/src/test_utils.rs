//! Test utilities for building installations, archives and fetchers.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use crate::fetch::FetchError;
use crate::fetch::Fetcher;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are stored uncompressed
/// with mode 0o644.
///
/// # Examples
///
/// ```
/// use wpverify_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(&[("wordpress/index.php", "<?php")]);
/// assert!(!zip_data.is_empty());
/// ```
#[must_use]
pub fn create_test_zip<D: AsRef<[u8]>>(entries: &[(&str, D)]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);

    for (path, data) in entries {
        zip.start_file(*path, options).unwrap();
        zip.write_all(data.as_ref()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Writes `(relative path, content)` pairs under `root`, creating parents.
pub fn write_tree<D: AsRef<[u8]>>(root: &Path, files: &[(&str, D)]) {
    for (relative, data) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, data.as_ref()).unwrap();
    }
}

/// Builds the reference archive of `files` as packaged under `prefix/`.
#[must_use]
pub fn create_prefixed_zip<D: AsRef<[u8]>>(prefix: &str, files: &[(&str, D)]) -> Vec<u8> {
    let names: Vec<String> = files
        .iter()
        .map(|(relative, _)| format!("{prefix}/{relative}"))
        .collect();
    let entries: Vec<(&str, &[u8])> = names
        .iter()
        .zip(files)
        .map(|(name, (_, data))| (name.as_str(), data.as_ref()))
        .collect();
    create_test_zip(&entries)
}

/// In-memory [`Fetcher`] serving canned responses and recording requests.
///
/// # Examples
///
/// ```
/// use wpverify_core::Fetcher;
/// use wpverify_core::test_utils::StubFetcher;
///
/// let fetcher = StubFetcher::new().with_response("https://example.test/a", b"abc".to_vec());
/// assert_eq!(fetcher.fetch("https://example.test/a").unwrap(), b"abc");
/// assert!(fetcher.fetch("https://example.test/b").is_err());
/// assert_eq!(fetcher.call_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct StubFetcher {
    responses: RefCell<HashMap<String, Vec<u8>>>,
    calls: RefCell<Vec<String>>,
}

impl StubFetcher {
    /// Creates a fetcher that answers 404 to everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`.
    #[must_use]
    pub fn with_response(self, url: impl Into<String>, body: Vec<u8>) -> Self {
        self.set_response(url, body);
        self
    }

    /// Replaces the response served for `url`.
    pub fn set_response(&self, url: impl Into<String>, body: Vec<u8>) {
        self.responses.borrow_mut().insert(url.into(), body);
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of requests made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Forgets recorded requests.
    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        self.responses
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }
}
