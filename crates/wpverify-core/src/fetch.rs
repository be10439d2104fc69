//! Fetching reference material over HTTP.
//!
//! The engine only needs "fetch the bytes behind a URL"; the [`Fetcher`]
//! trait keeps that seam injectable so tests run without network access.

use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Network timeout for a single download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Fetches the full body behind a URL.
pub trait Fetcher {
    /// Downloads `url` and returns its body.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success HTTP status.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: Fetcher + ?Sized> Fetcher for std::rc::Rc<T> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// Errors arising from downloads.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request failed.
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered 404.
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// Reading the response body failed.
    #[error("I/O error reading download: {0}")]
    Io(#[from] std::io::Error),
}

/// [`Fetcher`] backed by a shared `ureq` agent.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(url, "fetching");
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut bytes = Vec::new();
        response.into_body().into_reader().read_to_end(&mut bytes)?;
        debug!(url, bytes = bytes.len(), "fetched");
        Ok(bytes)
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
