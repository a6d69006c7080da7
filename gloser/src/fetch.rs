//! Dictionary page downloads.
//!
//! The lookup orchestrator only ever asks one question: "what is the text at
//! this URL, or does the page not exist?". [`PageFetcher`] is that seam; the
//! production implementation wraps the shared [`reqwest::Client`] and tests
//! substitute a scripted fetcher.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

/// Errors that can occur while downloading a page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request failed, or the server answered an error status other
    /// than 404.
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    /// The response body could not be read or decoded.
    #[error("could not read response body: {0}")]
    ReadBody(#[source] reqwest::Error),
}

/// Downloads dictionary pages as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page at `url`.
    ///
    /// Returns `Ok(None)` when the server answers 404, so callers can treat
    /// a missing page as "no match" rather than a failure.
    async fn fetch_text(&self, url: &Url) -> Result<Option<String>, FetchError>;
}

/// A [`PageFetcher`] backed by the shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher on top of an existing client.
    #[must_use]
    pub fn new(client: reqwest::Client) -> HttpFetcher {
        HttpFetcher { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<Option<String>, FetchError> {
        debug!(%url, "fetching page");

        let request = self.client.get(url.clone());
        let response = request.send().await.map_err(FetchError::Request)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(%url, "page does not exist");

            return Ok(None);
        }

        match response.error_for_status() {
            Ok(response) => {
                let body = response.text().await.map_err(FetchError::ReadBody)?;

                Ok(Some(body))
            }
            Err(err) => Err(FetchError::Request(err)),
        }
    }
}
