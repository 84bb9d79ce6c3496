//! Lightweight HTTP retrieval of search pages.

mod identity;
mod origin;

use std::time::Duration;

use reqwest::Client;

use crate::error::ScrapeError;
use crate::request::{SearchRequest, SEARCH_ORIGIN};
use crate::types::RetrievedContent;

pub use origin::extract_origin;
pub(crate) use identity::pick_user_agent;

/// HTTP client for the origin's search pages.
///
/// Issues exactly one GET per call with an identity rotated from a fixed
/// pool and the origin's expected accept headers. Any non-2xx status, a
/// timeout, or a transport error comes back as a typed error the caller
/// records as "zero listings for this request"; there is no retry here.
pub struct SearchClient {
    client: Client,
    origin: String,
}

impl SearchClient {
    /// Creates a client against the production origin with the given
    /// overall request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64) -> Result<Self, ScrapeError> {
        Self::with_origin(timeout_secs, SEARCH_ORIGIN)
    }

    /// Creates a client against an alternate origin. Integration tests
    /// point this at a local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_origin(timeout_secs: u64, origin: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        })
    }

    /// Origin search locators are rendered against.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Fetches one search page with the lightweight strategy.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::UnexpectedStatus`] — any non-2xx status.
    /// - [`ScrapeError::Http`] — timeout or transport failure.
    pub async fn fetch_page(&self, request: &SearchRequest) -> Result<RetrievedContent, ScrapeError> {
        let url = request.search_url(&self.origin);
        let user_agent = identity::pick_user_agent();
        tracing::debug!(url = %url, "fetching search page");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(reqwest::header::ACCEPT, identity::ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, identity::ACCEPT_LANGUAGE)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        Ok(RetrievedContent { body, url })
    }
}
