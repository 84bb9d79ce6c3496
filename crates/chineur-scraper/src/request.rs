//! Search request construction: one immutable request per (query, page)
//! combination, rendered to the origin's search locator.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::ScrapeError;

/// Origin the production pipeline searches against. Tests point the client
/// at a local server instead.
pub const SEARCH_ORIGIN: &str = "https://www.leboncoin.fr";

/// One search-results request, immutable once built. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    location: Option<String>,
    price_min: Option<u32>,
    price_max: Option<u32>,
    page: u32,
}

impl SearchRequest {
    /// Build a request for one page of search results.
    ///
    /// The query is trimmed; surrounding whitespace never reaches the
    /// locator. A `page` of 0 is treated as page 1.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidRequest`] if `query` is empty after
    /// trimming. No other input is rejected.
    pub fn build(
        query: &str,
        location: Option<&str>,
        price_min: Option<u32>,
        price_max: Option<u32>,
        page: u32,
    ) -> Result<Self, ScrapeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScrapeError::InvalidRequest {
                reason: "query text is empty".to_string(),
            });
        }

        Ok(Self {
            query: query.to_string(),
            location: location.map(str::to_string).filter(|l| !l.trim().is_empty()),
            price_min,
            price_max,
            page: page.max(1),
        })
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Render the locator for this request against `origin`.
    ///
    /// Free text is percent-encoded; the same request always yields the
    /// same string. Price bounds become the origin's `lo-hi` range token,
    /// with an open side spelled as the literal `min`/`max` the origin
    /// accepts.
    #[must_use]
    pub fn search_url(&self, origin: &str) -> String {
        let mut url = format!(
            "{origin}/recherche/?text={}&page={}",
            utf8_percent_encode(&self.query, NON_ALPHANUMERIC),
            self.page
        );

        if let Some(location) = &self.location {
            url.push_str("&locations=");
            url.push_str(&utf8_percent_encode(location, NON_ALPHANUMERIC).to_string());
        }

        if let Some(token) = self.price_token() {
            url.push_str("&price=");
            url.push_str(&token);
        }

        url
    }

    fn price_token(&self) -> Option<String> {
        match (self.price_min, self.price_max) {
            (None, None) => None,
            (lo, hi) => Some(format!(
                "{}-{}",
                lo.map_or_else(|| "min".to_string(), |v| v.to_string()),
                hi.map_or_else(|| "max".to_string(), |v| v.to_string()),
            )),
        }
    }
}
