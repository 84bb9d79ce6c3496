//! Shared value types for the retrieval pipeline.

/// Raw page content plus the locator it was fetched from. Built per
/// retrieval attempt and handed straight to the parser; never retained.
#[derive(Debug, Clone)]
pub struct RetrievedContent {
    pub body: String,
    /// The exact URL the body was fetched from; also the base for
    /// absolutizing relative ad URLs.
    pub url: String,
}

/// How a search page is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// One plain HTTP GET. Fast, but the origin frequently serves blocked
    /// or incomplete pages to it.
    Lightweight,
    /// A disposable browser session with scroll-triggered lazy loading.
    /// Slow, higher success rate.
    Rendered,
}
