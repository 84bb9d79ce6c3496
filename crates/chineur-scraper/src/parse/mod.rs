//! Two-tier extraction of listings from retrieved page content.
//!
//! Tier 1 reads the embedded structured-data block the origin renders
//! server-side; tier 2 falls back to markup patterns against the listing
//! cards. Both tiers are pure functions over the markup; neither can fail.
//! A page that defeats both simply parses to an empty sequence.

mod cards;
mod embedded;

use chineur_core::Listing;

use crate::client::extract_origin;
use crate::types::RetrievedContent;

/// Title sentinel when the origin omitted one.
pub(crate) const UNTITLED: &str = "(untitled)";

/// Parse retrieved content into listings. Never fails: unparseable content
/// yields an empty vector.
#[must_use]
pub fn parse_listings(content: &RetrievedContent) -> Vec<Listing> {
    let origin = extract_origin(&content.url);

    let listings = embedded::extract_listings(&content.body, &origin);
    if !listings.is_empty() {
        tracing::debug!(count = listings.len(), "parsed listings from embedded data");
        return listings;
    }

    let listings = cards::extract_listings(&content.body, &origin);
    if listings.is_empty() {
        tracing::warn!(url = %content.url, "no listings found in page content");
    } else {
        tracing::debug!(count = listings.len(), "parsed listings from markup cards");
    }
    listings
}

/// Resolve an ad href against the page origin. The origin never ends with
/// a slash (see [`extract_origin`]).
pub(super) fn absolutize(href: &str, origin: &str) -> String {
    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        href.to_string()
    }
}

#[cfg(test)]
#[path = "../parse_test.rs"]
mod tests;
