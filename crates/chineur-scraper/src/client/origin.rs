//! URL origin extraction for absolutizing relative ad links.

/// Extracts the scheme+host origin from a page URL.
///
/// Given `"https://www.leboncoin.fr/recherche/?text=velo"`, returns
/// `"https://www.leboncoin.fr"`. Relative ad hrefs are resolved against
/// this, so listings parsed from a test server stay on that server.
#[must_use]
pub fn extract_origin(page_url: &str) -> String {
    reqwest::Url::parse(page_url).map_or_else(
        |e| {
            tracing::warn!(
                page_url,
                error = %e,
                "could not parse page URL — falling back to string split for origin extraction"
            );
            // fallback: take "https://host" by splitting on '/' and taking first 3 parts
            page_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}
