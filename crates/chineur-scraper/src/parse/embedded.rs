//! Structured-data tier: the origin's server-rendered `__NEXT_DATA__`
//! block.
//!
//! Observed payload shape, reduced to the fields this tier reads:
//!
//! ```json
//! {
//!   "props": { "pageProps": { "searchData": { "ads": [ {
//!     "subject": "PC gamer RTX 3070",         // or "title"
//!     "url": "/ad/informatique/123.htm",       // or "shareLink", absolute
//!     "price": 45000,                          // or [45000] or {"value": 450}
//!     "location": { "city": "Nantes",          // or "label"
//!                    "lat": 47.21, "lng": -1.55 },
//!     "index_date": "2024-05-01 10:22:00",     // or "first_publication_date"
//!     "images": [ { "url": "https://img.test/1.jpg" } ],
//!     "body": "Vends PC gamer ..."
//!   } ] } } }
//! }
//! ```
//!
//! Numbers occasionally arrive as strings; both are accepted. Any decode
//! error or missing path yields an empty vector so the markup tier gets
//! its chance.

use chineur_core::{normalize_price_amount, Listing};
use scraper::{Html, Selector};
use serde_json::Value;

use super::{absolutize, UNTITLED};

pub(super) fn extract_listings(html: &str, origin: &str) -> Vec<Listing> {
    let Some(payload) = extract_next_data(html) else {
        return Vec::new();
    };

    let root: Value = match serde_json::from_str(&payload) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "embedded data block is not valid JSON");
            return Vec::new();
        }
    };

    let Some(ads) = root
        .get("props")
        .and_then(|v| v.get("pageProps"))
        .and_then(|v| v.get("searchData"))
        .and_then(|v| v.get("ads"))
        .and_then(Value::as_array)
    else {
        tracing::debug!("embedded data block lacks the expected ads path");
        return Vec::new();
    };

    ads.iter()
        .filter_map(|ad| listing_from_ad(ad, origin))
        .collect()
}

fn extract_next_data(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script#__NEXT_DATA__").expect("valid selector");
    document
        .select(&selector)
        .next()
        .map(|script| script.inner_html())
}

fn listing_from_ad(ad: &Value, origin: &str) -> Option<Listing> {
    // An ad without a URL has no identity to deduplicate on; drop it.
    let href = ad
        .get("url")
        .and_then(Value::as_str)
        .or_else(|| ad.get("shareLink").and_then(Value::as_str))?;

    let title = ad
        .get("subject")
        .and_then(Value::as_str)
        .or_else(|| ad.get("title").and_then(Value::as_str))
        .unwrap_or(UNTITLED);

    let mut listing = Listing::new(absolutize(href, origin), title.to_string());
    listing.price = extract_price(ad);

    if let Some(location) = ad.get("location") {
        listing.location = location
            .get("city")
            .and_then(Value::as_str)
            .or_else(|| location.get("label").and_then(Value::as_str))
            .map(str::to_string);
        listing.latitude = location
            .get("lat")
            .and_then(numeric)
            .or_else(|| location.get("latitude").and_then(numeric));
        listing.longitude = location
            .get("lng")
            .and_then(numeric)
            .or_else(|| location.get("longitude").and_then(numeric));
    }

    listing.published_at = ad
        .get("index_date")
        .and_then(Value::as_str)
        .or_else(|| ad.get("first_publication_date").and_then(Value::as_str))
        .map(str::to_string);

    if let Some(image) = first_image(ad) {
        listing.images.push(image);
    }

    listing.description = ad.get("body").and_then(Value::as_str).map(str::to_string);

    Some(listing)
}

/// Price as the origin encodes it: a bare number, the first element of an
/// array, or an object with a `value` key. A price of zero is treated as
/// absent. Values above the minor-unit threshold are converted to major
/// units.
fn extract_price(ad: &Value) -> Option<f64> {
    let raw = ad.get("price").or_else(|| ad.get("priceCents"))?;

    let amount = match raw {
        Value::Array(items) => items.first().and_then(numeric),
        Value::Object(_) => raw.get("value").and_then(numeric),
        _ => numeric(raw),
    }?;

    if amount.abs() < f64::EPSILON {
        return None;
    }
    Some(normalize_price_amount(amount))
}

fn first_image(ad: &Value) -> Option<String> {
    ad.get("images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .and_then(|image| image.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Accepts a JSON number or a numeric string.
fn numeric(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}
