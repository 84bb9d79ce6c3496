//! The normalized classified-ad record produced by the parser and consumed
//! by the detector, valuation engine, and aggregator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Origin site identifier stamped on every listing.
pub const SOURCE_NAME: &str = "leboncoin";

/// Prices strictly above this are assumed to be expressed in minor units
/// (cents) by the origin and are divided by 100. The cutoff is a heuristic
/// carried over from observed origin payloads; it can misread a genuine
/// major-unit price above 10000.
pub const MINOR_UNIT_THRESHOLD: f64 = 10_000.0;

/// One classified ad, normalized. The `url` is the identity key for
/// deduplication and is never rewritten after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Origin site, always [`SOURCE_NAME`] for listings built by this crate.
    pub source: String,
    /// Absolute ad URL; identity key for deduplication.
    pub url: String,
    /// Display title; a sentinel string when the origin omitted it.
    pub title: String,
    /// Asking price in major currency units (EUR), when the origin exposed
    /// one. Absent is not zero.
    pub price: Option<f64>,
    /// Human-readable place label (city or zone), when present.
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Publication timestamp exactly as the origin emitted it; never
    /// reparsed.
    pub published_at: Option<String>,
    /// Image URLs in origin order.
    pub images: Vec<String>,
    /// Free-text ad body, when the structured payload carried one.
    pub description: Option<String>,
    /// Attribute key to non-overlapping match count; keys with zero matches
    /// are never present. Empty until detection runs.
    #[serde(default)]
    pub detected_attributes: BTreeMap<String, u32>,
    /// Sum over detected attributes of count x configured unit value.
    #[serde(default)]
    pub attribute_value_total: f64,
    /// Asking price after the assumed negotiation discount; absent whenever
    /// `price` is absent.
    pub negotiated_price: Option<f64>,
    /// Resale margin estimate; absent whenever `negotiated_price` is absent.
    pub estimated_margin: Option<f64>,
}

impl Listing {
    /// A listing with identity fields set and everything else empty.
    #[must_use]
    pub fn new(url: String, title: String) -> Self {
        Self {
            source: SOURCE_NAME.to_string(),
            url,
            title,
            price: None,
            location: None,
            latitude: None,
            longitude: None,
            published_at: None,
            images: Vec::new(),
            description: None,
            detected_attributes: BTreeMap::new(),
            attribute_value_total: 0.0,
            negotiated_price: None,
            estimated_margin: None,
        }
    }

    /// Text the attribute detector scans: title plus ad body when present.
    #[must_use]
    pub fn detection_text(&self) -> String {
        match &self.description {
            Some(body) => format!("{} {body}", self.title),
            None => self.title.clone(),
        }
    }
}

/// Convert an origin price to major currency units.
///
/// Origin payloads mix major-unit prices with minor-unit (cent) prices; see
/// [`MINOR_UNIT_THRESHOLD`].
#[must_use]
pub fn normalize_price_amount(raw: f64) -> f64 {
    if raw > MINOR_UNIT_THRESHOLD {
        raw / 100.0
    } else {
        raw
    }
}
