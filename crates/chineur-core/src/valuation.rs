//! Margin estimation over detected attributes: acquisition cost after an
//! assumed negotiation discount, resale value with a dismantle bonus, and
//! the spread between the two.

use std::collections::BTreeMap;

use crate::Listing;

/// Percentages driving the margin model. Both are interpreted in `[0,100]`;
/// out-of-range values are clamped into range when applied, never rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationParams {
    /// Assumed discount off the asking price.
    pub negotiation_pct: f64,
    /// Assumed uplift from reselling components separately.
    pub dismantle_bonus_pct: f64,
}

impl ValuationParams {
    fn clamped(self) -> Self {
        Self {
            negotiation_pct: self.negotiation_pct.clamp(0.0, 100.0),
            dismantle_bonus_pct: self.dismantle_bonus_pct.clamp(0.0, 100.0),
        }
    }
}

/// Recompute every derived field of a listing from its detected attributes.
///
/// Returns an updated copy; the input is untouched. The three derived
/// fields are always written together:
///
/// - `attribute_value_total` = sum of count x unit value over
///   `detected_attributes` (keys missing from `values` contribute nothing);
/// - `negotiated_price` = `price x (1 - negotiation_pct/100)`, absent when
///   `price` is absent;
/// - `estimated_margin` =
///   `attribute_value_total x (1 + dismantle_bonus_pct/100) - negotiated_price`,
///   absent when `negotiated_price` is absent.
///
/// An absent margin means "not computable without a price" and is distinct
/// from a margin of zero.
#[must_use]
pub fn valuate(listing: &Listing, values: &BTreeMap<String, f64>, params: ValuationParams) -> Listing {
    let params = params.clamped();
    let mut out = listing.clone();

    let attribute_value_total: f64 = listing
        .detected_attributes
        .iter()
        .map(|(key, count)| values.get(key).copied().unwrap_or(0.0) * f64::from(*count))
        .sum();

    out.attribute_value_total = attribute_value_total;
    out.negotiated_price = listing
        .price
        .map(|p| p * (1.0 - params.negotiation_pct / 100.0));
    out.estimated_margin = out
        .negotiated_price
        .map(|negotiated| attribute_value_total * (1.0 + params.dismantle_bonus_pct / 100.0) - negotiated);

    out
}
