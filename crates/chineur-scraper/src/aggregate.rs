//! Merging, filtering, and ordering of listings gathered across queries
//! and pages.

use std::cmp::Ordering;
use std::collections::HashSet;

use chineur_core::{haversine_km, GeoPoint, Listing};

/// Final ordering applied to the merged result set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Cheapest first; listings without a price go last.
    #[default]
    PriceAscending,
    /// Best estimated margin first; listings without one go last.
    MarginDescending,
}

/// Post-collection filters and ordering for [`aggregate`].
///
/// Every filter is optional. The radius filter only applies when both a
/// reference point and a radius are present.
#[derive(Clone, Debug, Default)]
pub struct AggregateFilters {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub reference: Option<GeoPoint>,
    pub radius_km: Option<f64>,
    pub order: SortOrder,
}

/// Flattens per-page batches into one result set.
///
/// Duplicates (same URL) keep their first occurrence, filters drop
/// listings that are known to fall outside the requested bounds, and the
/// survivors are sorted per `filters.order`. Listings missing the data a
/// filter needs are kept rather than guessed at.
#[must_use]
pub fn aggregate(batches: Vec<Vec<Listing>>, filters: &AggregateFilters) -> Vec<Listing> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Listing> = Vec::new();
    for listing in batches.into_iter().flatten() {
        if seen.insert(listing.url.clone()) {
            merged.push(listing);
        }
    }

    merged.retain(|listing| passes_price(listing, filters.price_min, filters.price_max));

    if let (Some(reference), Some(radius_km)) = (filters.reference, filters.radius_km) {
        merged.retain(|listing| passes_radius(listing, reference, radius_km));
    }

    match filters.order {
        SortOrder::PriceAscending => {
            merged.sort_by(|a, b| ascending_absent_last(a.price, b.price));
        }
        SortOrder::MarginDescending => {
            merged.sort_by(|a, b| descending_absent_last(a.estimated_margin, b.estimated_margin));
        }
    }

    merged
}

fn passes_price(listing: &Listing, min: Option<f64>, max: Option<f64>) -> bool {
    let Some(price) = listing.price else {
        return true;
    };
    if min.is_some_and(|bound| price < bound) {
        return false;
    }
    if max.is_some_and(|bound| price > bound) {
        return false;
    }
    true
}

fn passes_radius(listing: &Listing, reference: GeoPoint, radius_km: f64) -> bool {
    match (listing.latitude, listing.longitude) {
        (Some(latitude), Some(longitude)) => {
            let point = GeoPoint {
                latitude,
                longitude,
            };
            haversine_km(reference, point) <= radius_km
        }
        _ => true,
    }
}

fn ascending_absent_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn descending_absent_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(url: &str, price: Option<f64>) -> Listing {
        let mut listing = Listing::new(url.to_string(), "t".to_string());
        listing.price = price;
        listing
    }

    fn located(url: &str, latitude: f64, longitude: f64) -> Listing {
        let mut listing = listing(url, None);
        listing.latitude = Some(latitude);
        listing.longitude = Some(longitude);
        listing
    }

    #[test]
    fn duplicates_keep_the_first_occurrence() {
        let first = listing("https://x.test/1", Some(10.0));
        let shadow = listing("https://x.test/1", Some(99.0));
        let other = listing("https://x.test/2", Some(20.0));

        let merged = aggregate(
            vec![vec![first, other], vec![shadow]],
            &AggregateFilters::default(),
        );

        assert_eq!(merged.len(), 2);
        assert!((merged[0].price.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn price_filter_keeps_listings_without_a_price() {
        let filters = AggregateFilters {
            price_min: Some(50.0),
            ..AggregateFilters::default()
        };

        let merged = aggregate(
            vec![vec![
                listing("https://x.test/1", None),
                listing("https://x.test/2", Some(40.0)),
                listing("https://x.test/3", Some(60.0)),
            ]],
            &filters,
        );

        let urls: Vec<&str> = merged.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x.test/3", "https://x.test/1"]);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filters = AggregateFilters {
            price_min: Some(50.0),
            price_max: Some(100.0),
            ..AggregateFilters::default()
        };

        let merged = aggregate(
            vec![vec![
                listing("https://x.test/1", Some(50.0)),
                listing("https://x.test/2", Some(100.0)),
                listing("https://x.test/3", Some(49.99)),
                listing("https://x.test/4", Some(100.01)),
            ]],
            &filters,
        );

        let urls: Vec<&str> = merged.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x.test/1", "https://x.test/2"]);
    }

    #[test]
    fn radius_filter_needs_both_reference_and_radius() {
        // Paris reference, listing in Lyon, well outside 10 km.
        let far = located("https://x.test/far", 45.764, 4.8357);

        let no_reference = AggregateFilters {
            radius_km: Some(10.0),
            ..AggregateFilters::default()
        };
        assert_eq!(aggregate(vec![vec![far.clone()]], &no_reference).len(), 1);

        let no_radius = AggregateFilters {
            reference: Some(GeoPoint {
                latitude: 48.8566,
                longitude: 2.3522,
            }),
            ..AggregateFilters::default()
        };
        assert_eq!(aggregate(vec![vec![far]], &no_radius).len(), 1);
    }

    #[test]
    fn radius_filter_drops_far_listings_and_keeps_unlocated_ones() {
        let filters = AggregateFilters {
            reference: Some(GeoPoint {
                latitude: 48.8566,
                longitude: 2.3522,
            }),
            radius_km: Some(10.0),
            ..AggregateFilters::default()
        };

        let merged = aggregate(
            vec![vec![
                located("https://x.test/nearby", 48.86, 2.36),
                located("https://x.test/lyon", 45.764, 4.8357),
                listing("https://x.test/unlocated", Some(30.0)),
            ]],
            &filters,
        );

        let urls: Vec<&str> = merged.iter().map(|l| l.url.as_str()).collect();
        assert!(urls.contains(&"https://x.test/nearby"));
        assert!(urls.contains(&"https://x.test/unlocated"));
        assert!(!urls.contains(&"https://x.test/lyon"));
    }

    #[test]
    fn price_ascending_puts_unpriced_listings_last() {
        let merged = aggregate(
            vec![vec![
                listing("https://x.test/none", None),
                listing("https://x.test/30", Some(30.0)),
                listing("https://x.test/10", Some(10.0)),
            ]],
            &AggregateFilters::default(),
        );

        let urls: Vec<&str> = merged.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://x.test/10", "https://x.test/30", "https://x.test/none"]
        );
    }

    #[test]
    fn margin_descending_puts_unvalued_listings_last() {
        let mut best = listing("https://x.test/best", Some(100.0));
        best.estimated_margin = Some(120.0);
        let mut worse = listing("https://x.test/worse", Some(100.0));
        worse.estimated_margin = Some(50.0);
        let unvalued = listing("https://x.test/unvalued", Some(5.0));

        let filters = AggregateFilters {
            order: SortOrder::MarginDescending,
            ..AggregateFilters::default()
        };
        let merged = aggregate(vec![vec![worse, unvalued, best]], &filters);

        let urls: Vec<&str> = merged.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://x.test/best",
                "https://x.test/worse",
                "https://x.test/unvalued"
            ]
        );
    }

    #[test]
    fn equal_keys_preserve_insertion_order() {
        let merged = aggregate(
            vec![vec![
                listing("https://x.test/a", Some(25.0)),
                listing("https://x.test/b", Some(25.0)),
                listing("https://x.test/c", Some(25.0)),
            ]],
            &AggregateFilters::default(),
        );

        let urls: Vec<&str> = merged.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://x.test/a", "https://x.test/b", "https://x.test/c"]
        );
    }
}
