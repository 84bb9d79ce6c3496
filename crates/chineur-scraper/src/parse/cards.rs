//! Markup-pattern tier: best-effort extraction from listing-card anchors.
//!
//! Presentational markup is the least stable contract with the origin, so
//! every field except the href defaults rather than fails.

use chineur_core::Listing;
use regex::Regex;
use scraper::{Html, Selector};

use super::{absolutize, UNTITLED};

/// Anchor shapes the origin has used for listing cards.
const CARD_SELECTORS: &str = "a[data-qa-id='aditem_container'], a.AdCard__Link, a.trackable";

pub(super) fn extract_listings(html: &str, origin: &str) -> Vec<Listing> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(CARD_SELECTORS).expect("valid selector");
    let title_selector = Selector::parse("span, h2, h3").expect("valid selector");
    let img_selector = Selector::parse("img").expect("valid selector");
    // A numeral (spaces allowed inside) immediately followed by the euro sign.
    let price_re = Regex::new(r"(\d[\d\s]{0,9})\s*€").expect("valid regex");

    let mut listings = Vec::new();

    for card in document.select(&card_selector) {
        let Some(href) = card.value().attr("href").filter(|h| !h.is_empty()) else {
            continue;
        };

        let title = card
            .select(&title_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let mut listing = Listing::new(absolutize(href, origin), title);

        let flattened = card.text().collect::<Vec<_>>().join(" ");
        listing.price = price_re
            .captures(&flattened)
            .and_then(|caps| caps.get(1))
            .and_then(|numeral| {
                let digits: String = numeral
                    .as_str()
                    .chars()
                    .filter(char::is_ascii_digit)
                    .collect();
                digits.parse::<f64>().ok()
            });

        if let Some(src) = card
            .select(&img_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
        {
            listing.images.push(src.to_string());
        }

        listings.push(listing);
    }

    listings
}
