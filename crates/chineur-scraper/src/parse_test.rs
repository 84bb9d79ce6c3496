use serde_json::json;

use super::*;

fn page(url: &str, body: &str) -> RetrievedContent {
    RetrievedContent {
        body: body.to_string(),
        url: url.to_string(),
    }
}

fn search_page(body: &str) -> RetrievedContent {
    page("https://www.leboncoin.fr/recherche/?text=pc&page=1", body)
}

/// Wraps an ads array in the origin's server-rendered data block.
fn next_data_page(ads: serde_json::Value) -> String {
    let payload = json!({
        "props": { "pageProps": { "searchData": { "ads": ads } } }
    });
    format!(
        "<!DOCTYPE html><html><body>\
         <script id=\"__NEXT_DATA__\" type=\"application/json\">{payload}</script>\
         </body></html>"
    )
}

// ---------------------------------------------------------------------------
// Structured-data tier
// ---------------------------------------------------------------------------

#[test]
fn embedded_tier_parses_full_records() {
    let body = next_data_page(json!([{
        "subject": "PC gamer RTX 3070",
        "url": "/ad/informatique/2431.htm",
        "price": 45_000,
        "location": { "city": "Nantes", "lat": 47.218, "lng": -1.554 },
        "index_date": "2024-05-01 10:22:00",
        "images": [
            { "url": "https://img.test/1.jpg" },
            { "url": "https://img.test/2.jpg" }
        ],
        "body": "Vends PC gamer, RTX 3070, 32 Go"
    }]));

    let listings = parse_listings(&search_page(&body));

    assert_eq!(listings.len(), 1);
    let listing = &listings[0];
    assert_eq!(listing.source, "leboncoin");
    assert_eq!(listing.title, "PC gamer RTX 3070");
    assert_eq!(
        listing.url,
        "https://www.leboncoin.fr/ad/informatique/2431.htm"
    );
    // 45000 cents -> 450 EUR
    assert!((listing.price.unwrap() - 450.0).abs() < 1e-9);
    assert_eq!(listing.location.as_deref(), Some("Nantes"));
    assert!((listing.latitude.unwrap() - 47.218).abs() < 1e-9);
    assert!((listing.longitude.unwrap() - (-1.554)).abs() < 1e-9);
    assert_eq!(listing.published_at.as_deref(), Some("2024-05-01 10:22:00"));
    assert_eq!(listing.images, vec!["https://img.test/1.jpg".to_string()]);
    assert_eq!(
        listing.description.as_deref(),
        Some("Vends PC gamer, RTX 3070, 32 Go")
    );
}

#[test]
fn embedded_tier_accepts_field_alternatives() {
    let body = next_data_page(json!([{
        "title": "Ecran 27 pouces",
        "shareLink": "https://www.leboncoin.fr/ad/informatique/99.htm",
        "price": { "value": 350 },
        "location": { "label": "Rennes 35000", "latitude": "48.11", "longitude": "-1.68" },
        "first_publication_date": "2024-04-28 08:00:00"
    }]));

    let listings = parse_listings(&search_page(&body));

    assert_eq!(listings.len(), 1);
    let listing = &listings[0];
    assert_eq!(listing.title, "Ecran 27 pouces");
    assert_eq!(listing.url, "https://www.leboncoin.fr/ad/informatique/99.htm");
    assert!((listing.price.unwrap() - 350.0).abs() < 1e-9);
    assert_eq!(listing.location.as_deref(), Some("Rennes 35000"));
    assert!((listing.latitude.unwrap() - 48.11).abs() < 1e-9);
    assert!((listing.longitude.unwrap() - (-1.68)).abs() < 1e-9);
    assert_eq!(
        listing.published_at.as_deref(),
        Some("2024-04-28 08:00:00")
    );
    assert!(listing.images.is_empty());
}

#[test]
fn embedded_tier_price_shapes() {
    let body = next_data_page(json!([
        { "subject": "a", "url": "/ad/1.htm", "price": [30_000] },
        { "subject": "b", "url": "/ad/2.htm", "price": 0 },
        { "subject": "c", "url": "/ad/3.htm" }
    ]));

    let listings = parse_listings(&search_page(&body));

    assert_eq!(listings.len(), 3);
    assert!((listings[0].price.unwrap() - 300.0).abs() < 1e-9);
    assert_eq!(listings[1].price, None, "zero price is absent, not free");
    assert_eq!(listings[2].price, None);
}

#[test]
fn embedded_tier_minor_unit_boundary() {
    let body = next_data_page(json!([
        { "subject": "at threshold", "url": "/ad/1.htm", "price": 10_000 },
        { "subject": "above threshold", "url": "/ad/2.htm", "price": 10_001 }
    ]));

    let listings = parse_listings(&search_page(&body));

    assert!((listings[0].price.unwrap() - 10_000.0).abs() < 1e-9);
    assert!((listings[1].price.unwrap() - 100.01).abs() < 1e-9);
}

#[test]
fn embedded_tier_drops_ads_without_url() {
    let body = next_data_page(json!([
        { "subject": "no identity" },
        { "subject": "kept", "url": "/ad/7.htm" }
    ]));

    let listings = parse_listings(&search_page(&body));

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].title, "kept");
}

#[test]
fn embedded_tier_untitled_sentinel() {
    let body = next_data_page(json!([{ "url": "/ad/8.htm" }]));

    let listings = parse_listings(&search_page(&body));

    assert_eq!(listings[0].title, UNTITLED);
}

// ---------------------------------------------------------------------------
// Fallback to the markup tier
// ---------------------------------------------------------------------------

#[test]
fn malformed_embedded_json_falls_through_to_cards() {
    let body = "<html><body>\
        <script id=\"__NEXT_DATA__\" type=\"application/json\">{oops</script>\
        <a data-qa-id='aditem_container' href='/ad/1.htm'><span>Velo enfant</span> 45 €</a>\
        </body></html>";

    let listings = parse_listings(&search_page(body));

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].title, "Velo enfant");
    assert!((listings[0].price.unwrap() - 45.0).abs() < 1e-9);
}

#[test]
fn missing_ads_path_falls_through_to_cards() {
    let body = format!(
        "<html><body>\
         <script id=\"__NEXT_DATA__\" type=\"application/json\">{}</script>\
         <a class='trackable' href='/ad/2.htm'><h2>Table basse</h2></a>\
         </body></html>",
        json!({ "props": { "pageProps": {} } })
    );

    let listings = parse_listings(&search_page(&body));

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].title, "Table basse");
}

#[test]
fn empty_ads_array_falls_through_to_cards() {
    let mut body = next_data_page(json!([]));
    body.push_str("<a class='AdCard__Link' href='/ad/3.htm'><span>Chaise</span></a>");

    let listings = parse_listings(&search_page(&body));

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].title, "Chaise");
}

#[test]
fn embedded_tier_wins_when_it_yields_records() {
    let mut body = next_data_page(json!([{ "subject": "from data", "url": "/ad/1.htm" }]));
    body.push_str("<a class='trackable' href='/ad/2.htm'><span>from cards</span></a>");

    let listings = parse_listings(&search_page(&body));

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].title, "from data");
}

// ---------------------------------------------------------------------------
// Markup-pattern tier
// ---------------------------------------------------------------------------

#[test]
fn cards_tier_extracts_title_price_and_image() {
    let body = "<html><body>\
        <a data-qa-id='aditem_container' href='/ad/velo/55.htm'>\
          <span>VTT adulte</span><p>1 500 €</p>\
          <img src='https://img.test/thumb.jpg'>\
        </a></body></html>";

    let listings = parse_listings(&search_page(body));

    assert_eq!(listings.len(), 1);
    let listing = &listings[0];
    assert_eq!(listing.title, "VTT adulte");
    assert_eq!(listing.url, "https://www.leboncoin.fr/ad/velo/55.htm");
    assert!((listing.price.unwrap() - 1_500.0).abs() < 1e-9);
    assert_eq!(listing.images, vec!["https://img.test/thumb.jpg".to_string()]);
}

#[test]
fn cards_tier_handles_non_breaking_spaces_in_price() {
    let body = "<html><body>\
        <a class='trackable' href='/ad/9.htm'><span>Buffet</span> 2\u{a0}300\u{a0}€</a>\
        </body></html>";

    let listings = parse_listings(&search_page(body));

    assert!((listings[0].price.unwrap() - 2_300.0).abs() < 1e-9);
}

#[test]
fn cards_tier_price_requires_currency_mark() {
    let body = "<html><body>\
        <a class='trackable' href='/ad/10.htm'><span>Ref 1500 sans prix</span></a>\
        </body></html>";

    let listings = parse_listings(&search_page(body));

    assert_eq!(listings[0].price, None);
}

#[test]
fn cards_tier_missing_title_uses_sentinel() {
    let body = "<html><body>\
        <a class='AdCard__Link' href='/ad/11.htm'><p>120 €</p></a>\
        </body></html>";

    let listings = parse_listings(&search_page(body));

    assert_eq!(listings[0].title, UNTITLED);
    assert!((listings[0].price.unwrap() - 120.0).abs() < 1e-9);
}

#[test]
fn cards_tier_resolves_relative_urls_against_content_origin() {
    let body = "<html><body>\
        <a class='trackable' href='/ad/12.htm'><span>Lampe</span></a>\
        <a class='trackable' href='https://elsewhere.test/ad/13.htm'><span>Miroir</span></a>\
        </body></html>";

    let listings = parse_listings(&page("http://127.0.0.1:7777/recherche/?text=x", body));

    assert_eq!(listings[0].url, "http://127.0.0.1:7777/ad/12.htm");
    assert_eq!(listings[1].url, "https://elsewhere.test/ad/13.htm");
}

#[test]
fn cards_tier_skips_anchors_without_href() {
    let body = "<html><body>\
        <a class='trackable'><span>sans lien</span></a>\
        <a class='trackable' href=''><span>lien vide</span></a>\
        <a class='trackable' href='/ad/14.htm'><span>ok</span></a>\
        </body></html>";

    let listings = parse_listings(&search_page(body));

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].title, "ok");
}

#[test]
fn unparseable_content_yields_empty_sequence() {
    let listings = parse_listings(&search_page("not markup at all"));
    assert!(listings.is_empty());

    let listings = parse_listings(&search_page(""));
    assert!(listings.is_empty());
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

#[test]
fn absolutize_prefixes_relative_hrefs() {
    assert_eq!(
        absolutize("/ad/1.htm", "https://www.leboncoin.fr"),
        "https://www.leboncoin.fr/ad/1.htm"
    );
}

#[test]
fn absolutize_keeps_absolute_hrefs() {
    assert_eq!(
        absolutize("https://www.leboncoin.fr/ad/1.htm", "https://www.leboncoin.fr"),
        "https://www.leboncoin.fr/ad/1.htm"
    );
}
