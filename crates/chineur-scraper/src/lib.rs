//! Collection pipeline for leboncoin classified-ad searches: request
//! building, lightweight and rendered retrieval, two-tier parsing,
//! geocoding, and run orchestration.

pub mod aggregate;
pub mod client;
pub mod error;
pub mod geocode;
pub mod parse;
pub mod render;
pub mod request;
pub mod runner;
pub mod throttle;
pub mod types;

pub use aggregate::{aggregate, AggregateFilters, SortOrder};
pub use client::{extract_origin, SearchClient};
pub use error::ScrapeError;
pub use geocode::{geocode_city, GeocodeError, NOMINATIM_ENDPOINT};
pub use parse::parse_listings;
pub use render::{
    render_page, BrowserLauncher, BrowserSession, RenderError, RenderPacing, WebDriverLauncher,
};
pub use request::{SearchRequest, SEARCH_ORIGIN};
pub use runner::{RunReport, SearchPlan, SearchRunner, ValuationContext};
pub use throttle::{CancelToken, RequestPacer};
pub use types::{FetchStrategy, RetrievedContent};
