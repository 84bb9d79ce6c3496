//! Forward geocoding of city names via the public Nominatim service.
//!
//! Used to resolve the user's reference city before applying a distance
//! filter. Only the single best French match is requested.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use chineur_core::GeoPoint;

/// Production search endpoint. Tests point at a local stand-in.
pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim's usage policy requires an identifying agent.
const GEOCODE_USER_AGENT: &str = "chineur/0.1 (bargain scanner)";

const GEOCODE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no geocoding match for '{city}'")]
    NotFound { city: String },

    #[error("unusable geocoding answer for '{city}': {reason}")]
    Malformed { city: String, reason: String },
}

/// One result row. Nominatim serialises coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Resolves a city name to a coordinate pair.
///
/// # Errors
///
/// Returns [`GeocodeError::Http`] when the request fails or the service
/// answers with an error status, [`GeocodeError::NotFound`] when the city
/// matches nothing, and [`GeocodeError::Malformed`] when the answer cannot
/// be read as coordinates.
pub async fn geocode_city(endpoint: &str, city: &str) -> Result<GeoPoint, GeocodeError> {
    tracing::debug!(city = %city, "geocoding reference city");

    let client = reqwest::Client::builder()
        .timeout(GEOCODE_TIMEOUT)
        .build()?;

    let places: Vec<NominatimPlace> = client
        .get(endpoint)
        .header(reqwest::header::USER_AGENT, GEOCODE_USER_AGENT)
        .query(&[
            ("q", city),
            ("format", "json"),
            ("limit", "1"),
            ("countrycodes", "fr"),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let Some(place) = places.first() else {
        return Err(GeocodeError::NotFound {
            city: city.to_string(),
        });
    };

    let point = GeoPoint {
        latitude: parse_coordinate(&place.lat, "lat", city)?,
        longitude: parse_coordinate(&place.lon, "lon", city)?,
    };
    tracing::debug!(
        city = %city,
        latitude = point.latitude,
        longitude = point.longitude,
        "resolved reference city"
    );
    Ok(point)
}

fn parse_coordinate(raw: &str, field: &str, city: &str) -> Result<f64, GeocodeError> {
    raw.trim().parse().map_err(|_| GeocodeError::Malformed {
        city: city.to_string(),
        reason: format!("{field} value {raw:?} is not a number"),
    })
}
