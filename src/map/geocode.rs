//! Place search boundary.
//!
//! Results follow the Nominatim JSON shape, where coordinates arrive as decimal
//! strings. Network access belongs to implementors of [`Geocoder`]; this module
//! only builds the request URL and interprets responses.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::error::{PindropError, Result};

/// Nominatim search endpoint.
pub const SEARCH_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Maximum number of results requested per search.
pub const RESULT_LIMIT: usize = 5;

/// One place returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

impl GeocodeResult {
    /// Parses the coordinates into `(lat, lng)`.
    ///
    /// # Errors
    ///
    /// Returns [`PindropError::Geocode`] if either value is not a finite number
    /// or lies outside the valid latitude/longitude range.
    pub fn coordinates(&self) -> Result<(f64, f64)> {
        let lat = parse_degrees("latitude", &self.lat, 90.0)?;
        let lng = parse_degrees("longitude", &self.lon, 180.0)?;
        Ok((lat, lng))
    }
}

fn parse_degrees(what: &str, raw: &str, limit: f64) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PindropError::Geocode(format!("{what} is not a number: {raw:?}")))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(PindropError::Geocode(format!("{what} out of range: {raw}")));
    }
    Ok(value)
}

/// Resolves free-text place queries to candidate locations.
pub trait Geocoder {
    /// Searches for places matching `query`, best match first.
    ///
    /// # Errors
    ///
    /// Implementations return [`PindropError::Geocode`] when the lookup fails.
    fn search(&self, query: &str) -> Result<Vec<GeocodeResult>>;
}

/// Builds the search URL for a query. Returns `None` for a blank query.
#[must_use]
pub fn search_url(query: &str) -> Option<Url> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let limit = RESULT_LIMIT.to_string();
    Url::parse_with_params(SEARCH_ENDPOINT, [("format", "json"), ("q", query), ("limit", limit.as_str())]).ok()
}

/// Parses a search response body.
///
/// # Errors
///
/// Returns [`PindropError::Geocode`] if the body is not a JSON array of results.
pub fn parse_results(body: &str) -> Result<Vec<GeocodeResult>> {
    serde_json::from_str(body).map_err(|e| PindropError::Geocode(format!("unexpected search response: {e}")))
}
