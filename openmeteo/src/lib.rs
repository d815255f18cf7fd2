//! Open-Meteo backed implementations of the elevation and geocoding
//! gateways.
//!
//! Both clients are blocking; the assessment pipeline is synchronous
//! and makes exactly one elevation request per run. Timeouts are
//! transport policy and live here, not in the core.
//!
//! # References
//!
//! 1. [Elevation API](https://open-meteo.com/en/docs/elevation-api)
//! 1. [Geocoding API](https://open-meteo.com/en/docs/geocoding-api)

use log::debug;
use orography::{geo::Point, ElevationSource, Geocoder, OrographyError, Place};
use serde::Deserialize;
use std::time::Duration;

const ELEVATION_URL: &str = "https://api.open-meteo.com/v1/elevation";
const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Transport timeout. The pipeline never retries, so a hung request
/// should fail the computation promptly.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Batched elevation lookups against the Open-Meteo elevation API.
pub struct ElevationClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl ElevationClient {
    pub fn new() -> Result<Self, OrographyError> {
        Self::with_url(ELEVATION_URL)
    }

    /// Points the client at a non-default provider URL.
    pub fn with_url(url: impl Into<String>) -> Result<Self, OrographyError> {
        Ok(Self {
            client: http_client()?,
            url: url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    elevation: Option<Vec<Option<f64>>>,
}

impl ElevationSource for ElevationClient {
    fn elevations(&self, points: &[Point<f64>]) -> Result<Vec<Option<f64>>, OrographyError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        // The multi-point form takes comma-joined coordinate lists
        // and answers in request order.
        let latitude = join_coords(points.iter().map(|point| point.y()));
        let longitude = join_coords(points.iter().map(|point| point.x()));
        debug!("elevation request; points: {}", points.len());

        let response: ElevationResponse = self
            .client
            .get(&self.url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
            ])
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(OrographyError::gateway)?
            .json()
            .map_err(OrographyError::gateway)?;

        Ok(response.elevation.unwrap_or_default())
    }
}

/// Best-match address resolution against the Open-Meteo geocoding
/// API.
pub struct GeocodeClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl GeocodeClient {
    pub fn new() -> Result<Self, OrographyError> {
        Self::with_url(GEOCODING_URL)
    }

    /// Points the client at a non-default provider URL.
    pub fn with_url(url: impl Into<String>) -> Result<Self, OrographyError> {
        Ok(Self {
            client: http_client()?,
            url: url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeHit>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
}

impl Geocoder for GeocodeClient {
    fn geocode(&self, query: &str, country: Option<&str>) -> Result<Place, OrographyError> {
        let mut params = vec![("name", query.to_string()), ("count", "1".to_string())];
        if let Some(code) = country {
            params.push(("countryCode", code.to_string()));
        }
        debug!("geocode request; query: {query:?}");

        let response: GeocodeResponse = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(OrographyError::gateway)?
            .json()
            .map_err(OrographyError::gateway)?;

        let hit = response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| OrographyError::GeocodeNotFound(query.to_string()))?;

        let label = match &hit.country {
            Some(country) => format!("{}, {country}", hit.name),
            None => hit.name.clone(),
        };
        Ok(Place {
            location: Point::new(hit.longitude, hit.latitude),
            label,
        })
    }
}

fn http_client() -> Result<reqwest::blocking::Client, OrographyError> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(OrographyError::gateway)
}

/// Comma-joins coordinates for the multi-point query form.
fn join_coords(values: impl Iterator<Item = f64>) -> String {
    values
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::{join_coords, ElevationResponse, GeocodeResponse};

    #[test]
    fn test_join_coords() {
        let joined = join_coords([48.8566, 48.8611, 48.8521].into_iter());
        assert_eq!(joined, "48.8566,48.8611,48.8521");
    }

    #[test]
    fn test_elevation_response_decodes_nulls() {
        let body = r#"{"elevation":[38.2,null,12.0]}"#;
        let response: ElevationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.elevation, Some(vec![Some(38.2), None, Some(12.0)]));
    }

    #[test]
    fn test_elevation_response_without_payload() {
        let body = r#"{"reason":"rate limited"}"#;
        let response: ElevationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.elevation, None);
    }

    #[test]
    fn test_geocode_response_best_match() {
        let body = r#"{
            "results": [
                {"latitude": 48.85341, "longitude": 2.3488, "name": "Paris", "country": "France"},
                {"latitude": 33.66094, "longitude": -95.55551, "name": "Paris", "country": "United States"}
            ],
            "generationtime_ms": 0.9
        }"#;
        let response: GeocodeResponse = serde_json::from_str(body).unwrap();
        let results = response.results.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Paris");
        assert_eq!(results[0].country.as_deref(), Some("France"));
    }

    #[test]
    fn test_geocode_response_no_match() {
        let body = r#"{"generationtime_ms": 0.5}"#;
        let response: GeocodeResponse = serde_json::from_str(body).unwrap();
        assert!(response.results.is_none());
    }
}
