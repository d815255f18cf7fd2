//! Seams to the two external services the pipeline talks to. The
//! core only depends on these traits; HTTP implementations live in
//! the `openmeteo` crate.

use crate::error::OrographyError;
use geo::Point;

/// Batched elevation lookup.
///
/// One request covers a whole sampling plan. Implementations must
/// return exactly one entry per input point, in input order, with
/// `None` marking a point the service has no data for.
pub trait ElevationSource {
    fn elevations(&self, points: &[Point<f64>]) -> Result<Vec<Option<f64>>, OrographyError>;
}

/// Free-text address resolution.
pub trait Geocoder {
    /// Returns the single best match for `query`, optionally narrowed
    /// by an ISO 3166 country code.
    fn geocode(&self, query: &str, country: Option<&str>) -> Result<Place, OrographyError>;
}

/// A geocoded address.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// WGS84 location of the best match.
    pub location: Point<f64>,

    /// Display label reported by the service.
    pub label: String,
}
