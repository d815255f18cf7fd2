//! Spherical offset math, adapted from the destination routines in
//! the [geo] crate to use this crate's fixed mean earth radius.
//!
//! [geo](https://github.com/georust/geo)

use crate::constants::MEAN_EARTH_RADIUS;
use geo::{CoordFloat, Point};
use num_traits::FromPrimitive;

/// Returns the point `distance_m` meters from `origin` along
/// `bearing_deg`, measured clockwise from true north (0/90/180/270 =
/// N/E/S/W).
///
/// Closed-form great-circle math on a sphere of radius
/// [`MEAN_EARTH_RADIUS`]; output longitude is normalized into
/// [-180, 180]. Total over all valid inputs; at the poles bearing
/// degenerates but the result is still defined.
pub fn destination<T>(origin: Point<T>, distance_m: T, bearing_deg: T) -> Point<T>
where
    T: CoordFloat + FromPrimitive,
{
    let lon1 = origin.x().to_radians();
    let lat1 = origin.y().to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_m / T::from(MEAN_EARTH_RADIUS).unwrap();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Point::new(normalize_longitude(lon2.to_degrees()), lat2.to_degrees())
}

fn normalize_longitude<T: CoordFloat>(deg: T) -> T {
    let half = T::from(180.0).unwrap();
    let full = T::from(360.0).unwrap();
    ((deg + half) % full + full) % full - half
}
