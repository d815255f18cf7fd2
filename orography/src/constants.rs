/// Mean earth radius in meters, used by the spherical offset math.
pub const MEAN_EARTH_RADIUS: f64 = 6_371_000.0;
