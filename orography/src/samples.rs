//! The fixed nine-point sampling plan around a site.

use crate::math::destination;
use geo::Point;

/// Ring distances from the site, meters.
pub const RING_DISTANCES_M: [f64; 2] = [500.0, 1000.0];

/// Points in a sampling plan: the center plus four cardinal
/// directions at each ring distance.
pub const SAMPLE_COUNT: usize = 9;

/// Which plan slot a sample fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLabel {
    Center,
    North,
    East,
    South,
    West,
}

impl SampleLabel {
    /// Compass bearing for ring labels, `None` for the center.
    pub fn bearing_deg(self) -> Option<f64> {
        match self {
            Self::Center => None,
            Self::North => Some(0.0),
            Self::East => Some(90.0),
            Self::South => Some(180.0),
            Self::West => Some(270.0),
        }
    }
}

impl std::fmt::Display for SampleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Center => "CENTER",
            Self::North => "N",
            Self::East => "E",
            Self::South => "S",
            Self::West => "W",
        };
        write!(f, "{s}")
    }
}

/// One sampling location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub label: SampleLabel,

    /// Great-circle distance from the site, meters (0 for the
    /// center).
    pub distance_m: f64,

    /// Compass bearing from the site, absent for the center.
    pub bearing_deg: Option<f64>,

    /// WGS84 location of the sample.
    pub location: Point<f64>,
}

/// The ordered sampling plan for one site.
///
/// Order is a contract shared with the elevation gateway and the
/// factor computation: CENTER, N-500, N-1000, E-500, E-1000, S-500,
/// S-1000, W-500, W-1000.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    points: Vec<SamplePoint>,
}

impl SampleSet {
    /// Builds the plan around `origin`, ring points via great-circle
    /// offsets.
    pub fn build(origin: Point<f64>) -> Self {
        let mut points = Vec::with_capacity(SAMPLE_COUNT);
        points.push(SamplePoint {
            label: SampleLabel::Center,
            distance_m: 0.0,
            bearing_deg: None,
            location: origin,
        });
        for label in [
            SampleLabel::North,
            SampleLabel::East,
            SampleLabel::South,
            SampleLabel::West,
        ] {
            // Ring labels always carry a bearing.
            let Some(bearing) = label.bearing_deg() else {
                continue;
            };
            for distance_m in RING_DISTANCES_M {
                points.push(SamplePoint {
                    label,
                    distance_m,
                    bearing_deg: Some(bearing),
                    location: destination(origin, distance_m, bearing),
                });
            }
        }
        Self { points }
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Sample locations in plan order, the shape the elevation
    /// gateway consumes.
    pub fn locations(&self) -> Vec<Point<f64>> {
        self.points.iter().map(|sample| sample.location).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{SampleLabel, SampleSet, SAMPLE_COUNT};
    use approx::assert_relative_eq;
    use geo::point;

    #[test]
    fn test_plan_order() {
        use SampleLabel::{Center, East, North, South, West};

        let plan = SampleSet::build(point!(x: 2.3522, y: 48.8566));
        let expected = [
            (Center, 0.0),
            (North, 500.0),
            (North, 1000.0),
            (East, 500.0),
            (East, 1000.0),
            (South, 500.0),
            (South, 1000.0),
            (West, 500.0),
            (West, 1000.0),
        ];
        assert_eq!(plan.points().len(), SAMPLE_COUNT);
        for (sample, (label, distance_m)) in plan.points().iter().zip(expected) {
            assert_eq!(sample.label, label);
            assert_relative_eq!(sample.distance_m, distance_m);
            assert_eq!(sample.bearing_deg, label.bearing_deg());
        }
    }

    #[test]
    fn test_ring_geometry() {
        let origin = point!(x: 2.3522, y: 48.8566);
        let plan = SampleSet::build(origin);
        let points = plan.points();

        // Center sits on the origin.
        assert_eq!(points[0].location, origin);
        // N-500 is due north, W-500 is due west.
        assert!(points[1].location.y() > origin.y());
        assert_relative_eq!(points[1].location.x(), origin.x(), epsilon = 1e-9);
        assert!(points[7].location.x() < origin.x());
        // N-1000 is twice as far up as N-500.
        let dlat_500 = points[1].location.y() - origin.y();
        let dlat_1000 = points[2].location.y() - origin.y();
        assert_relative_eq!(dlat_1000, 2.0 * dlat_500, epsilon = 1e-9);
    }
}
