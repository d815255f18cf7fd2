use crate::{
    error::OrographyError,
    factor::{compute_factor, OrographyResult},
    gateway::ElevationSource,
    samples::SampleSet,
};
use geo::Point;
use lambert::{LambertError, PlanarCoord, PlanarSystem};
use log::debug;

/// Where the caller placed the site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Origin {
    /// WGS84 longitude/latitude.
    Geographic(Point<f64>),

    /// Plane coordinates. The grid is inferred from the northing
    /// magnitude unless named.
    Planar {
        easting: f64,
        northing: f64,
        system: Option<PlanarSystem>,
    },
}

/// A complete orography assessment for one site.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// Site in WGS84.
    pub origin: Point<f64>,

    /// Site on the display grid.
    pub planar: PlanarCoord,

    /// Height above ground the factor was evaluated at, meters.
    pub reference_height_m: f64,

    /// Factor and its intermediate statistics.
    pub orography: OrographyResult,
}

impl Assessment {
    pub fn builder() -> AssessmentBuilder {
        AssessmentBuilder {
            origin: None,
            reference_height_m: None,
            display_system: PlanarSystem::Lambert93,
        }
    }
}

pub struct AssessmentBuilder {
    origin: Option<Origin>,

    /// Height above ground at which the factor is evaluated, meters.
    reference_height_m: Option<f64>,

    /// Grid for the displayed plane coordinates.
    display_system: PlanarSystem,
}

impl AssessmentBuilder {
    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn reference_height(mut self, meters: f64) -> Self {
        self.reference_height_m = Some(meters);
        self
    }

    pub fn display_system(mut self, system: PlanarSystem) -> Self {
        self.display_system = system;
        self
    }

    /// Runs the pipeline: normalize the origin, build the sampling
    /// plan, fetch all elevations in one batched call, compute the
    /// factor, and project the origin for display.
    ///
    /// There is exactly one external call per run and no retry; any
    /// failure aborts the whole computation with no partial result.
    pub fn run<E>(&self, elevations: &E) -> Result<Assessment, OrographyError>
    where
        E: ElevationSource + ?Sized,
    {
        let (Some(origin), Some(reference_height_m)) = (self.origin, self.reference_height_m)
        else {
            return Err(OrographyError::Builder);
        };

        let geographic = resolve_origin(origin)?;
        let samples = SampleSet::build(geographic);
        let points = samples.locations();

        let now = std::time::Instant::now();
        let measured = elevations.elevations(&points)?;
        let gateway_runtime = now.elapsed();

        let orography = compute_factor(samples, measured, reference_height_m)?;
        let planar = lambert::to_planar(geographic, self.display_system)?;

        debug!(
            "assessment; site: ({:.6}, {:.6}), factor: {}, gateway_exec: {gateway_runtime:?}",
            geographic.x(),
            geographic.y(),
            orography.factor,
        );

        Ok(Assessment {
            origin: geographic,
            planar,
            reference_height_m,
            orography,
        })
    }
}

fn resolve_origin(origin: Origin) -> Result<Point<f64>, OrographyError> {
    match origin {
        Origin::Geographic(point) => {
            let (lon, lat) = point.x_y();
            // Fail fast, before the gateway is ever called.
            if lon.is_finite()
                && lat.is_finite()
                && (-180.0..=180.0).contains(&lon)
                && (-90.0..=90.0).contains(&lat)
            {
                Ok(point)
            } else {
                Err(LambertError::InvalidCoordinate { lon, lat }.into())
            }
        }
        Origin::Planar {
            easting,
            northing,
            system,
        } => {
            let system = system.unwrap_or_else(|| {
                let inferred = PlanarSystem::infer(easting, northing);
                debug!("inferred {inferred} for northing {northing}");
                inferred
            });
            Ok(lambert::to_geographic(PlanarCoord {
                easting,
                northing,
                system,
            })?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Assessment, Origin};
    use crate::{
        error::OrographyError,
        gateway::ElevationSource,
        samples::SAMPLE_COUNT,
    };
    use approx::assert_relative_eq;
    use geo::{point, Point};
    use lambert::PlanarSystem;

    /// Replays a canned gateway response.
    struct Canned(Vec<Option<f64>>);

    impl ElevationSource for Canned {
        fn elevations(&self, points: &[Point<f64>]) -> Result<Vec<Option<f64>>, OrographyError> {
            assert_eq!(points.len(), SAMPLE_COUNT);
            Ok(self.0.clone())
        }
    }

    fn hilltop() -> Canned {
        let mut elevations = vec![Some(100.0); SAMPLE_COUNT];
        elevations[0] = Some(200.0);
        Canned(elevations)
    }

    #[test]
    fn test_geographic_run() {
        let origin = point!(x: 2.3522, y: 48.8566);
        let assessment = Assessment::builder()
            .origin(Origin::Geographic(origin))
            .reference_height(10.0)
            .run(&hilltop())
            .unwrap();

        assert_eq!(assessment.origin, origin);
        assert_relative_eq!(assessment.orography.factor, 1.32, epsilon = 1e-9);
        assert_eq!(assessment.planar.system, PlanarSystem::Lambert93);
        assert!(assessment.planar.northing > 6_000_000.0);
    }

    #[test]
    fn test_planar_origin_round_trips() {
        let origin = point!(x: 2.3522, y: 48.8566);
        let planar = lambert::to_planar(origin, PlanarSystem::Lambert93).unwrap();

        let assessment = Assessment::builder()
            .origin(Origin::Planar {
                easting: planar.easting,
                northing: planar.northing,
                // Inferred from the northing magnitude.
                system: None,
            })
            .reference_height(10.0)
            .run(&hilltop())
            .unwrap();

        assert_relative_eq!(assessment.origin.x(), origin.x(), epsilon = 1e-6);
        assert_relative_eq!(assessment.origin.y(), origin.y(), epsilon = 1e-6);
    }

    #[test]
    fn test_missing_builder_params() {
        let result = Assessment::builder().reference_height(10.0).run(&hilltop());
        assert!(matches!(result, Err(OrographyError::Builder)));
    }

    #[test]
    fn test_out_of_range_origin() {
        let result = Assessment::builder()
            .origin(Origin::Geographic(point!(x: 200.0, y: 0.0)))
            .reference_height(10.0)
            .run(&hilltop());
        assert!(matches!(result, Err(OrographyError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_short_gateway_response() {
        let result = Assessment::builder()
            .origin(Origin::Geographic(point!(x: 2.3522, y: 48.8566)))
            .reference_height(10.0)
            .run(&Canned(vec![Some(100.0); 3]));
        assert!(matches!(
            result,
            Err(OrographyError::ElevationUnavailable { want: 9, got: 3 })
        ));
    }
}
