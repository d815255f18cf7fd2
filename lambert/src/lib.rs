//! Lambert conformal conic plane coordinates for mainland France.
//!
//! Two grids are supported: the legacy NTF Lambert zone II étendu and
//! the current RGF93 Lambert 93. Both are conformal conic projections
//! with two standard parallels; they share WGS84 geographic
//! coordinates as their common pivot, so converting between grids is
//! a round trip through [`to_geographic`] and [`to_planar`]. The NTF
//! grid is the only one that needs a datum shift; RGF93 is treated as
//! identical to WGS84.
//!
//! # References
//!
//! 1. [IGN NTG 71, Lambert conic conformal projection algorithms](https://geodesie.ign.fr/contenu/fichiers/documentation/algorithmes/notice/NTG_71.pdf)
//! 1. [EPSG:27572, NTF (Paris) / Lambert zone II](https://epsg.io/27572)
//! 1. [EPSG:2154, RGF93 / Lambert-93](https://epsg.io/2154)

mod error;

pub use crate::error::LambertError;
use geo::geometry::Point;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// GRS80 ellipsoid, carrier of RGF93.
///
/// Near-identical to WGS84 (the flattenings differ below 0.1 mm), so
/// no datum shift is applied for Lambert 93.
struct Grs80;

impl Grs80 {
    const A: f64 = 6_378_137.0;
    const F: f64 = 1.0 / 298.257_222_101;
    const E2: f64 = 2.0 * Self::F - Self::F * Self::F;
}

/// Clarke 1880 IGN ellipsoid, carrier of NTF.
struct Clarke1880;

impl Clarke1880 {
    const A: f64 = 6_378_249.2;
    const B: f64 = 6_356_515.0;
    const E2: f64 = 1.0 - (Self::B / Self::A) * (Self::B / Self::A);
}

/// WGS84 ellipsoid, pivot datum for the NTF shift.
struct Wgs84;

impl Wgs84 {
    const A: f64 = 6_378_137.0;
    const F: f64 = 1.0 / 298.257_223_563;
    const E2: f64 = 2.0 * Self::F - Self::F * Self::F;
}

/// NTF → WGS84 geocentric translation, meters.
const NTF_TO_WGS84_M: [f64; 3] = [-168.0, -60.0, 320.0];

/// Paris meridian, degrees east of Greenwich.
const PARIS_MERIDIAN_DEG: f64 = 2.337_229_166_666_667;

/// Northing split used to guess which grid raw plane coordinates
/// belong to. Lambert 93 northings in France start above 6,000,000 m;
/// Lambert II étendu northings top out around 2,700,000 m.
pub const NORTHING_SPLIT: f64 = 2_000_000.0;

/// A supported plane coordinate grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanarSystem {
    /// RGF93 / Lambert 93 (EPSG:2154).
    Lambert93,

    /// NTF (Paris) / Lambert zone II étendu (EPSG:27572).
    LambertIIe,
}

impl PlanarSystem {
    /// Guesses the grid for raw `(easting, northing)` input.
    ///
    /// Best effort only: northern zone II étendu northings exceed the
    /// split and will be mistaken for Lambert 93. Callers that know
    /// the grid should name it instead of inferring.
    pub fn infer(_easting: f64, northing: f64) -> Self {
        if northing > NORTHING_SPLIT {
            Self::Lambert93
        } else {
            Self::LambertIIe
        }
    }

    fn lcc(self) -> Lcc {
        match self {
            Self::Lambert93 => Lcc::new(
                Grs80::A,
                Grs80::E2.sqrt(),
                (44.0, 49.0),
                46.5,
                3.0,
                700_000.0,
                6_600_000.0,
            ),
            Self::LambertIIe => Lcc::new(
                Clarke1880::A,
                Clarke1880::E2.sqrt(),
                // Two-parallel equivalent of the tangent definition
                // (phi0 52 gon = 46.8 deg, k0 0.99987742).
                (45.898_918_89, 47.696_014_44),
                46.8,
                PARIS_MERIDIAN_DEG,
                600_000.0,
                2_200_000.0,
            ),
        }
    }
}

impl std::fmt::Display for PlanarSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lambert93 => write!(f, "Lambert 93"),
            Self::LambertIIe => write!(f, "Lambert II étendu"),
        }
    }
}

/// A position on one of the supported grids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarCoord {
    /// Meters east of the grid origin.
    pub easting: f64,

    /// Meters north of the grid origin.
    pub northing: f64,

    /// Grid the easting/northing pair is expressed in.
    pub system: PlanarSystem,
}

/// Projects a WGS84 geographic point onto `system`.
///
/// # Errors
///
/// Returns [`LambertError::InvalidCoordinate`] when `point` is not a
/// finite position inside [-180, 180] × [-90, 90].
pub fn to_planar(point: Point<f64>, system: PlanarSystem) -> Result<PlanarCoord, LambertError> {
    check_geographic(point.x(), point.y())?;
    let (lon, lat) = match system {
        PlanarSystem::Lambert93 => (point.x(), point.y()),
        PlanarSystem::LambertIIe => wgs84_to_ntf(point.x(), point.y()),
    };
    let (easting, northing) = system.lcc().forward(lon, lat);
    Ok(PlanarCoord {
        easting,
        northing,
        system,
    })
}

/// Inverse-projects a grid position back to WGS84.
///
/// # Errors
///
/// Returns [`LambertError::InvalidCoordinate`] when the input is not
/// finite or resolves outside the valid geographic range, which
/// usually means the wrong grid was assumed.
pub fn to_geographic(coord: PlanarCoord) -> Result<Point<f64>, LambertError> {
    if !coord.easting.is_finite() || !coord.northing.is_finite() {
        return Err(LambertError::InvalidCoordinate {
            lon: f64::NAN,
            lat: f64::NAN,
        });
    }
    let (lon, lat) = coord.system.lcc().inverse(coord.easting, coord.northing);
    let (lon, lat) = match coord.system {
        PlanarSystem::Lambert93 => (lon, lat),
        PlanarSystem::LambertIIe => ntf_to_wgs84(lon, lat),
    };
    check_geographic(lon, lat)?;
    Ok(Point::new(lon, lat))
}

fn check_geographic(lon: f64, lat: f64) -> Result<(), LambertError> {
    if lon.is_finite() && lat.is_finite() && (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(LambertError::InvalidCoordinate { lon, lat })
    }
}

/// A secant conformal conic projection with precomputed constants.
struct Lcc {
    a: f64,
    e: f64,
    n: f64,
    f: f64,
    rho0: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Lcc {
    #[allow(clippy::many_single_char_names)]
    fn new(
        a: f64,
        e: f64,
        (phi1_deg, phi2_deg): (f64, f64),
        phi0_deg: f64,
        lon0_deg: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let phi1 = phi1_deg.to_radians();
        let phi2 = phi2_deg.to_radians();
        let phi0 = phi0_deg.to_radians();
        let (m1, m2) = (m(e, phi1), m(e, phi2));
        let (t1, t2) = (t(e, phi1), t(e, phi2));
        let n = (m1.ln() - m2.ln()) / (t1.ln() - t2.ln());
        let f = m1 / (n * t1.powf(n));
        let rho0 = a * f * t(e, phi0).powf(n);
        Self {
            a,
            e,
            n,
            f,
            rho0,
            lon0: lon0_deg.to_radians(),
            false_easting,
            false_northing,
        }
    }

    /// Degrees in, meters out.
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let rho = self.a * self.f * t(self.e, lat.to_radians()).powf(self.n);
        let theta = self.n * (lon.to_radians() - self.lon0);
        (
            self.false_easting + rho * theta.sin(),
            self.false_northing + self.rho0 - rho * theta.cos(),
        )
    }

    /// Meters in, degrees out.
    fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let dx = easting - self.false_easting;
        let dy = self.rho0 - (northing - self.false_northing);
        // n > 0 for both supported grids.
        let rho = dx.hypot(dy);
        let t = (rho / (self.a * self.f)).powf(1.0 / self.n);
        let lon = dx.atan2(dy) / self.n + self.lon0;

        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..8 {
            let es = self.e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).atan();
            let done = (next - phi).abs() < 1e-12;
            phi = next;
            if done {
                break;
            }
        }
        (lon.to_degrees(), phi.to_degrees())
    }
}

fn m(e: f64, phi: f64) -> f64 {
    phi.cos() / (1.0 - e * e * phi.sin() * phi.sin()).sqrt()
}

fn t(e: f64, phi: f64) -> f64 {
    let es = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

fn wgs84_to_ntf(lon: f64, lat: f64) -> (f64, f64) {
    let [x, y, z] = geocentric(Wgs84::A, Wgs84::E2, lon.to_radians(), lat.to_radians());
    let [dx, dy, dz] = NTF_TO_WGS84_M;
    let (lon, lat) = geodetic(Clarke1880::A, Clarke1880::E2, [x - dx, y - dy, z - dz]);
    (lon.to_degrees(), lat.to_degrees())
}

fn ntf_to_wgs84(lon: f64, lat: f64) -> (f64, f64) {
    let [x, y, z] = geocentric(
        Clarke1880::A,
        Clarke1880::E2,
        lon.to_radians(),
        lat.to_radians(),
    );
    let [dx, dy, dz] = NTF_TO_WGS84_M;
    let (lon, lat) = geodetic(Wgs84::A, Wgs84::E2, [x + dx, y + dy, z + dz]);
    (lon.to_degrees(), lat.to_degrees())
}

/// Geodetic (radians, ellipsoid height 0) to geocentric XYZ.
fn geocentric(a: f64, e2: f64, lon: f64, lat: f64) -> [f64; 3] {
    let nu = a / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
    [
        nu * lat.cos() * lon.cos(),
        nu * lat.cos() * lon.sin(),
        nu * (1.0 - e2) * lat.sin(),
    ]
}

/// Geocentric XYZ back to geodetic (radians), height discarded.
fn geodetic(a: f64, e2: f64, [x, y, z]: [f64; 3]) -> (f64, f64) {
    let lon = y.atan2(x);
    let p = x.hypot(y);
    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..8 {
        let nu = a / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
        let next = (z + e2 * nu * lat.sin()).atan2(p);
        let done = (next - lat).abs() < 1e-13;
        lat = next;
        if done {
            break;
        }
    }
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::{to_geographic, to_planar, LambertError, PlanarCoord, PlanarSystem};
    use approx::assert_relative_eq;
    use geo::geometry::Point;

    const PARIS: (f64, f64) = (2.3522, 48.8566);
    const MARSEILLE: (f64, f64) = (5.3698, 43.2965);

    #[test]
    fn test_lambert93_grid_origin() {
        // The grid origin (3°E, 46.5°N) maps onto the false origin
        // exactly; RGF93 needs no datum shift.
        let planar = to_planar(Point::new(3.0, 46.5), PlanarSystem::Lambert93).unwrap();
        assert_relative_eq!(planar.easting, 700_000.0, epsilon = 1e-4);
        assert_relative_eq!(planar.northing, 6_600_000.0, epsilon = 1e-4);
    }

    #[test]
    fn test_lambert93_paris() {
        let planar = to_planar(Point::new(PARIS.0, PARIS.1), PlanarSystem::Lambert93).unwrap();
        assert!((640_000.0..660_000.0).contains(&planar.easting), "{planar:?}");
        assert!(
            (6_850_000.0..6_870_000.0).contains(&planar.northing),
            "{planar:?}"
        );
    }

    #[test]
    fn test_lambert2e_paris() {
        let planar = to_planar(Point::new(PARIS.0, PARIS.1), PlanarSystem::LambertIIe).unwrap();
        assert!((595_000.0..610_000.0).contains(&planar.easting), "{planar:?}");
        assert!(
            (2_410_000.0..2_450_000.0).contains(&planar.northing),
            "{planar:?}"
        );
    }

    #[test]
    fn test_round_trip() {
        for (lon, lat) in [PARIS, MARSEILLE, (-1.5536, 47.2184), (7.7521, 48.5734)] {
            for system in [PlanarSystem::Lambert93, PlanarSystem::LambertIIe] {
                let planar = to_planar(Point::new(lon, lat), system).unwrap();
                let geographic = to_geographic(planar).unwrap();
                assert_relative_eq!(geographic.x(), lon, epsilon = 1e-6);
                assert_relative_eq!(geographic.y(), lat, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_infer() {
        assert_eq!(
            PlanarSystem::infer(652_000.0, 6_862_000.0),
            PlanarSystem::Lambert93
        );
        assert_eq!(
            PlanarSystem::infer(600_000.0, 1_800_000.0),
            PlanarSystem::LambertIIe
        );
        // Split itself stays on the legacy side.
        assert_eq!(
            PlanarSystem::infer(600_000.0, 2_000_000.0),
            PlanarSystem::LambertIIe
        );
    }

    #[test]
    fn test_invalid_geographic() {
        assert!(matches!(
            to_planar(Point::new(200.0, 0.0), PlanarSystem::Lambert93),
            Err(LambertError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            to_planar(Point::new(f64::NAN, 0.0), PlanarSystem::Lambert93),
            Err(LambertError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_invalid_planar() {
        let coord = PlanarCoord {
            easting: f64::NAN,
            northing: 6_862_000.0,
            system: PlanarSystem::Lambert93,
        };
        assert!(matches!(
            to_geographic(coord),
            Err(LambertError::InvalidCoordinate { .. })
        ));
    }
}
