use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand, ValueEnum};
use lambert::PlanarSystem;
use orography::geo::geometry::Coord;
use std::str::FromStr;

/// Estimate the terrain orography factor for a site.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Reference height above ground, in meters.
    #[arg(short = 'z', long, default_value_t = 10.0)]
    pub height: f64,

    /// Grid for displayed plane coordinates.
    #[arg(long, value_enum, default_value_t = SystemArg::Lambert93)]
    pub display_system: SystemArg,

    /// Print the full result as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub site: Site,
}

#[derive(Debug, Subcommand)]
pub enum Site {
    /// Site given as WGS84 "lat,lon".
    LatLon { site: LatLon },

    /// Site given as plane coordinates, grid inferred from the
    /// northing unless named.
    Planar {
        easting: f64,

        northing: f64,

        #[arg(long, value_enum)]
        system: Option<SystemArg>,
    },

    /// Site given as a free-text address.
    Address {
        query: String,

        /// ISO 3166 country code hint.
        #[arg(long)]
        country: Option<String>,
    },
}

#[derive(Clone, Debug, Copy)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s.split_once(',').ok_or_else(|| anyhow!("not a valid lat,lon"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SystemArg {
    /// RGF93 / Lambert 93.
    Lambert93,

    /// NTF / Lambert II étendu.
    Lambert2e,
}

impl From<SystemArg> for PlanarSystem {
    fn from(arg: SystemArg) -> Self {
        match arg {
            SystemArg::Lambert93 => Self::Lambert93,
            SystemArg::Lambert2e => Self::LambertIIe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LatLon;
    use std::str::FromStr;

    #[test]
    fn test_lat_lon_from_str() {
        let parsed = LatLon::from_str("48.8566, 2.3522").unwrap();
        assert_eq!(parsed.0.y, 48.8566);
        assert_eq!(parsed.0.x, 2.3522);
        assert!(LatLon::from_str("48.8566").is_err());
        assert!(LatLon::from_str("a,b").is_err());
    }
}
