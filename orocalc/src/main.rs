mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use openmeteo::{ElevationClient, GeocodeClient};
use options::{Cli, Site};
use orography::{geo::Point, Assessment, Geocoder, Origin};
use serde::Serialize;

fn main() -> Result<(), AnyError> {
    env_logger::init();

    let Cli {
        height,
        display_system,
        json,
        site,
    } = Cli::parse();

    let (origin, address) = match site {
        Site::LatLon { site } => (Origin::Geographic(Point::from(site.0)), None),
        Site::Planar {
            easting,
            northing,
            system,
        } => (
            Origin::Planar {
                easting,
                northing,
                system: system.map(Into::into),
            },
            None,
        ),
        Site::Address { query, country } => {
            let place = GeocodeClient::new()?.geocode(&query, country.as_deref())?;
            (Origin::Geographic(place.location), Some(place.label))
        }
    };

    let elevations = ElevationClient::new()?;
    let assessment = Assessment::builder()
        .origin(origin)
        .reference_height(height)
        .display_system(display_system.into())
        .run(&elevations)?;

    if json {
        print_json(&assessment, address.as_deref())?;
    } else {
        print_report(&assessment, address.as_deref());
    }
    Ok(())
}

fn print_report(assessment: &Assessment, address: Option<&str>) {
    let planar = &assessment.planar;
    let orography = &assessment.orography;

    if let Some(address) = address {
        println!("Address:     {address}");
    }
    println!(
        "Site:        {:.6}°N {:.6}°E (WGS84)",
        assessment.origin.y(),
        assessment.origin.x()
    );
    println!(
        "             {:.2} E  {:.2} N ({})",
        planar.easting, planar.northing, planar.system
    );
    println!("Ref. height: {} m", assessment.reference_height_m);
    println!();

    println!("Sample  Distance  Bearing  Elevation");
    for (sample, elevation) in orography.samples.points().iter().zip(&orography.elevations) {
        let bearing = sample
            .bearing_deg
            .map_or_else(|| "-".to_string(), |deg| format!("{deg:.0}°"));
        let elevation = elevation.map_or_else(|| "n/a".to_string(), |m| format!("{m:.1} m"));
        println!(
            "{:<8}{:>6.0} m{:>9}{:>11}",
            sample.label.to_string(),
            sample.distance_m,
            bearing,
            elevation
        );
    }
    println!();

    println!("Ac (site):   {:.1} m", orography.site_elevation);
    println!("Am (mean):   {:.1} m", orography.mean_elevation);
    println!("Factor:      {:.2}", orography.factor);
    println!("Advisory:    {}", orography.advisory);
}

fn print_json(assessment: &Assessment, address: Option<&str>) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonSample {
        label: String,
        distance_m: f64,
        bearing_deg: Option<f64>,
        location: [f64; 2],
        elevation_m: Option<f64>,
    }

    #[derive(Serialize)]
    struct JsonReport<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        address: Option<&'a str>,
        longitude: f64,
        latitude: f64,
        system: String,
        easting: f64,
        northing: f64,
        reference_height_m: f64,
        site_elevation_m: f64,
        mean_elevation_m: f64,
        factor: f64,
        advisory: String,
        samples: Vec<JsonSample>,
    }

    let orography = &assessment.orography;
    let samples: Vec<JsonSample> = orography
        .samples
        .points()
        .iter()
        .zip(&orography.elevations)
        .map(|(sample, elevation)| JsonSample {
            label: sample.label.to_string(),
            distance_m: sample.distance_m,
            bearing_deg: sample.bearing_deg,
            location: [sample.location.x(), sample.location.y()],
            elevation_m: *elevation,
        })
        .collect();

    let report = JsonReport {
        address,
        longitude: assessment.origin.x(),
        latitude: assessment.origin.y(),
        system: assessment.planar.system.to_string(),
        easting: assessment.planar.easting,
        northing: assessment.planar.northing,
        reference_height_m: assessment.reference_height_m,
        site_elevation_m: orography.site_elevation,
        mean_elevation_m: orography.mean_elevation,
        factor: orography.factor,
        advisory: orography.advisory.to_string(),
        samples,
    };
    let json = serde_json::to_string(&report)?;
    println!("{json}");
    Ok(())
}
