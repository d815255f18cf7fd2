use crate::samples::SampleLabel;
use lambert::LambertError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrographyError {
    #[error("missing required parameters")]
    Builder,

    #[error("{0}")]
    InvalidCoordinate(#[from] LambertError),

    #[error("no geocoding match for {0:?}")]
    GeocodeNotFound(String),

    #[error("elevation gateway returned {got} values for {want} points")]
    ElevationUnavailable { want: usize, got: usize },

    #[error("no elevation for sample {label} at {distance_m} m")]
    MissingElevation {
        label: SampleLabel,
        distance_m: f64,
    },

    #[error("reference height must be non-negative, got {0}")]
    InvalidReferenceHeight(f64),

    #[error("elevation gateway failure: {0}")]
    Gateway(Box<dyn std::error::Error + Send + Sync>),
}

impl OrographyError {
    /// Wraps a transport or decode failure from a gateway
    /// implementation.
    pub fn gateway<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Gateway(Box::new(e))
    }
}
