use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LambertError {
    #[error("invalid geographic coordinate, lon {lon} lat {lat}")]
    InvalidCoordinate { lon: f64, lat: f64 },
}
