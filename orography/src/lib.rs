mod assessment;
mod constants;
mod error;
mod factor;
mod gateway;
mod math;
mod samples;

pub use crate::{
    assessment::{Assessment, AssessmentBuilder, Origin},
    constants::MEAN_EARTH_RADIUS,
    error::OrographyError,
    factor::{compute_factor, Advisory, OrographyResult},
    gateway::{ElevationSource, Geocoder, Place},
    math::destination,
    samples::{SampleLabel, SamplePoint, SampleSet, RING_DISTANCES_M, SAMPLE_COUNT},
};
pub use {geo, lambert};
