//! The orography factor computation.
//!
//! A simplified relief model: the site elevation is compared against
//! a weighted mean of itself and eight ring samples, and the
//! differential is scaled into a wind-speed multiplier that decays
//! exponentially with the reference height. Not the full standard
//! procedure for complex orography; the [`Advisory::Steep`] band
//! flags results where that procedure should be used instead.

use crate::{
    error::OrographyError,
    samples::{SampleSet, SAMPLE_COUNT},
};

/// Factor gain per meter of relief differential.
const RELIEF_GAIN_PER_M: f64 = 0.004;

/// Exponential decay rate of the relief effect with height.
const HEIGHT_DECAY_PER_M: f64 = 0.014;

/// Reference height below which no decay applies, meters.
const DECAY_FREE_HEIGHT_M: f64 = 10.0;

/// Advisory boundary between transitional and steep terrain.
const STEEP_THRESHOLD: f64 = 1.15;

/// Advisory classification of a computed factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// No terrain amplification (factor 1.0).
    Flat,

    /// Moderate amplification.
    Transitional,

    /// Strong amplification. The simplified model may no longer be
    /// valid; the full orography procedure should be used.
    Steep,
}

impl Advisory {
    fn classify(factor: f64) -> Self {
        if factor <= 1.0 {
            Self::Flat
        } else if factor <= STEEP_THRESHOLD {
            Self::Transitional
        } else {
            Self::Steep
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Flat => "flat",
            Self::Transitional => "transitional",
            Self::Steep => "steep",
        };
        write!(f, "{s}")
    }
}

/// Result of one factor computation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrographyResult {
    /// Orography factor, floored at 1.0 and rounded to two decimals.
    pub factor: f64,

    /// Site (center) elevation, meters above sea level.
    pub site_elevation: f64,

    /// Weighted mean of center and ring elevations, meters.
    pub mean_elevation: f64,

    /// The sampling plan the elevations belong to.
    pub samples: SampleSet,

    /// Raw gateway response, aligned 1:1 with `samples`.
    pub elevations: Vec<Option<f64>>,

    /// Advisory classification of `factor`.
    pub advisory: Advisory,
}

/// Computes the orography factor for one site.
///
/// `elevations` must align 1:1 with `samples`. The missing-data
/// policy is strict: the center and all eight ring elevations are
/// required, and any absent entry aborts the computation with
/// [`OrographyError::MissingElevation`]. No zero-filling, no subset
/// mean. A negative reference height is rejected rather than floored.
///
/// The factor is floored at 1.0, then rounded to two decimals, and
/// the advisory is classified from the rounded value.
pub fn compute_factor(
    samples: SampleSet,
    elevations: Vec<Option<f64>>,
    reference_height_m: f64,
) -> Result<OrographyResult, OrographyError> {
    if !reference_height_m.is_finite() || reference_height_m < 0.0 {
        return Err(OrographyError::InvalidReferenceHeight(reference_height_m));
    }
    if elevations.len() != SAMPLE_COUNT {
        return Err(OrographyError::ElevationUnavailable {
            want: SAMPLE_COUNT,
            got: elevations.len(),
        });
    }

    let mut resolved = Vec::with_capacity(SAMPLE_COUNT);
    for (sample, elevation) in samples.points().iter().zip(&elevations) {
        match elevation {
            Some(meters) => resolved.push(*meters),
            None => {
                return Err(OrographyError::MissingElevation {
                    label: sample.label,
                    distance_m: sample.distance_m,
                })
            }
        }
    }

    let site_elevation = resolved[0];
    let ring_sum: f64 = resolved[1..].iter().sum();
    // The center is double-weighted against the eight ring samples.
    let mean_elevation = (2.0 * site_elevation + ring_sum) / 10.0;

    let decay_height = (reference_height_m - DECAY_FREE_HEIGHT_M).max(0.0);
    let attenuation = (-HEIGHT_DECAY_PER_M * decay_height).exp();
    let raw = 1.0 + RELIEF_GAIN_PER_M * (site_elevation - mean_elevation) * attenuation;
    // Floor, then round, then classify on the rounded value.
    let factor = round2(raw.max(1.0));

    Ok(OrographyResult {
        factor,
        site_elevation,
        mean_elevation,
        samples,
        elevations,
        advisory: Advisory::classify(factor),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
