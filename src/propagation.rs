//! Propagation-end search.
//!
//! After the pull-off peak the force decays while the crack propagates, then
//! flattens once the part has released. The end of propagation is taken as
//! the last strong upward bend (positive local maximum of the discrete second
//! derivative) of the smoothed force between the peak and the lifting point,
//! the sample where the stage reaches its furthest travel along the lift.
//!
//! The second difference is taken with a stencil of `curvature_step`
//! samples, `f[i+h] - 2 f[i] + f[i-h]`; `h = 1` is the classic three-point
//! form. Candidates past `cutoff_fraction` of the way to the lifting point are
//! ignored. A candidate must reach `min_inflection_ratio` times the strongest
//! bend and `noise_factor` times the curvature noise of a quiet reference
//! window. With no surviving candidate the lifting point itself is returned.
use crate::error::AnalysisError;
use crate::types::{IndexRange, TravelDirection};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationOptions {
    /// Fraction of the peak→lifting-point interval searched for candidates.
    pub cutoff_fraction: f64,
    /// Minimum candidate strength relative to the strongest bend.
    pub min_inflection_ratio: f64,
    /// Stencil half-width of the second difference (samples).
    pub curvature_step: usize,
    /// Minimum candidate strength in units of the curvature noise.
    pub noise_factor: f64,
}

impl Default for PropagationOptions {
    fn default() -> Self {
        Self {
            cutoff_fraction: 0.9,
            min_inflection_ratio: 0.2,
            curvature_step: 5,
            noise_factor: 4.0,
        }
    }
}

impl PropagationOptions {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.cutoff_fraction > 0.0 && self.cutoff_fraction <= 1.0) {
            return Err(AnalysisError::invalid_parameter(
                "propagation.cutoff_fraction",
                format!("must lie in (0, 1], got {}", self.cutoff_fraction),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_inflection_ratio) {
            return Err(AnalysisError::invalid_parameter(
                "propagation.min_inflection_ratio",
                format!("must lie in [0, 1], got {}", self.min_inflection_ratio),
            ));
        }
        if self.curvature_step == 0 {
            return Err(AnalysisError::invalid_parameter(
                "propagation.curvature_step",
                "must be at least 1 sample",
            ));
        }
        if !(self.noise_factor.is_finite() && self.noise_factor >= 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "propagation.noise_factor",
                format!("must be finite and ≥ 0, got {}", self.noise_factor),
            ));
        }
        Ok(())
    }
}

/// Why the search returned a fallback rather than an inflection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationFallback {
    /// The peak sits at (or past) the end of the lift; the peak is returned.
    DegenerateSearchWindow,
    /// No qualifying bend before the cutoff; the lifting point is returned.
    NoInflection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropagationEnd {
    pub index: usize,
    pub lifting_point: usize,
    pub cutoff_index: usize,
    /// Qualifying second-derivative maxima, ascending.
    pub candidates: Vec<usize>,
    /// Strength a maximum had to reach to qualify.
    pub strength_floor: f64,
    pub fallback: Option<PropagationFallback>,
}

impl PropagationEnd {
    fn degenerate(peak: usize) -> Self {
        Self {
            index: peak,
            lifting_point: peak,
            cutoff_index: peak,
            candidates: Vec::new(),
            strength_floor: 0.0,
            fallback: Some(PropagationFallback::DegenerateSearchWindow),
        }
    }
}

/// Search `[peak, motion_end]` (inclusive) for the end of crack propagation.
///
/// No noise gate is applied; see [`find_propagation_end_with_noise`].
pub fn find_propagation_end(
    smoothed_force: &[f64],
    positions: &[f64],
    peak: usize,
    motion_end: usize,
    direction: TravelDirection,
    options: &PropagationOptions,
) -> Result<PropagationEnd, AnalysisError> {
    find_propagation_end_with_noise(
        smoothed_force,
        positions,
        peak,
        motion_end,
        direction,
        0.0,
        options,
    )
}

/// [`find_propagation_end`] with bends weaker than
/// `noise_factor * curvature_noise` discarded.
///
/// `curvature_noise` is usually [`curvature_noise`] over the quiet samples
/// before the lift.
pub fn find_propagation_end_with_noise(
    smoothed_force: &[f64],
    positions: &[f64],
    peak: usize,
    motion_end: usize,
    direction: TravelDirection,
    curvature_noise: f64,
    options: &PropagationOptions,
) -> Result<PropagationEnd, AnalysisError> {
    options.validate()?;
    let n = smoothed_force.len();
    if positions.len() != n {
        return Err(AnalysisError::invalid_samples(format!(
            "force has {n} samples but position has {}",
            positions.len()
        )));
    }
    if peak >= n {
        return Err(AnalysisError::invalid_parameter(
            "peak",
            format!("index {peak} is outside the {n}-sample stream"),
        ));
    }
    let motion_end = motion_end.min(n - 1);
    if peak >= motion_end {
        return Ok(PropagationEnd::degenerate(peak));
    }

    let sign = direction.sign();
    let lifting_point = (peak..=motion_end).fold(peak, |best, i| {
        if positions[i] * sign > positions[best] * sign {
            i
        } else {
            best
        }
    });
    if lifting_point == peak {
        return Ok(PropagationEnd::degenerate(peak));
    }

    let span = lifting_point - peak;
    let cutoff_index = peak + (options.cutoff_fraction * span as f64).floor() as usize;
    let noise_floor = if curvature_noise.is_finite() {
        options.noise_factor * curvature_noise.max(0.0)
    } else {
        0.0
    };
    let (candidates, strength_floor) =
        inflection_candidates(smoothed_force, peak, lifting_point, noise_floor, options);

    let (index, fallback) = match candidates.iter().rev().find(|&&c| c <= cutoff_index) {
        Some(&c) => (c, None),
        None => (lifting_point, Some(PropagationFallback::NoInflection)),
    };
    Ok(PropagationEnd {
        index,
        lifting_point,
        cutoff_index,
        candidates,
        strength_floor,
        fallback,
    })
}

/// Index-only form of [`find_propagation_end`].
pub fn locate(
    smoothed_force: &[f64],
    positions: &[f64],
    peak: usize,
    motion_end: usize,
    direction: TravelDirection,
    options: &PropagationOptions,
) -> Result<usize, AnalysisError> {
    find_propagation_end(
        smoothed_force,
        positions,
        peak,
        motion_end,
        direction,
        options,
    )
    .map(|end| end.index)
}

/// Standard deviation of the `step`-spaced second difference over `window`.
///
/// Only samples inside `window` are read. Windows too short to hold three
/// differences give 0.
pub fn curvature_noise(smoothed_force: &[f64], window: IndexRange, step: usize) -> f64 {
    let step = step.max(1);
    let end = window.end.min(smoothed_force.len());
    let first = window.start + step;
    if end < first + step + 3 {
        return 0.0;
    }
    let d2: Vec<f64> = (first..end - step)
        .map(|i| second_difference(smoothed_force, i, step))
        .collect();
    let mean = d2.iter().sum::<f64>() / d2.len() as f64;
    let var = d2.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / d2.len() as f64;
    var.sqrt()
}

#[inline]
fn second_difference(f: &[f64], i: usize, step: usize) -> f64 {
    f[i + step] - 2.0 * f[i] + f[i - step]
}

fn inflection_candidates(
    f: &[f64],
    peak: usize,
    lifting_point: usize,
    noise_floor: f64,
    options: &PropagationOptions,
) -> (Vec<usize>, f64) {
    let step = options.curvature_step;
    let first = peak + step;
    if lifting_point < first + step + 2 {
        return (Vec::new(), noise_floor);
    }
    // d2[k] is the second difference at sample first + k; the stencil stays
    // inside [peak, lifting_point].
    let d2: Vec<f64> = (first..=lifting_point - step)
        .map(|i| second_difference(f, i, step))
        .collect();
    let maxima: Vec<(usize, f64)> = (1..d2.len() - 1)
        .filter(|&k| d2[k] > 0.0 && d2[k] > d2[k - 1] && d2[k] > d2[k + 1])
        .map(|k| (first + k, d2[k]))
        .collect();
    let strongest = maxima.iter().map(|&(_, v)| v).fold(0.0, f64::max);
    let floor = (options.min_inflection_ratio * strongest).max(noise_floor);
    let candidates = maxima
        .into_iter()
        .filter(|&(_, v)| v >= floor)
        .map(|(i, _)| i)
        .collect();
    (candidates, floor)
}
