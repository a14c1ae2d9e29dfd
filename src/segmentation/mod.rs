//! Motion-phase segmentation: partition the stream into one record per layer.
//!
//! Every sample is classified as stable, lifting or retracting by comparing
//! the mean stage position of the `w` samples ahead with the `w` samples
//! behind. Around each force peak the segmenter then reads off
//!
//! - the lift run containing the peak,
//! - the retraction that follows it (up to the next lift),
//! - an optional sandwich-contact dip directly before the lift,
//! - the stable range between the previous layer and this one.
//!
//! Peaks that fall inside an already claimed lift/retract window are merged
//! into that layer instead of opening a new one. Peaks whose lifting run is
//! shorter than two samples happened with the stage at rest (force spikes,
//! knocks) and are dropped before numbering.

mod motion;
mod options;
mod sandwich;

pub use options::{LiftDirection, SegmentationOptions};

use log::{debug, warn};

use crate::error::AnalysisError;
use crate::types::{IndexRange, LayerRecord, TravelDirection};

use motion::{MotionProfile, MotionState};
use sandwich::detect_sandwich;

/// Shortest lifting run that can carry a layer.
const MIN_LIFT_SAMPLES: usize = 2;

#[derive(Clone, Copy, Debug)]
struct LayerBounds {
    stable: IndexRange,
    sandwich: Option<IndexRange>,
    lifting: IndexRange,
    retraction: IndexRange,
    direction: TravelDirection,
    peak: usize,
}

/// Segment the stream around `peak_indices` into layer records (no metrics).
///
/// `known_layer_numbers` are assigned to the detected layers in temporal
/// order; without them layers are numbered from 1.
pub fn segment(
    positions: &[f64],
    times: &[f64],
    smoothed_force: &[f64],
    peak_indices: &[usize],
    known_layer_numbers: Option<&[u32]>,
    options: &SegmentationOptions,
) -> Result<Vec<LayerRecord>, AnalysisError> {
    options.validate()?;
    let n = positions.len();
    if times.len() != n || smoothed_force.len() != n {
        return Err(AnalysisError::invalid_samples(format!(
            "segmentation inputs differ in length (position={n}, time={}, force={})",
            times.len(),
            smoothed_force.len()
        )));
    }
    if peak_indices.is_empty() {
        return Ok(Vec::new());
    }
    if n < 2 {
        return Err(AnalysisError::insufficient("motion segmentation", 2, n));
    }
    if let Some(&bad) = peak_indices.iter().find(|&&p| p >= n) {
        return Err(AnalysisError::invalid_parameter(
            "peak_indices",
            format!("index {bad} is outside the {n}-sample stream"),
        ));
    }

    let mut peaks = peak_indices.to_vec();
    peaks.sort_unstable();
    peaks.dedup();

    let profile = MotionProfile::new(
        positions,
        options.stability_window,
        options.stability_threshold_mm,
    );

    let mut bounds: Vec<LayerBounds> = Vec::with_capacity(peaks.len());
    let mut floor = 0usize;
    for &peak in &peaks {
        if let Some(prev) = bounds.last_mut() {
            let claimed_end = prev.retraction.end.max(prev.lifting.end);
            if peak < claimed_end {
                if prev.lifting.contains(peak) && smoothed_force[peak] > smoothed_force[prev.peak] {
                    warn!(
                        "peak {peak} supersedes peak {} within the same lift",
                        prev.peak
                    );
                    prev.peak = peak;
                } else {
                    warn!("peak {peak} merged into the layer of peak {}", prev.peak);
                }
                continue;
            }
        }
        let Some(layer) = locate_layer(&profile, positions, peak, floor, options) else {
            warn!("peak {peak} dropped: stage is not lifting there");
            continue;
        };
        floor = layer.retraction.end.max(layer.lifting.end);
        bounds.push(layer);
    }

    let numbers = assign_layer_numbers(bounds.len(), known_layer_numbers);
    Ok(bounds
        .into_iter()
        .zip(numbers)
        .map(|(b, layer_number)| LayerRecord {
            layer_number,
            stable: b.stable,
            sandwich: b.sandwich,
            lifting: b.lifting,
            retraction: b.retraction,
            lift_direction: b.direction,
            peak_index: b.peak,
            peak_force: smoothed_force[b.peak],
            peak_time: times[b.peak],
            metrics: None,
        })
        .collect())
}

fn locate_layer(
    profile: &MotionProfile,
    positions: &[f64],
    peak: usize,
    floor: usize,
    options: &SegmentationOptions,
) -> Option<LayerBounds> {
    let n = profile.len();
    let direction = profile.resolve_direction(options.lift_direction, positions, peak);
    let state = |i: usize| profile.state(i, direction);

    let mut lift_start = peak;
    while lift_start > floor && state(lift_start - 1) == MotionState::Lifting {
        lift_start -= 1;
    }
    let mut lift_end = peak + 1;
    while lift_end < n && state(lift_end) == MotionState::Lifting {
        lift_end += 1;
    }
    if lift_end - lift_start < MIN_LIFT_SAMPLES {
        return None;
    }

    let mut r = lift_end;
    while r < n && state(r) == MotionState::Stable {
        r += 1;
    }
    let retraction = if r < n && state(r) == MotionState::Retracting {
        while r < n && state(r) == MotionState::Retracting {
            r += 1;
        }
        IndexRange::new(lift_end, r)
    } else {
        debug!("no retraction found after peak {peak}");
        IndexRange::new(lift_end, lift_end)
    };

    let dip = if options.sandwich_detection {
        detect_sandwich(
            profile, positions, lift_start, peak, floor, direction, options,
        )
    } else {
        None
    };
    if let Some(dip) = dip {
        debug!(
            "sandwich contact {}..{} ({:.3} mm) before peak {peak}",
            dip.range.start, dip.range.end, dip.depth_mm
        );
        lift_start = dip.lift_start;
        if lift_end - lift_start < MIN_LIFT_SAMPLES {
            return None;
        }
    }
    let sandwich = dip.map(|d| d.range);
    let stable_end = sandwich.map_or(lift_start, |s| s.start);

    Some(LayerBounds {
        stable: IndexRange::new(floor, stable_end),
        sandwich,
        lifting: IndexRange::new(lift_start, lift_end),
        retraction,
        direction,
        peak,
    })
}

fn assign_layer_numbers(count: usize, known: Option<&[u32]>) -> Vec<u32> {
    let Some(known) = known else {
        return (1..=count as u32).collect();
    };
    if known.len() != count {
        warn!(
            "{} known layer numbers for {count} detected layers; assigning in order",
            known.len()
        );
    }
    let mut numbers: Vec<u32> = known.iter().copied().take(count).collect();
    let mut next = numbers.last().map_or(1, |&last| last.saturating_add(1));
    while numbers.len() < count {
        numbers.push(next);
        next = next.saturating_add(1);
    }
    numbers
}
