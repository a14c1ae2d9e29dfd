//! Candidate pull-off detection on the smoothed force.
//!
//! Three gates are applied in order: minimum height, nearest-neighbour
//! suppression by distance (the higher peak wins, equal heights keep the
//! earlier one), then minimum prominence. Flat-topped maxima resolve to the
//! middle sample of the plateau; the first and last samples never qualify.
//! An empty result is a valid answer meaning "no layers".
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Gates applied to local maxima of the smoothed force.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakOptions {
    /// Minimum absolute peak value (N).
    pub min_height: f64,
    /// Minimum spacing between kept peaks (samples).
    pub min_distance: usize,
    /// Minimum height above the lowest bounding valley (N).
    pub min_prominence: f64,
}

impl Default for PeakOptions {
    fn default() -> Self {
        Self {
            min_height: 0.05,
            min_distance: 100,
            min_prominence: 0.05,
        }
    }
}

impl PeakOptions {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.min_height.is_finite() {
            return Err(AnalysisError::invalid_parameter(
                "peaks.min_height",
                "must be finite",
            ));
        }
        if !(self.min_prominence.is_finite() && self.min_prominence >= 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "peaks.min_prominence",
                format!("must be finite and ≥ 0, got {}", self.min_prominence),
            ));
        }
        if self.min_distance == 0 {
            return Err(AnalysisError::invalid_parameter(
                "peaks.min_distance",
                "must be at least 1 sample",
            ));
        }
        Ok(())
    }
}

/// Indices (ascending) of the maxima of `signal` passing every gate.
pub fn find_peaks(signal: &[f64], options: &PeakOptions) -> Vec<usize> {
    let mut peaks = local_maxima(signal);
    peaks.retain(|&i| signal[i] >= options.min_height);
    let peaks = suppress_by_distance(signal, peaks, options.min_distance);
    peaks
        .into_iter()
        .filter(|&i| peak_prominence(signal, i) >= options.min_prominence)
        .collect()
}

/// Height of `signal[peak]` above the lower of its two bounding minima.
///
/// Each side is scanned until a strictly higher sample or the signal edge.
pub fn peak_prominence(signal: &[f64], peak: usize) -> f64 {
    let Some(&height) = signal.get(peak) else {
        return 0.0;
    };
    let mut left_min = height;
    for &v in signal[..peak].iter().rev() {
        if v > height {
            break;
        }
        left_min = left_min.min(v);
    }
    let mut right_min = height;
    for &v in &signal[peak + 1..] {
        if v > height {
            break;
        }
        right_min = right_min.min(v);
    }
    height - left_min.min(right_min)
}

fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let n = signal.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }
    let last = n - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

fn suppress_by_distance(signal: &[f64], peaks: Vec<usize>, min_distance: usize) -> Vec<usize> {
    if min_distance <= 1 || peaks.len() < 2 {
        return peaks;
    }
    let mut ranked: Vec<usize> = (0..peaks.len()).collect();
    ranked.sort_by(|&a, &b| {
        signal[peaks[b]]
            .partial_cmp(&signal[peaks[a]])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut keep = vec![true; peaks.len()];
    for &j in &ranked {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < min_distance {
            k -= 1;
            keep[k] = false;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < min_distance {
            keep[k] = false;
            k += 1;
        }
    }
    peaks
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(p))
        .collect()
}
