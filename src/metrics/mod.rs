//! Per-layer adhesion metrics.
//!
//! For one segmented layer this runs the propagation-end search and the
//! baseline estimate, then derives durations, work of adhesion and SNR.
//! Any window below two samples aborts with `InsufficientData`; no partial
//! record is produced.

mod integrate;

pub use integrate::{trapezoid, WorkIntegration};

use serde::{Deserialize, Serialize};

use crate::analyzer::AnalysisParams;
use crate::baseline::baseline;
use crate::error::AnalysisError;
use crate::propagation::{curvature_noise, find_propagation_end_with_noise, PropagationEnd};
use crate::types::{IndexRange, LayerRecord, MetricsRecord};

/// Floor on the noise standard deviation (N).
const NOISE_FLOOR: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsOptions {
    /// Trailing stable-range samples used for the noise estimate.
    pub noise_window: usize,
    pub work_integration: WorkIntegration,
}

impl Default for MetricsOptions {
    fn default() -> Self {
        Self {
            noise_window: 50,
            work_integration: WorkIntegration::Distance,
        }
    }
}

impl MetricsOptions {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.noise_window < 2 {
            return Err(AnalysisError::invalid_parameter(
                "metrics.noise_window",
                format!("must be at least 2 samples, got {}", self.noise_window),
            ));
        }
        self.work_integration.validate()
    }
}

/// Metrics of one layer together with the propagation search that fed them.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerMetrics {
    pub record: MetricsRecord,
    pub propagation: PropagationEnd,
}

/// Compute the metrics record of `layer`.
pub fn aggregate(
    layer: &LayerRecord,
    smoothed_force: &[f64],
    positions: &[f64],
    times: &[f64],
    params: &AnalysisParams,
) -> Result<MetricsRecord, AnalysisError> {
    aggregate_detailed(layer, smoothed_force, positions, times, params).map(|m| m.record)
}

/// [`aggregate`], also returning the propagation search details.
pub fn aggregate_detailed(
    layer: &LayerRecord,
    smoothed_force: &[f64],
    positions: &[f64],
    times: &[f64],
    params: &AnalysisParams,
) -> Result<LayerMetrics, AnalysisError> {
    params.metrics.validate()?;
    let n = smoothed_force.len();
    if positions.len() != n || times.len() != n {
        return Err(AnalysisError::invalid_samples(format!(
            "metric inputs differ in length (force={n}, position={}, time={})",
            positions.len(),
            times.len()
        )));
    }
    let lifting = layer.lifting;
    if lifting.len() < 2 || lifting.end > n {
        return Err(AnalysisError::insufficient(
            "lifting range",
            2,
            lifting.len().min(n.saturating_sub(lifting.start)),
        ));
    }
    let peak = layer.peak_index;
    if peak >= n {
        return Err(AnalysisError::invalid_parameter(
            "peak_index",
            format!("index {peak} is outside the {n}-sample stream"),
        ));
    }

    let quiet = quiet_window(layer, n, params.metrics.noise_window);
    let propagation = find_propagation_end_with_noise(
        smoothed_force,
        positions,
        peak,
        lifting.end - 1,
        layer.lift_direction,
        curvature_noise(smoothed_force, quiet, params.propagation.curvature_step),
        &params.propagation,
    )?;
    let prop_end = propagation.index;

    let layer_end = layer.end().min(n);
    let baseline_force = baseline(&smoothed_force[..layer_end], prop_end, &params.baseline)?;

    let from = lifting.start;
    if prop_end < from + 1 {
        return Err(AnalysisError::insufficient(
            "work integration",
            2,
            (prop_end + 1).saturating_sub(from),
        ));
    }
    let sign = layer.lift_direction.sign();
    let span = from..prop_end + 1;
    let travel: Vec<f64> = positions[span.clone()].iter().map(|p| p * sign).collect();
    let force = &smoothed_force[span.clone()];
    let corrected: Vec<f64> = force.iter().map(|f| f - baseline_force).collect();
    let mode = params.metrics.work_integration;
    let work = mode.work_mj(&times[span.clone()], &travel, force);
    let work_corrected = mode.work_mj(&times[span], &travel, &corrected);

    let peak_force = smoothed_force[peak];
    let peak_force_corrected = peak_force - baseline_force;
    let noise = noise_sigma(&smoothed_force[quiet.start..quiet.end])?;

    let record = MetricsRecord {
        peak_force,
        peak_force_time: times[peak],
        baseline_force,
        peak_force_corrected,
        propagation_end_time: times[prop_end],
        propagation_end_index: prop_end,
        pre_initiation_duration: times[peak] - times[from],
        propagation_duration: times[prop_end] - times[peak],
        work_of_adhesion_mj: work,
        work_of_adhesion_corrected_mj: work_corrected,
        signal_to_noise_ratio: peak_force_corrected / noise,
    };
    Ok(LayerMetrics {
        record,
        propagation,
    })
}

/// Trailing `noise_window` samples of the stable range, clamped to the data.
fn quiet_window(layer: &LayerRecord, n: usize, noise_window: usize) -> IndexRange {
    let end = layer.stable.end.min(n);
    let start = layer.stable.start.max(end.saturating_sub(noise_window)).min(end);
    IndexRange::new(start, end)
}

/// Standard deviation of the quiet samples, floored.
fn noise_sigma(quiet: &[f64]) -> Result<f64, AnalysisError> {
    if quiet.len() < 2 {
        return Err(AnalysisError::insufficient("noise window", 2, quiet.len()));
    }
    let mean = quiet.iter().sum::<f64>() / quiet.len() as f64;
    let var = quiet.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / quiet.len() as f64;
    Ok(var.sqrt().max(NOISE_FLOOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IndexRange, TravelDirection};

    struct Trace {
        times: Vec<f64>,
        positions: Vec<f64>,
        force: Vec<f64>,
    }

    /// 100 Hz: rest with ±1 mN ripple until 50, lift at 0.02 mm/sample to 150,
    /// force ramps 0.01→0.21 N over 50..80 and back to 0.01 N by 100.
    fn trace() -> Trace {
        let n = 200;
        let times = (0..n).map(|i| i as f64 * 0.01).collect();
        let positions = (0..n)
            .map(|i| 0.02 * (i.clamp(50, 150) - 50) as f64)
            .collect();
        let force = (0..n)
            .map(|i| match i {
                0..=49 => 0.01 + if i % 2 == 0 { 0.001 } else { -0.001 },
                50..=80 => 0.01 + 0.2 * (i - 50) as f64 / 30.0,
                81..=99 => 0.21 - 0.2 * (i - 80) as f64 / 20.0,
                _ => 0.01,
            })
            .collect();
        Trace {
            times,
            positions,
            force,
        }
    }

    fn layer() -> LayerRecord {
        LayerRecord {
            layer_number: 1,
            stable: IndexRange::new(0, 50),
            sandwich: None,
            lifting: IndexRange::new(50, 150),
            retraction: IndexRange::new(150, 150),
            lift_direction: TravelDirection::Increasing,
            peak_index: 80,
            peak_force: 0.21,
            peak_time: 0.8,
            metrics: None,
        }
    }

    #[test]
    fn computes_all_fields_for_a_clean_layer() {
        let tr = trace();
        let detailed = aggregate_detailed(
            &layer(),
            &tr.force,
            &tr.positions,
            &tr.times,
            &AnalysisParams::default(),
        )
        .expect("metrics");
        let m = &detailed.record;
        assert_eq!(m.propagation_end_index, 100);
        assert_eq!(detailed.propagation.lifting_point, 149);
        assert!((m.baseline_force - 0.01).abs() < 1e-12);
        assert!((m.peak_force_corrected - 0.2).abs() < 1e-12);
        assert!((m.pre_initiation_duration - 0.3).abs() < 1e-9);
        assert!((m.propagation_duration - 0.2).abs() < 1e-9);
        assert!((m.work_of_adhesion_mj - 0.11).abs() < 1e-9, "{}", m.work_of_adhesion_mj);
        assert!((m.work_of_adhesion_corrected_mj - 0.1).abs() < 1e-9);
        assert!((m.signal_to_noise_ratio - 200.0).abs() < 0.2, "{}", m.signal_to_noise_ratio);
        assert!(m.propagation_end_time >= m.peak_force_time);
    }

    #[test]
    fn time_integration_matches_distance_at_constant_speed() {
        let tr = trace();
        let mut params = AnalysisParams::default();
        params.metrics.work_integration = WorkIntegration::Time {
            speed_mm_per_s: 2.0,
        };
        let m = aggregate(&layer(), &tr.force, &tr.positions, &tr.times, &params)
            .expect("metrics");
        assert!((m.work_of_adhesion_mj - 0.11).abs() < 1e-9);
    }

    #[test]
    fn one_sample_lifting_range_is_insufficient() {
        let tr = trace();
        let mut short = layer();
        short.lifting = IndexRange::new(80, 81);
        let err = aggregate(
            &short,
            &tr.force,
            &tr.positions,
            &tr.times,
            &AnalysisParams::default(),
        )
        .expect_err("degenerate lift");
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn empty_stable_range_is_insufficient() {
        let tr = trace();
        let mut no_rest = layer();
        no_rest.stable = IndexRange::new(50, 50);
        let err = aggregate(
            &no_rest,
            &tr.force,
            &tr.positions,
            &tr.times,
            &AnalysisParams::default(),
        )
        .expect_err("no quiescent samples");
        assert!(err.is_insufficient_data(), "{err}");
    }

    #[test]
    fn noise_floor_keeps_snr_finite() {
        let mut tr = trace();
        for v in tr.force.iter_mut().take(50) {
            *v = 0.01;
        }
        let m = aggregate(
            &layer(),
            &tr.force,
            &tr.positions,
            &tr.times,
            &AnalysisParams::default(),
        )
        .expect("metrics");
        assert!(m.signal_to_noise_ratio.is_finite());
        assert!(m.signal_to_noise_ratio > 1e9);
    }

    #[test]
    fn peak_at_lift_start_with_degenerate_search_is_insufficient() {
        let mut tr = trace();
        // Stage never moves, so the search collapses onto the peak.
        tr.positions = vec![0.0; tr.force.len()];
        let mut early = layer();
        early.peak_index = 50;
        let err = aggregate(
            &early,
            &tr.force,
            &tr.positions,
            &tr.times,
            &AnalysisParams::default(),
        )
        .expect_err("one-sample integration window");
        assert!(err.is_insufficient_data(), "{err}");
        assert!(err.to_string().contains("work integration"), "{err}");
    }

    #[test]
    fn inverted_lifting_range_is_insufficient() {
        let tr = trace();
        let mut inverted = layer();
        inverted.lifting = IndexRange { start: 150, end: 50 };
        let err = aggregate(
            &inverted,
            &tr.force,
            &tr.positions,
            &tr.times,
            &AnalysisParams::default(),
        )
        .expect_err("inverted lift");
        assert!(err.is_insufficient_data(), "{err}");
    }

    #[test]
    fn ripple_in_quiet_window_raises_the_curvature_floor() {
        let tr = trace();
        let detailed = aggregate_detailed(
            &layer(),
            &tr.force,
            &tr.positions,
            &tr.times,
            &AnalysisParams::default(),
        )
        .expect("metrics");
        // ±1 mN alternating ripple gives a 5-step second difference of ±4 mN.
        assert!(
            (detailed.propagation.strength_floor - 0.016).abs() < 1e-9,
            "floor={}",
            detailed.propagation.strength_floor
        );
        assert_eq!(detailed.propagation.index, 100);
    }
}
