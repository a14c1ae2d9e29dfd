use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Integration variable for the work of adhesion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WorkIntegration {
    /// Force over stage travel along the lift (N·mm = mJ).
    #[default]
    Distance,
    /// Force over time, scaled by a known constant lift speed.
    Time { speed_mm_per_s: f64 },
}

impl WorkIntegration {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if let WorkIntegration::Time { speed_mm_per_s } = *self {
            if !(speed_mm_per_s.is_finite() && speed_mm_per_s > 0.0) {
                return Err(AnalysisError::invalid_parameter(
                    "metrics.work_integration.speed_mm_per_s",
                    format!("must be positive, got {speed_mm_per_s}"),
                ));
            }
        }
        Ok(())
    }

    /// Work in mJ for `force` sampled at `times` / `travel` (equal lengths).
    pub fn work_mj(&self, times: &[f64], travel: &[f64], force: &[f64]) -> f64 {
        match *self {
            WorkIntegration::Distance => trapezoid(travel, force),
            WorkIntegration::Time { speed_mm_per_s } => trapezoid(times, force) * speed_mm_per_s,
        }
    }
}

/// Trapezoidal rule over paired samples; extra trailing values are ignored.
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]))
        .sum()
}
