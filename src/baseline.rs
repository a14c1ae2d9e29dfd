//! Post-release baseline force.
//!
//! Once the part has released, the force settles on a level made of fluid
//! drag, buoyancy and sensor offset. That level is estimated over a window
//! starting at the propagation end and later subtracted from the peak.
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Robust location estimators for the baseline window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaselineEstimator {
    Mean,
    /// Mean after discarding `trim_fraction` of the samples at each end.
    TrimmedMean { trim_fraction: f64 },
}

impl Default for BaselineEstimator {
    fn default() -> Self {
        BaselineEstimator::TrimmedMean { trim_fraction: 0.1 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineOptions {
    /// Samples averaged after the propagation end.
    pub window: usize,
    pub estimator: BaselineEstimator,
}

impl Default for BaselineOptions {
    fn default() -> Self {
        Self {
            window: 50,
            estimator: BaselineEstimator::default(),
        }
    }
}

impl BaselineOptions {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.window < 2 {
            return Err(AnalysisError::invalid_parameter(
                "baseline.window",
                format!("must be at least 2 samples, got {}", self.window),
            ));
        }
        if let BaselineEstimator::TrimmedMean { trim_fraction } = self.estimator {
            if !(0.0..0.5).contains(&trim_fraction) {
                return Err(AnalysisError::invalid_parameter(
                    "baseline.trim_fraction",
                    format!("must lie in [0, 0.5), got {trim_fraction}"),
                ));
            }
        }
        Ok(())
    }
}

/// Baseline over `smoothed_force[start..start + window]`, clipped to the slice.
pub fn baseline(
    smoothed_force: &[f64],
    start: usize,
    options: &BaselineOptions,
) -> Result<f64, AnalysisError> {
    options.validate()?;
    let end = start.saturating_add(options.window).min(smoothed_force.len());
    let window = smoothed_force.get(start..end).unwrap_or(&[]);
    if window.len() < 2 {
        return Err(AnalysisError::insufficient(
            "baseline window",
            2,
            window.len(),
        ));
    }
    Ok(match options.estimator {
        BaselineEstimator::Mean => mean(window),
        BaselineEstimator::TrimmedMean { trim_fraction } => trimmed_mean(window, trim_fraction),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn trimmed_mean(values: &[f64], trim_fraction: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let cut = (trim_fraction * sorted.len() as f64).floor() as usize;
    let kept = &sorted[cut..sorted.len() - cut];
    if kept.is_empty() {
        mean(&sorted)
    } else {
        mean(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_mean_ignores_outliers() {
        let mut force = vec![0.02; 20];
        force[3] = 1.0;
        force[11] = -1.0;
        let value = baseline(&force, 0, &BaselineOptions::default()).expect("baseline");
        assert!((value - 0.02).abs() < 1e-12, "value={value}");

        let plain = BaselineOptions {
            estimator: BaselineEstimator::Mean,
            ..BaselineOptions::default()
        };
        let value = baseline(&force, 0, &plain).expect("baseline");
        assert!((value - 0.02).abs() > 1e-6);
    }

    #[test]
    fn window_is_clipped_to_the_slice() {
        let force: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let opts = BaselineOptions {
            window: 50,
            estimator: BaselineEstimator::Mean,
        };
        let value = baseline(&force, 6, &opts).expect("baseline");
        assert!((value - 7.5).abs() < 1e-12);
    }

    #[test]
    fn fewer_than_two_samples_is_insufficient() {
        let force = [0.1, 0.2, 0.3];
        let err = baseline(&force, 2, &BaselineOptions::default()).expect_err("one sample");
        assert!(err.is_insufficient_data());
        let err = baseline(&force, 7, &BaselineOptions::default()).expect_err("past the end");
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn trim_fraction_must_stay_below_half() {
        let opts = BaselineOptions {
            window: 10,
            estimator: BaselineEstimator::TrimmedMean { trim_fraction: 0.5 },
        };
        assert!(opts.validate().expect_err("trim 0.5").is_invalid_parameter());
    }
}
