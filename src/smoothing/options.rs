use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Largest accepted Gaussian sigma (samples); the kernel spans `8σ + 1` taps.
pub const MAX_GAUSSIAN_SIGMA: f64 = 1.0e4;

/// Smoothing family applied to the raw force before feature detection.
///
/// Exactly one family is used per analysis session. The two families shift
/// the apparent peak time differently on asymmetric pulses, so compare
/// metrics only between runs that used the same variant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SmoothingMethod {
    /// Local polynomial least-squares fit over an odd-length window.
    SavitzkyGolay { window: usize, order: usize },
    /// Normalised Gaussian kernel truncated at 4σ (σ in samples).
    Gaussian { sigma: f64 },
}

impl Default for SmoothingMethod {
    fn default() -> Self {
        SmoothingMethod::SavitzkyGolay {
            window: 11,
            order: 3,
        }
    }
}

impl SmoothingMethod {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match *self {
            SmoothingMethod::SavitzkyGolay { window, order } => {
                if window % 2 == 0 {
                    return Err(AnalysisError::invalid_parameter(
                        "smoothing.window",
                        format!("window must be odd, got {window}"),
                    ));
                }
                if window < order + 1 {
                    return Err(AnalysisError::invalid_parameter(
                        "smoothing.window",
                        format!("window {window} is smaller than polynomial order {order} + 1"),
                    ));
                }
                Ok(())
            }
            SmoothingMethod::Gaussian { sigma } => {
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(AnalysisError::invalid_parameter(
                        "smoothing.sigma",
                        format!("sigma must be positive and finite, got {sigma}"),
                    ));
                }
                if sigma > MAX_GAUSSIAN_SIGMA {
                    return Err(AnalysisError::invalid_parameter(
                        "smoothing.sigma",
                        format!("sigma {sigma} exceeds {MAX_GAUSSIAN_SIGMA} samples"),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Minimum number of samples the family can process.
    pub fn min_samples(&self) -> usize {
        match *self {
            SmoothingMethod::SavitzkyGolay { window, .. } => window.max(2),
            SmoothingMethod::Gaussian { .. } => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SmoothingMethod::SavitzkyGolay { .. } => "savitzky_golay",
            SmoothingMethod::Gaussian { .. } => "gaussian",
        }
    }
}
