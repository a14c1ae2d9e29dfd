use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Which way the stage position moves while lifting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftDirection {
    /// Resolved per layer from the position change around the peak.
    #[default]
    Auto,
    Increasing,
    Decreasing,
}

/// Knobs of the motion-phase state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationOptions {
    /// Largest change between consecutive window means still considered at rest (mm).
    pub stability_threshold_mm: f64,
    /// Samples per window in the stability test.
    pub stability_window: usize,
    pub lift_direction: LiftDirection,
    /// Split a pre-lift contact dip into its own phase.
    pub sandwich_detection: bool,
    /// Deepest excursion still treated as a sandwich contact (mm).
    pub sandwich_max_depth_mm: f64,
    /// Longest dip (descent to lift start) still treated as a sandwich contact.
    pub sandwich_max_samples: usize,
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self {
            stability_threshold_mm: 0.02,
            stability_window: 10,
            lift_direction: LiftDirection::Auto,
            sandwich_detection: true,
            sandwich_max_depth_mm: 1.0,
            sandwich_max_samples: 300,
        }
    }
}

impl SegmentationOptions {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.stability_threshold_mm.is_finite() && self.stability_threshold_mm > 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "segmentation.stability_threshold_mm",
                format!("must be positive, got {}", self.stability_threshold_mm),
            ));
        }
        if self.stability_window == 0 {
            return Err(AnalysisError::invalid_parameter(
                "segmentation.stability_window",
                "must be at least 1 sample",
            ));
        }
        if !(self.sandwich_max_depth_mm.is_finite() && self.sandwich_max_depth_mm > 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "segmentation.sandwich_max_depth_mm",
                format!("must be positive, got {}", self.sandwich_max_depth_mm),
            ));
        }
        if self.sandwich_max_samples == 0 {
            return Err(AnalysisError::invalid_parameter(
                "segmentation.sandwich_max_samples",
                "must be at least 1 sample",
            ));
        }
        Ok(())
    }
}
