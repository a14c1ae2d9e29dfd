//! Parameter types configuring the analysis stages.
//!
//! Defaults assume a log sampled around 100 Hz with layer cycles a few
//! seconds apart. For tuning start with the peak gates and the stability
//! threshold; the remaining knobs rarely need to move.

use crate::baseline::BaselineOptions;
use crate::error::AnalysisError;
use crate::metrics::MetricsOptions;
use crate::peaks::PeakOptions;
use crate::propagation::PropagationOptions;
use crate::segmentation::SegmentationOptions;
use crate::smoothing::SmoothingMethod;
use serde::{Deserialize, Serialize};

/// Analysis-wide parameters, fixed for the lifetime of an analyzer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub smoothing: SmoothingMethod,
    pub peaks: PeakOptions,
    pub segmentation: SegmentationOptions,
    pub propagation: PropagationOptions,
    pub baseline: BaselineOptions,
    pub metrics: MetricsOptions,
}

impl AnalysisParams {
    /// Check every stage's parameters; the first violation is returned.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.smoothing.validate()?;
        self.peaks.validate()?;
        self.segmentation.validate()?;
        self.propagation.validate()?;
        self.baseline.validate()?;
        self.metrics.validate()
    }
}
