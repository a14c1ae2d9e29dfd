use crate::propagation::PropagationEnd;
use crate::types::IndexRange;
use serde::Serialize;

/// Smoothing pass over the raw force.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothingStage {
    pub method: String,
    pub elapsed_ms: f64,
    pub force_min: f64,
    pub force_max: f64,
}

/// One pull-off candidate that survived every peak gate.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakSample {
    pub index: usize,
    pub time: f64,
    pub force: f64,
    pub prominence: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakStage {
    pub elapsed_ms: f64,
    pub peaks: Vec<PeakSample>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationStage {
    pub elapsed_ms: f64,
    pub layers: usize,
    /// Peaks merged into an earlier layer or rejected as stationary.
    pub dropped_peaks: usize,
    pub sandwich_contacts: Vec<IndexRange>,
}

/// Propagation search and aggregation of one layer.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerTrace {
    pub layer_number: u32,
    pub peak_index: usize,
    pub elapsed_ms: f64,
    pub propagation: PropagationEnd,
}
