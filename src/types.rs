use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// One raw reading: elapsed time (s), stage position (mm), force (N).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub position: f64,
    pub force: f64,
}

/// Borrowed column view over a sample stream.
///
/// The engine only ever reads through this view; smoothed copies are derived
/// from `forces` and the caller's buffers are never touched.
#[derive(Clone, Copy, Debug)]
pub struct SampleView<'a> {
    pub times: &'a [f64],
    pub positions: &'a [f64],
    pub forces: &'a [f64],
}

impl<'a> SampleView<'a> {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Check column lengths, finiteness and strictly increasing time.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        validate_columns(self.times, self.positions, self.forces)
    }
}

/// Owned sample stream with validated columns.
#[derive(Clone, Debug, Default)]
pub struct SampleLog {
    times: Vec<f64>,
    positions: Vec<f64>,
    forces: Vec<f64>,
}

impl SampleLog {
    pub fn new(
        times: Vec<f64>,
        positions: Vec<f64>,
        forces: Vec<f64>,
    ) -> Result<Self, AnalysisError> {
        validate_columns(&times, &positions, &forces)?;
        Ok(Self {
            times,
            positions,
            forces,
        })
    }

    pub fn from_samples(samples: &[Sample]) -> Result<Self, AnalysisError> {
        let times = samples.iter().map(|s| s.time).collect();
        let positions = samples.iter().map(|s| s.position).collect();
        let forces = samples.iter().map(|s| s.force).collect();
        Self::new(times, positions, forces)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn forces(&self) -> &[f64] {
        &self.forces
    }

    pub fn as_view(&self) -> SampleView<'_> {
        SampleView {
            times: &self.times,
            positions: &self.positions,
            forces: &self.forces,
        }
    }
}

fn validate_columns(times: &[f64], positions: &[f64], forces: &[f64]) -> Result<(), AnalysisError> {
    if times.len() != positions.len() || times.len() != forces.len() {
        return Err(AnalysisError::invalid_samples(format!(
            "column lengths differ (time={}, position={}, force={})",
            times.len(),
            positions.len(),
            forces.len()
        )));
    }
    for (i, ((&t, &p), &f)) in times.iter().zip(positions).zip(forces).enumerate() {
        if !(t.is_finite() && p.is_finite() && f.is_finite()) {
            return Err(AnalysisError::invalid_samples(format!(
                "non-finite value at sample {i}"
            )));
        }
    }
    if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
        return Err(AnalysisError::invalid_samples(format!(
            "time is not strictly increasing at sample {}",
            i + 1
        )));
    }
    Ok(())
}

/// Half-open `[start, end)` range over sample indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Motion phase of the stage during one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPhase {
    Stable,
    SandwichContact,
    Lifting,
    Retracting,
}

/// A motion phase tagged with the samples it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpan {
    pub phase: MotionPhase,
    pub range: IndexRange,
}

/// Sign of the position change while the stage lifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelDirection {
    Increasing,
    Decreasing,
}

impl TravelDirection {
    /// Multiplier mapping a raw position onto "travel along the lift".
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            TravelDirection::Increasing => 1.0,
            TravelDirection::Decreasing => -1.0,
        }
    }
}

/// One peel event as segmented from the motion trace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub layer_number: u32,
    pub stable: IndexRange,
    pub sandwich: Option<IndexRange>,
    pub lifting: IndexRange,
    pub retraction: IndexRange,
    pub lift_direction: TravelDirection,
    pub peak_index: usize,
    pub peak_force: f64,
    pub peak_time: f64,
    pub metrics: Option<MetricsRecord>,
}

impl LayerRecord {
    /// Phases of this layer in temporal order, empty ranges omitted.
    pub fn phases(&self) -> Vec<PhaseSpan> {
        let mut spans = Vec::with_capacity(4);
        let mut push = |phase, range: IndexRange| {
            if !range.is_empty() {
                spans.push(PhaseSpan { phase, range });
            }
        };
        push(MotionPhase::Stable, self.stable);
        if let Some(sandwich) = self.sandwich {
            push(MotionPhase::SandwichContact, sandwich);
        }
        push(MotionPhase::Lifting, self.lifting);
        push(MotionPhase::Retracting, self.retraction);
        spans
    }

    /// Last sample index (exclusive) owned by this layer.
    pub fn end(&self) -> usize {
        self.retraction.end.max(self.lifting.end)
    }
}

/// Adhesion metrics derived for one layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub peak_force: f64,
    pub peak_force_time: f64,
    pub baseline_force: f64,
    pub peak_force_corrected: f64,
    pub propagation_end_time: f64,
    pub propagation_end_index: usize,
    pub pre_initiation_duration: f64,
    pub propagation_duration: f64,
    pub work_of_adhesion_mj: f64,
    pub work_of_adhesion_corrected_mj: f64,
    pub signal_to_noise_ratio: f64,
}

/// Whether the run found anything to analyse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    Detected,
    NoPeaksDetected,
}

/// A segmented layer whose metrics could not be computed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkippedLayer {
    pub layer_number: u32,
    pub peak_index: usize,
    pub reason: String,
}

/// Outcome of one analysis call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub status: DetectionStatus,
    pub layers: Vec<LayerRecord>,
    pub skipped: Vec<SkippedLayer>,
}

impl AnalysisResult {
    pub(crate) fn no_peaks() -> Self {
        Self {
            status: DetectionStatus::NoPeaksDetected,
            layers: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Metrics of every fully analysed layer, in temporal order.
    pub fn metrics(&self) -> impl Iterator<Item = (u32, &MetricsRecord)> {
        self.layers
            .iter()
            .filter_map(|l| l.metrics.as_ref().map(|m| (l.layer_number, m)))
    }
}
