use crate::diagnostics::{LayerTrace, PeakStage, SegmentationStage, SmoothingStage, TimingBreakdown};
use crate::types::{AnalysisResult, DetectionStatus, SampleView, SkippedLayer};
use serde::Serialize;

/// Result produced by [`AdhesionAnalyzer::analyze_with_diagnostics`](crate::AdhesionAnalyzer).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub trace: PipelineTrace,
}

fn format_optional(val: Option<f64>, unit: &str) -> String {
    val.map(|v| format!("{v:.4} {unit}"))
        .unwrap_or_else(|| "-".to_string())
}

impl AnalysisReport {
    /// Multi-line human-readable digest for terminals and logs.
    pub fn summary(&self) -> String {
        let input = &self.trace.input;
        let mut lines = vec![format!(
            "{} samples over {:.2} s (~{:.1} Hz), {:.3} ms total",
            input.samples, input.duration_s, input.mean_rate_hz, self.trace.timings.total_ms
        )];
        if self.result.status == DetectionStatus::NoPeaksDetected {
            lines.push("no peaks detected".to_string());
            return lines.join("\n");
        }
        for layer in &self.result.layers {
            let m = layer.metrics.as_ref();
            lines.push(format!(
                "layer {:>3}: peak {} at {:.3} s, baseline {}, work {}, snr {}",
                layer.layer_number,
                format_optional(m.map(|m| m.peak_force), "N"),
                layer.peak_time,
                format_optional(m.map(|m| m.baseline_force), "N"),
                format_optional(m.map(|m| m.work_of_adhesion_mj), "mJ"),
                format_optional(m.map(|m| m.signal_to_noise_ratio), ""),
            ));
        }
        for skipped in &self.result.skipped {
            lines.push(format!(
                "layer {:>3}: skipped ({})",
                skipped.layer_number, skipped.reason
            ));
        }
        lines.join("\n")
    }
}

/// End-to-end trace of one analysis call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<SmoothingStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peaks: Option<PeakStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<SegmentationStage>,
    pub layers: Vec<LayerTrace>,
    pub skipped: Vec<SkippedLayer>,
}

impl PipelineTrace {
    pub fn new(input: InputDescriptor) -> Self {
        Self {
            input,
            timings: TimingBreakdown::default(),
            smoothing: None,
            peaks: None,
            segmentation: None,
            layers: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub samples: usize,
    pub duration_s: f64,
    /// Sample count over duration; the stream need not be uniform.
    pub mean_rate_hz: f64,
    pub position_min_mm: f64,
    pub position_max_mm: f64,
}

impl InputDescriptor {
    pub fn describe(samples: &SampleView<'_>) -> Self {
        let duration_s = match (samples.times.first(), samples.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };
        let mean_rate_hz = if duration_s > 0.0 {
            (samples.len() - 1) as f64 / duration_s
        } else {
            0.0
        };
        let (position_min_mm, position_max_mm) = samples
            .positions
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            });
        Self {
            samples: samples.len(),
            duration_s,
            mean_rate_hz,
            position_min_mm: if samples.is_empty() { 0.0 } else { position_min_mm },
            position_max_mm: if samples.is_empty() { 0.0 } else { position_max_mm },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_reports_rate_and_travel() {
        let times = [0.0, 0.01, 0.02, 0.03, 0.04];
        let positions = [0.0, 0.5, 1.0, 0.5, -0.25];
        let forces = [0.0; 5];
        let view = SampleView {
            times: &times,
            positions: &positions,
            forces: &forces,
        };
        let d = InputDescriptor::describe(&view);
        assert_eq!(d.samples, 5);
        assert!((d.mean_rate_hz - 100.0).abs() < 1e-9);
        assert_eq!(d.position_min_mm, -0.25);
        assert_eq!(d.position_max_mm, 1.0);
    }

    #[test]
    fn empty_input_has_zero_descriptor() {
        let view = SampleView {
            times: &[],
            positions: &[],
            forces: &[],
        };
        let d = InputDescriptor::describe(&view);
        assert_eq!(d.samples, 0);
        assert_eq!(d.duration_s, 0.0);
        assert_eq!(d.position_min_mm, 0.0);
    }
}
