//! End-to-end orchestration of one analysis call.
//!
//! Stages, in order:
//! - Smoothing: denoise the raw force with the configured family.
//! - Peaks: candidate pull-off events on the smoothed force.
//! - Segmentation: one layer record per surviving peak.
//! - Per layer: propagation end, baseline and metrics. A layer that lacks
//!   samples for any window is skipped and reported; the others complete.
//!
//! Typical usage:
//! ```no_run
//! use adhesion_analyzer::{AdhesionAnalyzer, AnalysisParams, SampleLog};
//!
//! # fn example(log: SampleLog) -> Result<(), adhesion_analyzer::AnalysisError> {
//! let analyzer = AdhesionAnalyzer::new(AnalysisParams::default())?;
//! let result = analyzer.analyze(log.as_view(), None)?;
//! for (layer, metrics) in result.metrics() {
//!     println!("layer {layer}: {:.3} N", metrics.peak_force_corrected);
//! }
//! # Ok(())
//! # }
//! ```

use super::params::AnalysisParams;
use crate::diagnostics::{
    elapsed_ms, AnalysisReport, InputDescriptor, LayerTrace, PeakSample, PeakStage,
    PipelineTrace, SegmentationStage, SmoothingStage,
};
use crate::error::AnalysisError;
use crate::metrics::aggregate_detailed;
use crate::peaks::{find_peaks, peak_prominence};
use crate::segmentation::segment;
use crate::smoothing::smooth;
use crate::types::{AnalysisResult, DetectionStatus, SampleView, SkippedLayer};
use log::{debug, warn};
use std::time::Instant;

/// Stateless adhesion analyzer; shareable across threads.
#[derive(Clone, Debug)]
pub struct AdhesionAnalyzer {
    params: AnalysisParams,
}

impl AdhesionAnalyzer {
    /// Create an analyzer, rejecting invalid parameters up front.
    pub fn new(params: AnalysisParams) -> Result<Self, AnalysisError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Analyse one sample stream. `known_layers` are assigned in temporal order.
    pub fn analyze(
        &self,
        samples: SampleView<'_>,
        known_layers: Option<&[u32]>,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_with_diagnostics(samples, known_layers)
            .map(|report| report.result)
    }

    /// Analyse one sample stream and capture a stage-by-stage trace.
    pub fn analyze_with_diagnostics(
        &self,
        samples: SampleView<'_>,
        known_layers: Option<&[u32]>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let total_start = Instant::now();
        samples.validate()?;
        let mut trace = PipelineTrace::new(InputDescriptor::describe(&samples));
        debug!("analysing {} samples", samples.len());

        let (smoothed, smoothing_ms) = trace
            .timings
            .record("smoothing", || smooth(samples.forces, &self.params.smoothing));
        let smoothed = smoothed?;
        trace.smoothing = Some(SmoothingStage {
            method: self.params.smoothing.label().to_string(),
            elapsed_ms: smoothing_ms,
            force_min: smoothed.iter().copied().fold(f64::INFINITY, f64::min),
            force_max: smoothed.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        });

        let (peaks, peaks_ms) = trace
            .timings
            .record("peaks", || find_peaks(&smoothed, &self.params.peaks));
        trace.peaks = Some(PeakStage {
            elapsed_ms: peaks_ms,
            peaks: peaks
                .iter()
                .map(|&i| PeakSample {
                    index: i,
                    time: samples.times[i],
                    force: smoothed[i],
                    prominence: peak_prominence(&smoothed, i),
                })
                .collect(),
        });
        debug!("{} peak(s) found", peaks.len());

        if peaks.is_empty() {
            trace.timings.total_ms = elapsed_ms(total_start);
            return Ok(AnalysisReport {
                result: AnalysisResult::no_peaks(),
                trace,
            });
        }

        let (layers, segmentation_ms) = trace.timings.record("segmentation", || {
            segment(
                samples.positions,
                samples.times,
                &smoothed,
                &peaks,
                known_layers,
                &self.params.segmentation,
            )
        });
        let mut layers = layers?;
        trace.segmentation = Some(SegmentationStage {
            elapsed_ms: segmentation_ms,
            layers: layers.len(),
            dropped_peaks: peaks.len() - layers.len(),
            sandwich_contacts: layers.iter().filter_map(|l| l.sandwich).collect(),
        });
        debug!("{} layer(s) segmented", layers.len());
        if layers.is_empty() {
            trace.timings.total_ms = elapsed_ms(total_start);
            return Ok(AnalysisReport {
                result: AnalysisResult::no_peaks(),
                trace,
            });
        }

        let stage_start = Instant::now();
        let mut skipped = Vec::new();
        for layer in layers.iter_mut() {
            let layer_start = Instant::now();
            match aggregate_detailed(
                layer,
                &smoothed,
                samples.positions,
                samples.times,
                &self.params,
            ) {
                Ok(detailed) => {
                    trace.layers.push(LayerTrace {
                        layer_number: layer.layer_number,
                        peak_index: layer.peak_index,
                        elapsed_ms: elapsed_ms(layer_start),
                        propagation: detailed.propagation,
                    });
                    layer.metrics = Some(detailed.record);
                }
                Err(err) if err.is_insufficient_data() => {
                    warn!("layer {} skipped: {err}", layer.layer_number);
                    skipped.push(SkippedLayer {
                        layer_number: layer.layer_number,
                        peak_index: layer.peak_index,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        trace.timings.push("metrics", elapsed_ms(stage_start));
        trace.skipped = skipped.clone();
        trace.timings.total_ms = elapsed_ms(total_start);

        Ok(AnalysisReport {
            result: AnalysisResult {
                status: DetectionStatus::Detected,
                layers,
                skipped,
            },
            trace,
        })
    }
}
