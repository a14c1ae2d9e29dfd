//! Diagnostics data model returned alongside analysis results.
//!
//! `AnalysisReport` is the entry point returned by
//! `AdhesionAnalyzer::analyze_with_diagnostics`, bundling the
//! [`AnalysisResult`](crate::types::AnalysisResult) with a `PipelineTrace`
//! describing every stage that ran: timings, smoothing range, surviving peaks
//! and their prominences, segmentation counts and per-layer propagation
//! searches.

pub mod pipeline;
pub mod stages;
pub mod timing;

pub use pipeline::{AnalysisReport, InputDescriptor, PipelineTrace};
pub use stages::{LayerTrace, PeakSample, PeakStage, SegmentationStage, SmoothingStage};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
