#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod analyzer;
pub mod diagnostics;
pub mod error;
pub mod types;

// Stage modules, usable on their own by tools that need a single step.
pub mod baseline;
pub mod metrics;
pub mod peaks;
pub mod propagation;
pub mod segmentation;
pub mod smoothing;

// Edge utilities for the command-line tools.
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

// Main entry points: analyzer + results.
pub use crate::analyzer::{analyze_batch, AdhesionAnalyzer, AnalysisParams, BatchInput, BatchOutcome};
pub use crate::error::AnalysisError;
pub use crate::types::{
    AnalysisResult, DetectionStatus, IndexRange, LayerRecord, MetricsRecord, Sample, SampleLog,
    SampleView,
};

// High-level diagnostics returned by the analyzer.
pub use crate::diagnostics::{AnalysisReport, PipelineTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use adhesion_analyzer::prelude::*;
///
/// # fn main() -> Result<(), AnalysisError> {
/// let times: Vec<f64> = (0..1000).map(|i| i as f64 * 0.01).collect();
/// let positions = vec![0.0; 1000];
/// let forces = vec![0.01; 1000];
/// let log = SampleLog::new(times, positions, forces)?;
///
/// let analyzer = AdhesionAnalyzer::new(AnalysisParams::default())?;
/// let result = analyzer.analyze(log.as_view(), None)?;
/// println!("status={:?} layers={}", result.status, result.layers.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::smoothing::SmoothingMethod;
    pub use crate::{
        AdhesionAnalyzer, AnalysisError, AnalysisParams, AnalysisResult, DetectionStatus,
        SampleLog, SampleView,
    };
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    // Stage runners.
    pub use crate::baseline::baseline;
    pub use crate::metrics::{aggregate, aggregate_detailed, trapezoid};
    pub use crate::peaks::{find_peaks, peak_prominence};
    pub use crate::propagation::{
        curvature_noise, find_propagation_end, find_propagation_end_with_noise, locate,
    };
    pub use crate::segmentation::segment;
    pub use crate::smoothing::{gaussian_filter, savgol_filter, smooth};

    // Stage options.
    pub use crate::baseline::{BaselineEstimator, BaselineOptions};
    pub use crate::metrics::{LayerMetrics, MetricsOptions, WorkIntegration};
    pub use crate::peaks::PeakOptions;
    pub use crate::propagation::{PropagationEnd, PropagationFallback, PropagationOptions};
    pub use crate::segmentation::{LiftDirection, SegmentationOptions};

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        InputDescriptor, LayerTrace, PeakSample, PeakStage, SegmentationStage, SmoothingStage,
        StageTiming, TimingBreakdown,
    };
}
