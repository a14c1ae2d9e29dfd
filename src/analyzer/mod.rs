//! Adhesion analyzer orchestrating smoothing, peak detection, segmentation
//! and per-layer metrics.
//!
//! Modules
//! - [`params`] – configuration shared by every stage, loadable from JSON.
//! - `pipeline` – the [`AdhesionAnalyzer`] implementation.
//! - `batch` – [`analyze_batch`] for many logs, parallel with the `parallel`
//!   feature.
//!
//! The analyzer holds no mutable state: one instance can serve any number of
//! logs concurrently, and repeated calls with the same input give identical
//! results.

mod batch;
pub mod params;
mod pipeline;

pub use batch::{analyze_batch, BatchInput, BatchOutcome};
pub use params::AnalysisParams;
pub use pipeline::AdhesionAnalyzer;
