//! Independent analysis of many logs with one analyzer.

use super::pipeline::AdhesionAnalyzer;
use crate::error::AnalysisError;
use crate::types::{AnalysisResult, SampleLog};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One named log queued for batch analysis.
#[derive(Clone, Debug)]
pub struct BatchInput {
    pub name: String,
    pub samples: SampleLog,
    pub known_layers: Option<Vec<u32>>,
}

impl BatchInput {
    pub fn new(name: impl Into<String>, samples: SampleLog) -> Self {
        Self {
            name: name.into(),
            samples,
            known_layers: None,
        }
    }

    pub fn with_known_layers(mut self, layers: Vec<u32>) -> Self {
        self.known_layers = Some(layers);
        self
    }
}

#[derive(Clone, Debug)]
pub struct BatchOutcome {
    pub name: String,
    pub result: Result<AnalysisResult, AnalysisError>,
}

fn run_one(analyzer: &AdhesionAnalyzer, input: &BatchInput) -> BatchOutcome {
    BatchOutcome {
        name: input.name.clone(),
        result: analyzer.analyze(input.samples.as_view(), input.known_layers.as_deref()),
    }
}

/// Analyse every input; outcomes keep the input order and a failure stays
/// confined to its own outcome.
pub fn analyze_batch(analyzer: &AdhesionAnalyzer, inputs: &[BatchInput]) -> Vec<BatchOutcome> {
    #[cfg(feature = "parallel")]
    {
        inputs.par_iter().map(|input| run_one(analyzer, input)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().map(|input| run_one(analyzer, input)).collect()
    }
}
