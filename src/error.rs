//! Error taxonomy shared by every analysis stage.
//!
//! Only conditions that abort a call are represented here. "No peaks" is a
//! regular outcome ([`DetectionStatus::NoPeaksDetected`]) and a collapsed
//! propagation search window is resolved by a documented fallback
//! ([`PropagationFallback::DegenerateSearchWindow`]).
//!
//! [`DetectionStatus::NoPeaksDetected`]: crate::types::DetectionStatus::NoPeaksDetected
//! [`PropagationFallback::DegenerateSearchWindow`]: crate::propagation::PropagationFallback::DegenerateSearchWindow

/// Reasons why an analysis call may fail.
#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisError {
    /// Malformed configuration, rejected before any computation starts.
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
    /// Fewer samples than a stage needs.
    InsufficientData {
        stage: &'static str,
        required: usize,
        available: usize,
    },
    /// Sample columns that cannot form a valid stream.
    InvalidSamples { reason: String },
}

impl AnalysisError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn insufficient(stage: &'static str, required: usize, available: usize) -> Self {
        AnalysisError::InsufficientData {
            stage,
            required,
            available,
        }
    }

    pub(crate) fn invalid_samples(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidSamples {
            reason: reason.into(),
        }
    }

    /// `true` for [`AnalysisError::InsufficientData`].
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AnalysisError::InsufficientData { .. })
    }

    /// `true` for [`AnalysisError::InvalidParameter`].
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, AnalysisError::InvalidParameter { .. })
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter `{name}`: {reason}")
            }
            AnalysisError::InsufficientData {
                stage,
                required,
                available,
            } => write!(
                f,
                "insufficient data for {stage} ({available} samples, need ≥{required})"
            ),
            AnalysisError::InvalidSamples { reason } => write!(f, "invalid samples: {reason}"),
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::AnalysisError;

    #[test]
    fn display_names_stage_and_counts() {
        let err = AnalysisError::insufficient("baseline window", 2, 1);
        let text = err.to_string();
        assert!(text.contains("baseline window"), "text={text}");
        assert!(text.contains("1 samples"), "text={text}");
        assert!(err.is_insufficient_data());
        assert!(!err.is_invalid_parameter());
    }
}
