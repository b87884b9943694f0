//! Error taxonomy for risk scoring.
//!
//! Distinguishes failures that are local to one pair's evaluation (the batch
//! skips the pair and continues) from configuration bugs that should stop
//! the process at startup.

use thiserror::Error;

/// Errors produced by the scoring and decision engine.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Price series is shorter than the slowest configured window.
    #[error("insufficient data: need {required} candles, got {actual}")]
    InsufficientData {
        /// Minimum series length for the configured windows.
        required: usize,
        /// Actual series length.
        actual: usize,
    },

    /// Malformed or out-of-range input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Degenerate arithmetic, e.g. a zero middle band in the width ratio.
    #[error("computation overflow: {0}")]
    ComputationOverflow(String),

    /// No rule in the table matched a score pair. Indicates a table that
    /// slipped past the startup totality check.
    #[error("no rule matched scores (volatility {volatility}, event impact {event_impact})")]
    UnmatchedRule {
        /// Volatility score that failed to match.
        volatility: f64,
        /// Event impact score that failed to match.
        event_impact: f64,
    },

    /// Invalid configuration detected at load time.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RiskError {
    /// Creates an insufficient-data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a computation-overflow error.
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::ComputationOverflow(message.into())
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if the failure is local to a single pair's evaluation.
    ///
    /// Pair-local failures are logged and skipped by the batch evaluator;
    /// the remaining errors indicate configuration bugs and should never be
    /// swallowed.
    #[must_use]
    pub fn is_pair_local(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. } | Self::Validation(_) | Self::ComputationOverflow(_)
        )
    }
}

/// Result type alias for scoring operations.
pub type Result<T> = std::result::Result<T, RiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let err = RiskError::insufficient_data(15, 7);
        assert!(err.to_string().contains("15"));
        assert!(err.to_string().contains("7"));
    }

    #[test]
    fn test_unmatched_rule_display() {
        let err = RiskError::UnmatchedRule {
            volatility: 0.42,
            event_impact: 0.9,
        };
        assert!(err.to_string().contains("0.42"));
        assert!(err.to_string().contains("0.9"));
    }

    #[test]
    fn test_pair_local_classification() {
        assert!(RiskError::insufficient_data(10, 2).is_pair_local());
        assert!(RiskError::validation("negative price").is_pair_local());
        assert!(RiskError::overflow("zero middle band").is_pair_local());
        assert!(!RiskError::configuration("weights").is_pair_local());
        assert!(!RiskError::UnmatchedRule {
            volatility: 0.5,
            event_impact: 0.5
        }
        .is_pair_local());
    }
}
