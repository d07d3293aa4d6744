//! Error types for QEST
//!
//! Gantree: L0_Foundation → Errors
//!
//! Every failure an estimation attempt can surface. Nothing here is retried
//! automatically; callers branch on the variant.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QEST
/// Gantree: QestError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QestError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Probability value out of range [0, 1]
    /// Gantree: InvalidProbability(f64) // 확률 범위
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    /// Physical parameter rejected at construction
    /// Gantree: InvalidParameter{{name,value}} // 파라미터 검증
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },

    /// Non-finite Bloch coordinates
    #[error("Invalid Bloch coordinates ({x}, {y}, {z}): must be finite")]
    InvalidCoordinates { x: f64, y: f64, z: f64 },

    /// Negative or non-finite evolution time
    #[error("Invalid duration {0}: must be finite and >= 0")]
    InvalidDuration(f64),

    /// Zero samples requested
    #[error("Invalid sample count {0}: must be > 0")]
    InvalidSampleCount(u64),

    /// Control input unusable for the requested protocol
    /// Gantree: InvalidControl{{protocol,u}} // 제어 입력
    #[error("Invalid control u = {u} for {protocol}: {reason}")]
    InvalidControl {
        protocol: String,
        u: f64,
        reason: String,
    },

    // ========================================================================
    // Estimation Errors
    // ========================================================================
    /// Logarithm argument or probability non-positive
    /// Gantree: InvalidMeasurement{{quantity,value}} // 측정값 무효
    #[error("Invalid measurement: {quantity} = {value:.6} must be > 0")]
    InvalidMeasurement { quantity: String, value: f64 },

    /// Candidate set emptied before narrowing to one value
    /// Gantree: EliminationExhausted{{rounds}} // 후보 소진
    #[error("Elimination exhausted after {rounds} rounds: no candidate survived")]
    EliminationExhausted { rounds: usize },

    /// Tolerance floor or round cap reached with several survivors
    #[error("Elimination ambiguous after {rounds} rounds: {remaining} candidates remain")]
    EliminationAmbiguous { rounds: usize, remaining: usize },

    /// Lone survivor failed the final check against the true value
    /// Gantree: SelfConsistencyRejected{{estimate,truth}} // 자기 일관성
    #[error("Estimate {estimate:.6} rejected: differs from {truth:.6} by more than {tolerance}")]
    SelfConsistencyRejected {
        estimate: f64,
        truth: f64,
        tolerance: f64,
    },

    // ========================================================================
    // Numerical Errors
    // ========================================================================
    /// ODE integration did not reach the endpoint
    #[error("Solver failed: {0}")]
    SolverFailed(String),

    // ========================================================================
    // Configuration / I/O Errors
    // ========================================================================
    /// Configuration rejected by validate()
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Result type alias for QEST operations
/// Gantree: QestResult<T> // type alias
pub type QestResult<T> = Result<T, QestError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QestError {
    fn from(err: serde_json::Error) -> Self {
        QestError::JsonError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QestError {
    /// Search finished without a unique accepted value
    pub fn is_no_unique_solution(&self) -> bool {
        matches!(
            self,
            QestError::EliminationExhausted { .. }
                | QestError::EliminationAmbiguous { .. }
                | QestError::SelfConsistencyRejected { .. }
        )
    }

    /// Re-invoking with fresh randomness may succeed
    pub fn is_recoverable(&self) -> bool {
        self.is_no_unique_solution() || matches!(self, QestError::InvalidMeasurement { .. })
    }

    /// Check if error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            QestError::InvalidProbability(_)
                | QestError::InvalidParameter { .. }
                | QestError::InvalidCoordinates { .. }
                | QestError::InvalidDuration(_)
                | QestError::InvalidSampleCount(_)
                | QestError::InvalidControl { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QestError::InvalidProbability(1.5);
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_invalid_measurement_display() {
        let err = QestError::InvalidMeasurement {
            quantity: "log argument".into(),
            value: -0.25,
        };
        let msg = err.to_string();
        assert!(msg.contains("log argument"));
        assert!(msg.contains("-0.25"));
    }

    #[test]
    fn test_no_unique_solution_category() {
        assert!(QestError::EliminationExhausted { rounds: 3 }.is_no_unique_solution());
        assert!(QestError::EliminationAmbiguous {
            rounds: 64,
            remaining: 2
        }
        .is_no_unique_solution());
        assert!(QestError::SelfConsistencyRejected {
            estimate: 1.0,
            truth: 1.5,
            tolerance: 0.012
        }
        .is_no_unique_solution());
        assert!(!QestError::InvalidSampleCount(0).is_no_unique_solution());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(QestError::EliminationExhausted { rounds: 1 }.is_recoverable());
        assert!(QestError::InvalidMeasurement {
            quantity: "p".into(),
            value: 0.0
        }
        .is_recoverable());
        assert!(!QestError::InvalidDuration(-1.0).is_recoverable());
    }

    #[test]
    fn test_is_validation_error() {
        assert!(QestError::InvalidDuration(-1.0).is_validation_error());
        assert!(!QestError::SolverFailed("test".into()).is_validation_error());
    }

    #[test]
    fn test_json_conversion() {
        let err: QestError = serde_json::from_str::<f64>("not json").unwrap_err().into();
        assert!(matches!(err, QestError::JsonError(_)));
    }
}
