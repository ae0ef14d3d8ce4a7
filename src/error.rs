//! Error types for matrix, segmentation and comparison operations.
//!
//! Every fallible operation in the crate returns [`PoseError`]. Each variant
//! is a distinguishable failure kind so callers can react to, say, a singular
//! matrix differently from a malformed archive sample.

use thiserror::Error;

/// Main error type for pose compression operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    /// A required argument was missing or structurally invalid
    /// (zero dimensions, empty value list).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An index, exponent or tolerance lies outside its permitted range.
    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: String },

    /// Operand dimensions are incompatible with the requested operation.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A NaN or infinite value appeared where a finite one is required.
    #[error("Non-finite value: {context}")]
    NonFinite { context: String },

    /// Division by a scalar that is zero within tolerance.
    #[error("Division by zero")]
    DivisionByZero,

    /// The operation is mathematically undefined for its operands.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Serialized text does not describe a valid matrix or vector.
    #[error("Format error: {0}")]
    Format(String),

    /// Sample timestamps are not strictly increasing.
    #[error("Timestamps must be strictly increasing at index {index}")]
    NonMonotonicTimestamps { index: usize },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for pose compression operations.
pub type Result<T> = std::result::Result<T, PoseError>;

impl PoseError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an out-of-range error.
    #[must_use]
    pub fn out_of_range(what: &'static str, value: impl ToString) -> Self {
        Self::OutOfRange {
            what,
            value: value.to_string(),
        }
    }

    /// Create a shape mismatch error from `(rows, columns)` pairs.
    #[must_use]
    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Self::ShapeMismatch {
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }

    /// Create a non-finite value error.
    #[must_use]
    pub fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFinite {
            context: context.into(),
        }
    }

    /// Create an arithmetic error.
    #[must_use]
    pub fn arithmetic(msg: impl Into<String>) -> Self {
        Self::Arithmetic(msg.into())
    }

    /// Create a format error.
    #[must_use]
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a non-monotonic timestamps error.
    #[must_use]
    pub const fn non_monotonic(index: usize) -> Self {
        Self::NonMonotonicTimestamps { index }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoseError::shape_mismatch((3, 1), (2, 2));
        assert!(err.to_string().contains("3x1"));
        assert!(err.to_string().contains("2x2"));

        let err = PoseError::out_of_range("row index", 7);
        assert_eq!(err.to_string(), "row index out of range: 7");
    }

    #[test]
    fn test_error_constructors() {
        let _ = PoseError::invalid_argument("empty value list");
        let _ = PoseError::non_finite("set(1, 1)");
        let _ = PoseError::arithmetic("singular matrix");
        let _ = PoseError::format("missing element");
        let _ = PoseError::invalid_config("threshold must be positive");
        assert_eq!(
            PoseError::non_monotonic(4),
            PoseError::NonMonotonicTimestamps { index: 4 }
        );
    }
}
