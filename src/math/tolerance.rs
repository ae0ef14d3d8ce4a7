//! Scalar predicates shared by every zero and singularity decision.
//!
//! [`Tolerance`] replaces a process-wide epsilon: it is a small `Copy` value
//! passed explicitly to the operations that need it, so one computation always
//! sees one tolerance and tests can use their own without interfering.

use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};

/// Default tolerance below which a value is treated as zero.
pub const DEFAULT_EPSILON: f64 = 1e-12;

/// Smallest tolerance accepted by [`Tolerance::new`].
pub const MIN_EPSILON: f64 = f64::MIN_POSITIVE;

/// True unless `value` is NaN or infinite.
#[inline]
#[must_use]
pub fn is_finite(value: f64) -> bool {
    value.is_finite()
}

/// Epsilon-tolerant zero test.
///
/// # Example
///
/// ```
/// use pose_compressor::math::Tolerance;
///
/// let tol = Tolerance::default();
/// assert!(tol.is_zero(1e-13));
/// assert!(!tol.is_zero(1e-6));
/// assert!(!tol.is_zero(f64::NAN));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance {
    epsilon: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Tolerance {
    /// Create a tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::NonFinite`] for NaN or infinite input and
    /// [`PoseError::OutOfRange`] when `epsilon` is below [`MIN_EPSILON`].
    pub fn new(epsilon: f64) -> Result<Self> {
        if !is_finite(epsilon) {
            return Err(PoseError::non_finite("tolerance"));
        }
        if epsilon < MIN_EPSILON {
            return Err(PoseError::out_of_range("tolerance", epsilon));
        }
        Ok(Self { epsilon })
    }

    /// The configured epsilon.
    #[inline]
    #[must_use]
    pub const fn epsilon(self) -> f64 {
        self.epsilon
    }

    /// True iff `value` is finite and `-epsilon < value < epsilon`.
    ///
    /// Non-finite values are never zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self, value: f64) -> bool {
        is_finite(value) && value > -self.epsilon && value < self.epsilon
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = PoseError;

    fn try_from(epsilon: f64) -> Result<Self> {
        Self::new(epsilon)
    }
}

impl From<Tolerance> for f64 {
    fn from(tol: Tolerance) -> Self {
        tol.epsilon
    }
}
