//! Column vectors: one-column matrices with vector-specific operations.
//!
//! [`ColumnVector`] dereferences to [`Matrix`], so every read-only matrix
//! operation (shape queries, transpose, determinant of a 1x1, canonical text)
//! is available on a vector. Arithmetic is re-declared here so results stay
//! vectors.

use std::fmt;
use std::ops::{Deref, Neg};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PoseError, Result};
use crate::math::matrix::Matrix;
use crate::math::tolerance::Tolerance;

/// A `n x 1` matrix.
///
/// # Example
///
/// ```
/// use pose_compressor::math::{ColumnVector, Tolerance};
///
/// let x = ColumnVector::create(&[1.0, 0.0, 0.0])?;
/// let y = ColumnVector::create(&[0.0, 1.0, 0.0])?;
///
/// assert_eq!(x.cross_product(&y)?.as_slice(), &[0.0, 0.0, 1.0]);
/// assert_eq!(x.angle(&x, Tolerance::default())?, 0.0);
/// # Ok::<(), pose_compressor::PoseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnVector(Matrix);

impl ColumnVector {
    /// Zero vector with `len` elements.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::InvalidArgument`] if `len` is zero.
    pub fn zeros(len: usize) -> Result<Self> {
        Matrix::new(len, 1).map(Self)
    }

    /// Vector holding `values` in order.
    ///
    /// # Errors
    ///
    /// Fails on an empty list or a non-finite value.
    pub fn create(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(PoseError::invalid_argument("vector value list is empty"));
        }
        let mut v = Self::zeros(values.len())?;
        for (i, &value) in values.iter().enumerate() {
            v.set(i + 1, value)?;
        }
        Ok(v)
    }

    /// Wrap a matrix already known to have one column.
    pub(crate) fn from_matrix_unchecked(matrix: Matrix) -> Self {
        debug_assert_eq!(matrix.columns(), 1);
        Self(matrix)
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.rows()
    }

    /// Always false; vectors have at least one element.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Element at 1-based index `i`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::OutOfRange`] for an index outside the vector.
    pub fn get(&self, i: usize) -> Result<f64> {
        self.0.get(i, 1)
    }

    /// Overwrite the element at 1-based index `i`.
    ///
    /// # Errors
    ///
    /// Fails for an index outside the vector or a non-finite value.
    pub fn set(&mut self, i: usize, value: f64) -> Result<()> {
        self.0.set(i, 1, value)
    }

    /// Borrow as a matrix.
    #[inline]
    #[must_use]
    pub const fn as_matrix(&self) -> &Matrix {
        &self.0
    }

    /// Convert into the underlying matrix.
    #[inline]
    #[must_use]
    pub fn into_matrix(self) -> Matrix {
        self.0
    }

    /// Element-wise sum.
    ///
    /// # Errors
    ///
    /// See [`Matrix::checked_add`].
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.0.checked_add(&other.0).map(Self)
    }

    /// Element-wise difference.
    ///
    /// # Errors
    ///
    /// See [`Matrix::checked_sub`].
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.0.checked_sub(&other.0).map(Self)
    }

    /// Multiply every element by `factor`.
    ///
    /// # Errors
    ///
    /// See [`Matrix::scaled`].
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        self.0.scaled(factor).map(Self)
    }

    /// Divide every element by `divisor`.
    ///
    /// # Errors
    ///
    /// See [`Matrix::divided`].
    pub fn divided(&self, divisor: f64, tol: Tolerance) -> Result<Self> {
        self.0.divided(divisor, tol).map(Self)
    }

    /// Dot product.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeMismatch`] for vectors of different lengths.
    pub fn dot(&self, other: &Self) -> Result<f64> {
        if self.len() != other.len() {
            return Err(PoseError::shape_mismatch(self.shape(), other.shape()));
        }
        Ok(self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .map(|(a, b)| a * b)
            .sum())
    }

    /// 3-D cross product `self x other`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeMismatch`] unless both vectors have three
    /// elements.
    pub fn cross_product(&self, other: &Self) -> Result<Self> {
        let (a, b) = match (self.as_slice(), other.as_slice()) {
            (&[a1, a2, a3], &[b1, b2, b3]) => ([a1, a2, a3], [b1, b2, b3]),
            _ => {
                let actual = if self.len() == 3 { other.shape() } else { self.shape() };
                return Err(PoseError::shape_mismatch((3, 1), actual));
            }
        };
        Self::create(&[
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ])
    }

    /// Euclidean length.
    #[must_use]
    pub fn euclidean_norm(&self) -> f64 {
        self.as_slice().iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// p-norm.
    ///
    /// `p = +inf` gives the largest absolute element, `p = 0` counts the
    /// elements that are not zero within `tol`, any other positive `p` gives
    /// `(sum |x_i|^p)^(1/p)`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::OutOfRange`] for negative `p` and
    /// [`PoseError::NonFinite`] for NaN.
    pub fn norm(&self, p: f64, tol: Tolerance) -> Result<f64> {
        if p.is_nan() {
            return Err(PoseError::non_finite("norm exponent"));
        }
        if p == f64::INFINITY {
            return Ok(self.as_slice().iter().fold(0.0, |max, v| max.max(v.abs())));
        }
        if p < 0.0 {
            return Err(PoseError::out_of_range("norm exponent", p));
        }
        if p == 0.0 {
            return Ok(self.as_slice().iter().filter(|&&v| !tol.is_zero(v)).count() as f64);
        }
        if p == 2.0 {
            return Ok(self.euclidean_norm());
        }
        let sum: f64 = self.as_slice().iter().map(|v| v.abs().powf(p)).sum();
        Ok(sum.powf(p.recip()))
    }

    /// Unit vector in the same direction.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::DivisionByZero`] for a zero vector.
    pub fn normalize(&self, tol: Tolerance) -> Result<Self> {
        self.divided(self.euclidean_norm(), tol)
    }

    /// Angle between two vectors in radians.
    ///
    /// Equal vectors (under the matrix equality contract) give exactly `0`.
    /// Otherwise the result is `acos(dot / (|a| |b|))` without clamping, so
    /// rounding can yield NaN for nearly parallel vectors, as does a zero
    /// vector paired with a non-zero one.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeMismatch`] for different lengths and
    /// [`PoseError::Arithmetic`] when both vectors are zero.
    pub fn angle(&self, other: &Self, tol: Tolerance) -> Result<f64> {
        if !self.is_homomorphic(other) {
            return Err(PoseError::shape_mismatch(self.shape(), other.shape()));
        }
        if self.is_zero_matrix(tol) && other.is_zero_matrix(tol) {
            return Err(PoseError::arithmetic("angle between two zero vectors"));
        }
        if self == other {
            return Ok(0.0);
        }
        let cosine = self.dot(other)? / (self.euclidean_norm() * other.euclidean_norm());
        Ok(cosine.acos())
    }

    /// Parse canonical text; empty input yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::Format`] for malformed text or a column count
    /// other than one.
    pub fn parse(text: &str) -> Result<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        text.parse().map(Some)
    }
}

impl Deref for ColumnVector {
    type Target = Matrix;

    fn deref(&self) -> &Matrix {
        &self.0
    }
}

impl TryFrom<Matrix> for ColumnVector {
    type Error = PoseError;

    fn try_from(matrix: Matrix) -> Result<Self> {
        if matrix.columns() != 1 {
            return Err(PoseError::shape_mismatch((matrix.rows(), 1), matrix.shape()));
        }
        Ok(Self(matrix))
    }
}

impl From<ColumnVector> for Matrix {
    fn from(vector: ColumnVector) -> Self {
        vector.0
    }
}

impl Neg for &ColumnVector {
    type Output = ColumnVector;

    fn neg(self) -> ColumnVector {
        ColumnVector(-&self.0)
    }
}

impl Neg for ColumnVector {
    type Output = ColumnVector;

    fn neg(self) -> ColumnVector {
        ColumnVector(-self.0)
    }
}

impl fmt::Display for ColumnVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ColumnVector {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self> {
        let matrix: Matrix = s.parse()?;
        if matrix.columns() != 1 {
            return Err(PoseError::format(format!(
                "expected a single column, found {}",
                matrix.columns()
            )));
        }
        Ok(Self(matrix))
    }
}

impl Serialize for ColumnVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColumnVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
