//! Dense real matrix with 1-based public indexing.
//!
//! Storage is a row-major `Vec<f64>` addressed with 0-based indices inside this
//! module; every public accessor takes 1-based `(row, column)` pairs.
//!
//! Determinant, inverse and rank use the classical algorithms (Laplace
//! expansion along the first row, the adjugate, and a decreasing-size minor
//! search). They are exponential in the matrix size and intended for the
//! small matrices this crate works with.
//!
//! # Equality
//!
//! Two matrices are equal when they have the same shape and every pair of
//! elements agrees to 15 significant digits. [`Hash`] is derived from the same
//! fixed-precision representation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PoseError, Result};
use crate::math::text::{equality_key, parse_canonical, write_canonical};
use crate::math::tolerance::{is_finite, Tolerance};
use crate::math::vector::ColumnVector;

/// Dense `rows x columns` matrix of finite reals.
///
/// # Example
///
/// ```
/// use pose_compressor::math::{Matrix, Tolerance};
///
/// let m = Matrix::from_rows(&[[4.0, 7.0], [2.0, 6.0]])?;
/// assert_eq!(m.determinant()?, 10.0);
///
/// let inv = m.inverse(Tolerance::default())?;
/// assert_eq!(inv.get(1, 1)?, 0.6);
/// # Ok::<(), pose_compressor::PoseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a zero matrix.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::InvalidArgument`] if either dimension is zero or
    /// the element count overflows `usize`.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(PoseError::invalid_argument(format!(
                "matrix dimensions must be positive, got {rows}x{columns}"
            )));
        }
        let len = rows.checked_mul(columns).ok_or_else(|| {
            PoseError::invalid_argument(format!("matrix {rows}x{columns} is too large"))
        })?;
        Ok(Self {
            rows,
            columns,
            data: vec![0.0; len],
        })
    }

    /// Create the `n x n` identity matrix.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::InvalidArgument`] if `n` is zero.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::new(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        Ok(m)
    }

    /// Build a matrix from a list of equally long rows.
    ///
    /// # Errors
    ///
    /// Fails if the list or any row is empty, rows differ in length, or an
    /// element is not finite.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        let mut m = Self::new(rows.len(), columns)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != columns {
                return Err(PoseError::shape_mismatch((1, columns), (1, row.len())));
            }
            m.data[i * columns..(i + 1) * columns].copy_from_slice(row);
        }
        m.ensure_finite("from_rows")?;
        Ok(m)
    }

    /// Square matrix with `values` on the diagonal and zero elsewhere.
    ///
    /// # Errors
    ///
    /// Fails on an empty value list or a non-finite value.
    pub fn create_diagonal(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(PoseError::invalid_argument("diagonal value list is empty"));
        }
        let n = values.len();
        let mut m = Self::new(n, n)?;
        for (i, &v) in values.iter().enumerate() {
            m.data[i * n + i] = v;
        }
        m.ensure_finite("create_diagonal")?;
        Ok(m)
    }

    /// Wrap already-validated row-major storage.
    pub(crate) fn from_raw(rows: usize, columns: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * columns);
        Self {
            rows,
            columns,
            data,
        }
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Elements in row-major order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    fn at(&self, row: usize, column: usize) -> f64 {
        self.data[row * self.columns + column]
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row == 0 || row > self.rows {
            return Err(PoseError::out_of_range("row index", row));
        }
        Ok(())
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column == 0 || column > self.columns {
            return Err(PoseError::out_of_range("column index", column));
        }
        Ok(())
    }

    fn ensure_finite(&self, context: &str) -> Result<()> {
        if self.data.iter().all(|&v| is_finite(v)) {
            Ok(())
        } else {
            Err(PoseError::non_finite(context.to_string()))
        }
    }

    /// Element at 1-based `(row, column)`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::OutOfRange`] for an index outside the matrix.
    pub fn get(&self, row: usize, column: usize) -> Result<f64> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(self.at(row - 1, column - 1))
    }

    /// Overwrite the element at 1-based `(row, column)`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::OutOfRange`] for an index outside the matrix and
    /// [`PoseError::NonFinite`] if `value` is NaN or infinite. The matrix is
    /// left untouched on failure.
    pub fn set(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        self.check_row(row)?;
        self.check_column(column)?;
        if !is_finite(value) {
            return Err(PoseError::non_finite(format!("set({row}, {column})")));
        }
        self.data[(row - 1) * self.columns + column - 1] = value;
        Ok(())
    }

    /// Copy of the 1-based `column` as a vector.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::OutOfRange`] for a column outside the matrix.
    pub fn column(&self, column: usize) -> Result<ColumnVector> {
        self.check_column(column)?;
        let data = (0..self.rows).map(|i| self.at(i, column - 1)).collect();
        Ok(ColumnVector::from_matrix_unchecked(Self::from_raw(
            self.rows, 1, data,
        )))
    }

    /// Overwrite the 1-based `column` with `vector`.
    ///
    /// # Errors
    ///
    /// Fails if `column` is out of range or `vector` does not have one element
    /// per row.
    pub fn set_column(&mut self, column: usize, vector: &ColumnVector) -> Result<()> {
        self.check_column(column)?;
        if vector.rows() != self.rows {
            return Err(PoseError::shape_mismatch((self.rows, 1), vector.shape()));
        }
        for (i, &v) in vector.as_slice().iter().enumerate() {
            self.data[i * self.columns + column - 1] = v;
        }
        Ok(())
    }

    /// True for `n x n` matrices.
    #[inline]
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// True when both matrices have the same number of rows and columns.
    #[inline]
    #[must_use]
    pub const fn is_homomorphic(&self, other: &Self) -> bool {
        self.rows == other.rows && self.columns == other.columns
    }

    /// True when every element is zero within `tol`.
    #[must_use]
    pub fn is_zero_matrix(&self, tol: Tolerance) -> bool {
        self.data.iter().all(|&v| tol.is_zero(v))
    }

    fn zip_with(&self, other: &Self, op: impl Fn(f64, f64) -> f64, context: &str) -> Result<Self> {
        if !self.is_homomorphic(other) {
            return Err(PoseError::shape_mismatch(self.shape(), other.shape()));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| op(a, b))
            .collect();
        let result = Self::from_raw(self.rows, self.columns, data);
        result.ensure_finite(context)?;
        Ok(result)
    }

    fn map(&self, op: impl Fn(f64) -> f64, context: &str) -> Result<Self> {
        let result = Self::from_raw(
            self.rows,
            self.columns,
            self.data.iter().map(|&v| op(v)).collect(),
        );
        result.ensure_finite(context)?;
        Ok(result)
    }

    /// Element-wise sum.
    ///
    /// # Errors
    ///
    /// Fails with [`PoseError::ShapeMismatch`] unless the operands are
    /// homomorphic, or [`PoseError::NonFinite`] if the sum overflows.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a + b, "matrix addition")
    }

    /// Element-wise difference.
    ///
    /// # Errors
    ///
    /// Same as [`Matrix::checked_add`].
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a - b, "matrix subtraction")
    }

    /// Multiply every element by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::NonFinite`] if `factor` or any product is not finite.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        if !is_finite(factor) {
            return Err(PoseError::non_finite("scalar factor"));
        }
        self.map(|v| v * factor, "scalar multiplication")
    }

    /// Divide every element by `divisor`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::DivisionByZero`] if `divisor` is zero within `tol`
    /// and [`PoseError::NonFinite`] if it or any quotient is not finite.
    pub fn divided(&self, divisor: f64, tol: Tolerance) -> Result<Self> {
        if tol.is_zero(divisor) {
            return Err(PoseError::DivisionByZero);
        }
        if !is_finite(divisor) {
            return Err(PoseError::non_finite("scalar divisor"));
        }
        self.map(|v| v / divisor, "scalar division")
    }

    /// Matrix product `self * other`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeMismatch`] unless `self.columns() == other.rows()`.
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        if self.columns != other.rows {
            return Err(PoseError::shape_mismatch(
                (self.columns, other.columns),
                other.shape(),
            ));
        }
        let mut data = vec![0.0; self.rows * other.columns];
        for i in 0..self.rows {
            for j in 0..other.columns {
                let mut sum = 0.0;
                for k in 0..self.columns {
                    sum += self.at(i, k) * other.at(k, j);
                }
                data[i * other.columns + j] = sum;
            }
        }
        let result = Self::from_raw(self.rows, other.columns, data);
        result.ensure_finite("matrix multiplication")?;
        Ok(result)
    }

    /// Transposed copy.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.columns {
            for i in 0..self.rows {
                data.push(self.at(i, j));
            }
        }
        Self::from_raw(self.columns, self.rows, data)
    }

    /// Matrix with 0-based `row` and `column` removed. Requires at least 2x2.
    fn minor(&self, row: usize, column: usize) -> Self {
        let mut data = Vec::with_capacity((self.rows - 1) * (self.columns - 1));
        for i in (0..self.rows).filter(|&i| i != row) {
            for j in (0..self.columns).filter(|&j| j != column) {
                data.push(self.at(i, j));
            }
        }
        Self::from_raw(self.rows - 1, self.columns - 1, data)
    }

    /// Matrix with the 1-based `row` and `column` removed.
    ///
    /// # Errors
    ///
    /// Fails if either index is out of range or the matrix has a single row or
    /// column.
    pub fn cofactor(&self, row: usize, column: usize) -> Result<Self> {
        self.check_row(row)?;
        self.check_column(column)?;
        if self.rows < 2 || self.columns < 2 {
            return Err(PoseError::invalid_argument(format!(
                "cofactor of a {}x{} matrix is empty",
                self.rows, self.columns
            )));
        }
        Ok(self.minor(row - 1, column - 1))
    }

    /// `size x size` block with its top-left corner at 0-based `(top, left)`.
    fn block(&self, top: usize, left: usize, size: usize) -> Self {
        let mut data = Vec::with_capacity(size * size);
        for i in top..top + size {
            data.extend_from_slice(&self.data[i * self.columns + left..i * self.columns + left + size]);
        }
        Self::from_raw(size, size, data)
    }

    /// Closed block spanning 1-based rows `top..=bottom` and columns
    /// `left..=right`.
    ///
    /// # Errors
    ///
    /// Fails with [`PoseError::OutOfRange`] for a bound outside the matrix and
    /// [`PoseError::InvalidArgument`] unless `top < bottom` and `left < right`.
    pub fn submatrix(&self, top: usize, bottom: usize, left: usize, right: usize) -> Result<Self> {
        self.check_row(top)?;
        self.check_row(bottom)?;
        self.check_column(left)?;
        self.check_column(right)?;
        if top >= bottom || left >= right {
            return Err(PoseError::invalid_argument(format!(
                "submatrix bounds must satisfy top < bottom and left < right, got \
                 rows {top}..={bottom}, columns {left}..={right}"
            )));
        }
        let mut data = Vec::with_capacity((bottom - top + 1) * (right - left + 1));
        for i in top - 1..bottom {
            data.extend_from_slice(&self.data[i * self.columns + left - 1..i * self.columns + right]);
        }
        Ok(Self::from_raw(bottom - top + 1, right - left + 1, data))
    }

    /// Laplace expansion along the first row. Requires a square matrix.
    fn laplace(&self) -> f64 {
        if self.rows == 1 {
            return self.data[0];
        }
        (0..self.columns)
            .map(|j| {
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                sign * self.minor(0, j).laplace() * self.at(0, j)
            })
            .sum()
    }

    /// Determinant by cofactor expansion along the first row.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeMismatch`] for a non-square matrix.
    pub fn determinant(&self) -> Result<f64> {
        if !self.is_square() {
            return Err(PoseError::shape_mismatch((self.rows, self.rows), self.shape()));
        }
        Ok(self.laplace())
    }

    /// Inverse by the adjugate method.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeMismatch`] for a non-square matrix and
    /// [`PoseError::Arithmetic`] when the determinant is zero within `tol`.
    pub fn inverse(&self, tol: Tolerance) -> Result<Self> {
        let det = self.determinant()?;
        if tol.is_zero(det) {
            return Err(PoseError::arithmetic("matrix is singular"));
        }
        let n = self.rows;
        let adjugate = if n == 1 {
            Self::from_raw(1, 1, vec![1.0])
        } else {
            let mut data = vec![0.0; n * n];
            for i in 0..n {
                for j in 0..n {
                    let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                    // Transposed store: the adjugate is the cofactor matrix transposed.
                    data[j * n + i] = sign * self.minor(i, j).laplace();
                }
            }
            Self::from_raw(n, n, data)
        };
        adjugate.divided(det, tol)
    }

    /// Rank by searching contiguous square blocks from the largest size down.
    #[must_use]
    pub fn rank(&self, tol: Tolerance) -> usize {
        let max = self.rows.min(self.columns);
        for size in (1..=max).rev() {
            for top in 0..=self.rows - size {
                for left in 0..=self.columns - size {
                    if !tol.is_zero(self.block(top, left, size).laplace()) {
                        return size;
                    }
                }
            }
        }
        0
    }

    /// Sum of the diagonal.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeMismatch`] for a non-square matrix.
    pub fn trace(&self) -> Result<f64> {
        if !self.is_square() {
            return Err(PoseError::shape_mismatch((self.rows, self.rows), self.shape()));
        }
        Ok((0..self.rows).map(|i| self.at(i, i)).sum())
    }

    /// Parse canonical text; empty input yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::Format`] for malformed text.
    pub fn parse(text: &str) -> Result<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        text.parse().map(Some)
    }

    /// Human-readable rows with elements rounded to `precision` decimals.
    #[must_use]
    pub fn to_pretty_string(&self, precision: usize) -> String {
        self.data
            .chunks(self.columns)
            .map(|row| {
                row.iter()
                    .map(|v| format!("{v:.precision$}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn equality_repr(&self) -> String {
        let mut key = String::with_capacity(self.data.len() * 24);
        for &v in &self.data {
            equality_key(v, &mut key);
            key.push(',');
        }
        key
    }
}

impl Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        Matrix::from_raw(
            self.rows,
            self.columns,
            self.data.iter().map(|v| -v).collect(),
        )
    }
}

impl Neg for Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        -&self
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.is_homomorphic(other) && self.equality_repr() == other.equality_repr()
    }
}

impl Eq for Matrix {}

impl Hash for Matrix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rows.hash(state);
        self.columns.hash(state);
        self.equality_repr().hash(state);
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_canonical(f, self.rows, self.columns, &self.data)
    }
}

impl FromStr for Matrix {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self> {
        let (rows, columns, data) = parse_canonical(s)?;
        Ok(Self::from_raw(rows, columns, data))
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::hash_map::DefaultHasher;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    fn hash_of(m: &Matrix) -> u64 {
        let mut hasher = DefaultHasher::new();
        m.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_new_is_zeroed() {
        let m = Matrix::new(2, 3).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert!(m.as_slice().iter().all(|&v| v == 0.0));
        assert!(m.is_zero_matrix(tol()));
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(Matrix::new(0, 3), Err(PoseError::InvalidArgument(_))));
        assert!(matches!(Matrix::new(3, 0), Err(PoseError::InvalidArgument(_))));
        assert!(matches!(Matrix::new(usize::MAX, 2), Err(PoseError::InvalidArgument(_))));
    }

    #[test]
    fn test_one_based_access() {
        let mut m = Matrix::new(2, 2).unwrap();
        m.set(1, 2, 5.0).unwrap();
        assert_eq!(m.get(1, 2).unwrap(), 5.0);
        assert_eq!(m.as_slice(), &[0.0, 5.0, 0.0, 0.0]);

        assert!(matches!(m.get(0, 1), Err(PoseError::OutOfRange { .. })));
        assert!(matches!(m.get(3, 1), Err(PoseError::OutOfRange { .. })));
        assert!(matches!(m.set(1, 3, 1.0), Err(PoseError::OutOfRange { .. })));
    }

    #[test]
    fn test_set_rejects_non_finite_without_mutation() {
        let mut m = Matrix::identity(2).unwrap();
        assert!(matches!(m.set(1, 1, f64::NAN), Err(PoseError::NonFinite { .. })));
        assert!(matches!(
            m.set(1, 1, f64::INFINITY),
            Err(PoseError::NonFinite { .. })
        ));
        assert_eq!(m.get(1, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_column_access() {
        let mut m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        let c = m.column(2).unwrap();
        assert_eq!(c.as_slice(), &[2.0, 4.0, 6.0]);

        let v = ColumnVector::create(&[7.0, 8.0, 9.0]).unwrap();
        m.set_column(1, &v).unwrap();
        assert_eq!(m.as_slice(), &[7.0, 2.0, 8.0, 4.0, 9.0, 6.0]);

        let short = ColumnVector::create(&[1.0, 2.0]).unwrap();
        assert!(matches!(
            m.set_column(1, &short),
            Err(PoseError::ShapeMismatch { .. })
        ));
        assert!(matches!(m.column(3), Err(PoseError::OutOfRange { .. })));
    }

    #[test]
    fn test_from_rows_validation() {
        let empty: [[f64; 2]; 0] = [];
        assert!(Matrix::from_rows(&empty).is_err());
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(matches!(
            Matrix::from_rows(&[[f64::NAN]]),
            Err(PoseError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_shape_queries() {
        let a = Matrix::new(2, 3).unwrap();
        let b = Matrix::new(2, 3).unwrap();
        let c = Matrix::new(3, 2).unwrap();
        assert!(!a.is_square());
        assert!(Matrix::new(3, 3).unwrap().is_square());
        assert!(a.is_homomorphic(&b));
        assert!(!a.is_homomorphic(&c));
    }

    #[test]
    fn test_addition_and_subtraction() {
        let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[[0.5, -2.0], [1.0, 1.0]]).unwrap();
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.as_slice(), &[1.5, 0.0, 4.0, 5.0]);
        assert_eq!(sum.checked_sub(&b).unwrap(), a);

        let c = Matrix::new(3, 2).unwrap();
        assert!(matches!(a.checked_add(&c), Err(PoseError::ShapeMismatch { .. })));
        assert!(matches!(a.checked_sub(&c), Err(PoseError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_overflow_is_rejected() {
        let a = Matrix::from_rows(&[[f64::MAX]]).unwrap();
        assert!(matches!(a.checked_add(&a), Err(PoseError::NonFinite { .. })));
        assert!(matches!(a.scaled(2.0), Err(PoseError::NonFinite { .. })));
    }

    #[test]
    fn test_scalar_operations() {
        let a = Matrix::from_rows(&[[2.0, -4.0]]).unwrap();
        assert_eq!(a.scaled(0.5).unwrap().as_slice(), &[1.0, -2.0]);
        assert_eq!(a.divided(2.0, tol()).unwrap().as_slice(), &[1.0, -2.0]);
        assert_eq!((-&a).as_slice(), &[-2.0, 4.0]);

        assert_eq!(a.divided(1e-13, tol()), Err(PoseError::DivisionByZero));
        assert!(matches!(a.scaled(f64::NAN), Err(PoseError::NonFinite { .. })));
        assert!(matches!(
            a.divided(f64::INFINITY, tol()),
            Err(PoseError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_multiplication() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let b = Matrix::from_rows(&[[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]).unwrap();
        let p = a.checked_mul(&b).unwrap();
        assert_eq!(p.shape(), (2, 2));
        assert_eq!(p.as_slice(), &[58.0, 64.0, 139.0, 154.0]);

        assert!(matches!(a.checked_mul(&a), Err(PoseError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_transpose() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(3, 1).unwrap(), 3.0);
        assert_eq!(t.get(1, 2).unwrap(), 4.0);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn test_cofactor() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]).unwrap();
        let c = a.cofactor(2, 2).unwrap();
        assert_eq!(c.as_slice(), &[1.0, 3.0, 7.0, 9.0]);
        assert!(a.cofactor(4, 1).is_err());
        assert!(Matrix::new(1, 1).unwrap().cofactor(1, 1).is_err());
    }

    #[test]
    fn test_submatrix() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]).unwrap();
        let s = a.submatrix(2, 3, 1, 2).unwrap();
        assert_eq!(s.as_slice(), &[4.0, 5.0, 7.0, 8.0]);

        assert!(matches!(a.submatrix(2, 2, 1, 2), Err(PoseError::InvalidArgument(_))));
        assert!(matches!(a.submatrix(1, 2, 3, 1), Err(PoseError::InvalidArgument(_))));
        assert!(matches!(a.submatrix(1, 4, 1, 2), Err(PoseError::OutOfRange { .. })));
    }

    #[test]
    fn test_determinant() {
        assert_eq!(Matrix::from_rows(&[[-3.5]]).unwrap().determinant().unwrap(), -3.5);
        assert_eq!(Matrix::identity(2).unwrap().determinant().unwrap(), 1.0);

        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]).unwrap();
        assert_eq!(a.determinant().unwrap(), 1.0);

        let zero_row = Matrix::from_rows(&[[1.0, 2.0, 3.0], [0.0, 0.0, 0.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(zero_row.determinant().unwrap(), 0.0);

        assert!(matches!(
            Matrix::new(2, 3).unwrap().determinant(),
            Err(PoseError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_inverse() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]).unwrap();
        let inv = a.inverse(tol()).unwrap();
        let expected =
            Matrix::from_rows(&[[-24.0, 18.0, 5.0], [20.0, -15.0, -4.0], [-5.0, 4.0, 1.0]]).unwrap();
        assert_eq!(inv, expected);

        let single = Matrix::from_rows(&[[4.0]]).unwrap().inverse(tol()).unwrap();
        assert_eq!(single.get(1, 1).unwrap(), 0.25);
    }

    #[test]
    fn test_inverse_failures() {
        let singular = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
        assert!(matches!(singular.inverse(tol()), Err(PoseError::Arithmetic(_))));
        assert!(matches!(
            Matrix::new(2, 3).unwrap().inverse(tol()),
            Err(PoseError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_inverse_product_is_identity() {
        let a = Matrix::from_rows(&[[4.0, 7.0, 2.0], [3.0, 6.0, 1.0], [2.0, 5.0, 3.0]]).unwrap();
        let p = a.checked_mul(&a.inverse(tol()).unwrap()).unwrap();
        for i in 1..=3 {
            for j in 1..=3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(p.get(i, j).unwrap(), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_rank() {
        assert_eq!(Matrix::new(3, 4).unwrap().rank(tol()), 0);
        assert_eq!(Matrix::identity(4).unwrap().rank(tol()), 4);
        let rank_one = Matrix::from_rows(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0]]).unwrap();
        assert_eq!(rank_one.rank(tol()), 1);
        let rank_two = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]).unwrap();
        assert_eq!(rank_two.rank(tol()), 2);
        let single = Matrix::from_rows(&[[0.0, 0.0], [0.0, 3.0]]).unwrap();
        assert_eq!(single.rank(tol()), 1);
    }

    #[test]
    fn test_trace() {
        let a = Matrix::from_rows(&[[1.0, 9.0], [9.0, 2.5]]).unwrap();
        assert_eq!(a.trace().unwrap(), 3.5);
        assert!(Matrix::new(1, 2).unwrap().trace().is_err());
    }

    #[test]
    fn test_create_diagonal() {
        let d = Matrix::create_diagonal(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(d.shape(), (3, 3));
        assert_eq!(d.determinant().unwrap(), 6.0);
        assert_eq!(d.trace().unwrap(), 6.0);
        assert!(matches!(
            Matrix::create_diagonal(&[]),
            Err(PoseError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_canonical_text() {
        let a = Matrix::from_rows(&[[1.0, 2.5], [-3.0, 0.125]]).unwrap();
        let text = a.to_string();
        assert_eq!(text, "2,2:1,2.5;-3,0.125;");
        assert_eq!(text.parse::<Matrix>().unwrap(), a);
        assert_eq!(Matrix::parse("").unwrap(), None);
        assert!(matches!(Matrix::parse("2,2:1,2;"), Err(PoseError::Format(_))));
    }

    #[test]
    fn test_equality_is_fixed_precision() {
        let a = Matrix::from_rows(&[[0.1, 0.2]]).unwrap();
        let b = Matrix::from_rows(&[[0.30000000000000004 - 0.2, 0.2]]).unwrap();
        assert_ne!(a.as_slice(), b.as_slice());
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let c = Matrix::from_rows(&[[0.1], [0.2]]).unwrap();
        assert_ne!(a, c);
        assert_ne!(a, Matrix::from_rows(&[[0.1, 0.21]]).unwrap());
    }

    #[test]
    fn test_clone_is_independent() {
        let a = Matrix::identity(2).unwrap();
        let mut b = a.clone();
        b.set(1, 1, 7.0).unwrap();
        assert_eq!(a.get(1, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_pretty_string() {
        let a = Matrix::from_rows(&[[1.0, 2.0 / 3.0], [0.0, -1.5]]).unwrap();
        assert_eq!(a.to_pretty_string(2), "1.00 0.67\n0.00 -1.50");
    }

    #[test]
    fn test_serde_uses_canonical_text() {
        let a = Matrix::from_rows(&[[1.0, 0.5]]).unwrap();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"1,2:1,0.5;\"");
        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
        assert!(serde_json::from_str::<Matrix>("\"1,2:1;\"").is_err());
    }
}
