//! Dense linear algebra for orientation samples.
//!
//! This module provides:
//! - [`tolerance`]: epsilon-tolerant zero and finiteness predicates
//! - [`matrix`]: 1-based dense matrices with classical determinant/inverse/rank
//! - [`vector`]: column vectors with dot/cross products, norms and angles
//! - `text`: the canonical `"<rows>,<columns>:...;"` text format

pub mod matrix;
mod text;
pub mod tolerance;
pub mod vector;

pub use matrix::Matrix;
pub use tolerance::{is_finite, Tolerance, DEFAULT_EPSILON, MIN_EPSILON};
pub use vector::ColumnVector;
