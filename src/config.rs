//! Configuration for segmentation and comparison.
//!
//! This module provides [`SegmenterConfig`] and [`ComparisonConfig`], which
//! centralize the tunable parameters of run compression and of classifying
//! samples against compressed runs.
//!
//! # Example
//!
//! ```
//! use pose_compressor::{ComparisonConfig, SegmenterConfig};
//!
//! // Defaults match Kinect skeleton recordings
//! let config = SegmenterConfig::default();
//! assert_eq!(config.angle_threshold, 0.1);
//!
//! // Tighter runs for a higher-fidelity archive
//! let fine = SegmenterConfig::fine().with_quantization_scale(1000.0);
//! assert!(fine.validate().is_ok());
//!
//! let compare = ComparisonConfig::default();
//! assert_eq!(compare.similarity_threshold, 0.2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};
use crate::math::Tolerance;

/// Parameters of the run-merging compressor.
///
/// # Parameters
///
/// - `angle_threshold`: largest angle (radians) between a run's first sample
///   and any later member.
/// - `quantization_scale`: representatives are unit vectors scaled by this
///   factor and rounded to integers, so it fixes their precision.
/// - `tolerance`: zero threshold for normalization and angle computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Membership threshold in radians (inclusive).
    /// - 0.05: fine-grained runs, larger archives
    /// - 0.1: Kinect skeleton default
    /// - 0.2+: coarse poses only
    pub angle_threshold: f64,

    /// Length of a quantized representative before rounding.
    pub quantization_scale: f64,

    /// Zero tolerance for vector operations.
    pub tolerance: Tolerance,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            angle_threshold: 0.1,
            quantization_scale: 100.0,
            tolerance: Tolerance::default(),
        }
    }
}

impl SegmenterConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !self.angle_threshold.is_finite() || self.angle_threshold < 0.0 {
            return Err(PoseError::invalid_config(
                "angle_threshold must be a finite non-negative angle",
            ));
        }
        if !self.quantization_scale.is_finite() || self.quantization_scale <= 0.0 {
            return Err(PoseError::invalid_config(
                "quantization_scale must be finite and positive",
            ));
        }
        Ok(())
    }

    /// Preset for Kinect v2 skeleton recordings sampled every millisecond.
    #[must_use]
    pub fn kinect() -> Self {
        Self::default()
    }

    /// Preset with half the default angle threshold.
    #[must_use]
    pub fn fine() -> Self {
        Self {
            angle_threshold: 0.05,
            ..Self::default()
        }
    }

    /// Set the angle threshold.
    #[must_use]
    pub const fn with_angle_threshold(mut self, threshold: f64) -> Self {
        self.angle_threshold = threshold;
        self
    }

    /// Set the quantization scale.
    #[must_use]
    pub const fn with_quantization_scale(mut self, scale: f64) -> Self {
        self.quantization_scale = scale;
        self
    }

    /// Set the zero tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Parameters for comparing raw samples with compressed runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Samples whose angle to the run representative is strictly below this
    /// value (radians) count as similar.
    pub similarity_threshold: f64,

    /// Zero tolerance for angle computation.
    pub tolerance: Tolerance,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.2,
            tolerance: Tolerance::default(),
        }
    }
}

impl ComparisonConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite() || self.similarity_threshold < 0.0 {
            return Err(PoseError::invalid_config(
                "similarity_threshold must be a finite non-negative angle",
            ));
        }
        Ok(())
    }

    /// Set the similarity threshold.
    #[must_use]
    pub const fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}
