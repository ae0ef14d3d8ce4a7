//! Pose Compressor Library
//!
//! Run-length compression of skeleton recordings built on a small dense
//! linear algebra engine.
//!
//! A recording holds one orientation track per bone. Consecutive samples that
//! stay within an angle threshold of a run's first sample collapse into a
//! single run with a quantized integer representative, which shrinks
//! millisecond-rate sensor archives to a handful of runs per pose.
//!
//! # Features
//!
//! - **Matrices and vectors**: 1-based dense matrices with determinant,
//!   inverse and rank, and column vectors with norms and angles
//! - **Canonical text**: `"rows,columns:a,b;c,d;"`, used for archives and serde
//! - **Streaming segmentation**: runs are emitted as soon as they close
//! - **Comparison**: classify a live recording against a compressed standard
//!
//! # Quick Start
//!
//! ```
//! use pose_compressor::{compress_bone, BoneRecording, SegmenterConfig, BONES};
//!
//! let raw = vec![
//!     (0, "3,1:0;100;0;"),
//!     (1, "3,1:1;99;0;"),
//!     (2, "null"),
//!     (3, "3,1:100;0;0;"),
//! ];
//! let recording = BoneRecording::from_raw(BONES[0], raw)?;
//!
//! let compressed = compress_bone(&recording, &SegmenterConfig::default())?;
//! assert_eq!(compressed.runs.len(), 3);
//! assert_eq!(
//!     compressed.runs.representative_at(1).map(ToString::to_string),
//!     Some("3,1:1;100;0;".to_string())
//! );
//! # Ok::<(), pose_compressor::PoseError>(())
//! ```
//!
//! # Presets
//!
//! ```
//! use pose_compressor::SegmenterConfig;
//!
//! let kinect = SegmenterConfig::kinect();
//! let fine = SegmenterConfig::fine();
//! assert!(fine.angle_threshold < kinect.angle_threshold);
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod archive;
pub mod compare;
pub mod config;
pub mod error;
pub mod math;
pub mod segment;
pub mod skeleton;

// Re-exports for convenient access
pub use archive::{
    compress_bone, compress_recording, decode_sample, encode_representative, BoneRecording,
    CompressedBone, UNDEFINED_MARKER,
};
pub use compare::{
    classify, compare_bone, compare_recording, BoneComparison, ComparisonSummary,
    SampleComparison, Verdict,
};
pub use config::{ComparisonConfig, SegmenterConfig};
pub use error::{PoseError, Result};
pub use math::{ColumnVector, Matrix, Tolerance};
pub use segment::{segment, Run, RunTrack, Sample, StreamingSegmenter};
pub use skeleton::{Bone, Joint, BONES, BONE_COUNT};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
