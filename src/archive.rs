//! Boundary between pose archives and the compressor.
//!
//! Archives store one track per bone as `(time, text)` pairs, where the text
//! is either a canonical vector (`"3,1:x;y;z;"`) or the literal `"null"` for a
//! frame in which the bone was not tracked. This module decodes such tracks
//! into [`Sample`]s, compresses them, and hands back serializable
//! [`CompressedBone`]s. Reading and writing the archive files themselves is
//! left to the caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SegmenterConfig;
use crate::error::{PoseError, Result};
use crate::math::ColumnVector;
use crate::segment::{segment, Run, RunTrack, Sample};
use crate::skeleton::Bone;

/// Raw text stored for an untracked frame.
pub const UNDEFINED_MARKER: &str = "null";

/// Decode one raw archive sample.
///
/// `"null"` and empty text decode to `None`.
///
/// # Errors
///
/// Returns [`PoseError::Format`] if the text is neither the marker nor a
/// canonical column vector.
pub fn decode_sample(raw: &str) -> Result<Option<ColumnVector>> {
    let raw = raw.trim();
    if raw == UNDEFINED_MARKER {
        return Ok(None);
    }
    ColumnVector::parse(raw)
}

/// Text written for a run: the canonical representative, or `None` for an
/// undefined run.
#[must_use]
pub fn encode_representative(run: &Run) -> Option<String> {
    run.representative.as_ref().map(ToString::to_string)
}

/// Decoded samples of one bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneRecording {
    pub bone: Bone,
    pub samples: Vec<Sample>,
}

impl BoneRecording {
    /// Decode `(time, raw text)` pairs read from an archive.
    ///
    /// # Errors
    ///
    /// Returns the first decoding error; timestamps are checked later by the
    /// segmenter.
    pub fn from_raw<I, S>(bone: Bone, raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, S)>,
        S: AsRef<str>,
    {
        let samples = raw
            .into_iter()
            .map(|(time, text)| {
                let text = text.as_ref();
                decode_sample(text)
                    .map(|vector| Sample { time, vector })
                    .inspect_err(|e| warn!(%bone, time, text, error = %e, "unreadable sample"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bone, samples })
    }

    /// Timestamp of the last sample.
    #[must_use]
    pub fn duration(&self) -> Option<u64> {
        self.samples.last().map(|s| s.time)
    }
}

/// Runs of one bone, ready to be written to a compressed archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedBone {
    pub bone: Bone,
    pub runs: RunTrack,
}

impl CompressedBone {
    /// Rebuild from runs read back from a compressed archive.
    ///
    /// # Errors
    ///
    /// Fails if the runs overlap or are out of order.
    pub fn from_runs(bone: Bone, runs: Vec<Run>) -> Result<Self> {
        Ok(Self {
            bone,
            runs: RunTrack::new(runs)?,
        })
    }

    /// `(begin, end, text)` triples in archive order.
    #[must_use]
    pub fn encode(&self) -> Vec<(u64, u64, Option<String>)> {
        self.runs
            .runs()
            .iter()
            .map(|run| (run.begin, run.end, encode_representative(run)))
            .collect()
    }
}

/// Compress a single bone.
///
/// # Errors
///
/// Propagates segmentation errors.
pub fn compress_bone(recording: &BoneRecording, config: &SegmenterConfig) -> Result<CompressedBone> {
    let runs = segment(&recording.samples, config)?;
    debug!(
        bone = %recording.bone,
        samples = recording.samples.len(),
        runs = runs.len(),
        "compressed bone"
    );
    Ok(CompressedBone {
        bone: recording.bone,
        runs: RunTrack::new(runs)?,
    })
}

/// Compress every bone of a recording. Bones are independent.
///
/// # Errors
///
/// Returns [`PoseError::InvalidArgument`] for an empty recording and the first
/// per-bone failure otherwise.
pub fn compress_recording(
    recording: &[BoneRecording],
    config: &SegmenterConfig,
) -> Result<Vec<CompressedBone>> {
    if recording.iter().all(|bone| bone.samples.is_empty()) {
        return Err(PoseError::invalid_argument("recording has no samples"));
    }
    let compressed = recording
        .iter()
        .map(|bone| compress_bone(bone, config))
        .collect::<Result<Vec<_>>>()?;

    let samples: usize = recording.iter().map(|b| b.samples.len()).sum();
    let runs: usize = compressed.iter().map(|b| b.runs.len()).sum();
    info!(bones = compressed.len(), samples, runs, "compressed recording");
    Ok(compressed)
}
