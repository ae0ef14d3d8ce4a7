//! Run-merging compression of per-bone orientation samples.
//!
//! A bone track is a strictly increasing sequence of timestamped samples, each
//! either a 3-D orientation vector or undefined (the sensor lost the bone).
//! The segmenter replaces it with an ordered list of [`Run`]s:
//!
//! - A run starts at its first sample (the anchor) and absorbs every following
//!   sample that is *compatible* with the anchor: both undefined, or both
//!   defined with an angle of at most `angle_threshold` radians.
//! - The first incompatible sample closes the run and anchors the next one.
//!   A closed run ends one tick before that sample, so runs also cover the
//!   gaps between samples.
//! - Defined runs carry a quantized representative: the members are summed
//!   (each divided by `quantization_scale`), normalized, scaled back up and
//!   rounded to integers.
//! - If the first sample is later than time 0, a leading undefined run covers
//!   `[0, first - 1]`.
//!
//! [`StreamingSegmenter`] does this incrementally; [`segment`] runs it over a
//! whole track.

use serde::{Deserialize, Serialize};

use crate::config::SegmenterConfig;
use crate::error::{PoseError, Result};
use crate::math::ColumnVector;

/// One timestamped sample of a bone track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp in milliseconds.
    pub time: u64,
    /// Orientation vector, `None` when the bone was not tracked.
    pub vector: Option<ColumnVector>,
}

impl Sample {
    /// A tracked sample.
    #[must_use]
    pub const fn defined(time: u64, vector: ColumnVector) -> Self {
        Self {
            time,
            vector: Some(vector),
        }
    }

    /// An untracked sample.
    #[must_use]
    pub const fn undefined(time: u64) -> Self {
        Self { time, vector: None }
    }
}

/// A closed time interval assigned one representative (or none).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// First covered tick.
    pub begin: u64,
    /// Last covered tick (inclusive).
    pub end: u64,
    /// Quantized representative, `None` for an undefined run.
    pub representative: Option<ColumnVector>,
}

impl Run {
    /// True if `time` lies in `[begin, end]`.
    #[inline]
    #[must_use]
    pub const fn contains(&self, time: u64) -> bool {
        self.begin <= time && time <= self.end
    }

    /// True for runs without a representative.
    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        self.representative.is_none()
    }

    /// Number of ticks covered, saturating at `u64::MAX`.
    #[inline]
    #[must_use]
    pub const fn duration(&self) -> u64 {
        self.end.saturating_sub(self.begin).saturating_add(1)
    }
}

/// Run currently being extended.
#[derive(Debug)]
struct OpenRun {
    begin: u64,
    anchor: Option<ColumnVector>,
    /// Sum of `member / quantization_scale` over defined members.
    scaled_sum: Option<ColumnVector>,
}

/// Incremental segmenter.
///
/// Samples are pushed in time order; a run is returned as soon as a sample
/// closes it, and [`StreamingSegmenter::finish`] returns the run still open.
///
/// # Example
///
/// ```
/// use pose_compressor::math::ColumnVector;
/// use pose_compressor::{SegmenterConfig, StreamingSegmenter};
///
/// let x = ColumnVector::create(&[100.0, 0.0, 0.0])?;
/// let mut segmenter = StreamingSegmenter::new(SegmenterConfig::default())?;
///
/// assert!(segmenter.push(0, Some(&x))?.is_none());
/// assert!(segmenter.push(1, Some(&x))?.is_none());
/// let closed = segmenter.push(2, None)?.expect("undefined sample closes the run");
/// assert_eq!((closed.begin, closed.end), (0, 1));
///
/// let last = segmenter.finish()?.expect("open run");
/// assert!(last.is_undefined());
/// # Ok::<(), pose_compressor::PoseError>(())
/// ```
#[derive(Debug)]
pub struct StreamingSegmenter {
    config: SegmenterConfig,
    open: Option<OpenRun>,
    last_time: Option<u64>,
    pushed: usize,
}

impl StreamingSegmenter {
    /// Create a segmenter.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            open: None,
            last_time: None,
            pushed: 0,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Timestamp of the most recent sample.
    #[must_use]
    pub const fn last_time(&self) -> Option<u64> {
        self.last_time
    }

    /// Push the next sample.
    ///
    /// Returns the run closed by this sample, or the leading undefined run
    /// when the first sample is later than time 0.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::NonMonotonicTimestamps`] if `time` does not
    /// increase, and propagates vector errors (mismatched lengths, two zero
    /// vectors, a zero-length representative). The segmenter is unchanged on
    /// error.
    pub fn push(&mut self, time: u64, vector: Option<&ColumnVector>) -> Result<Option<Run>> {
        if self.last_time.is_some_and(|last| time <= last) {
            return Err(PoseError::non_monotonic(self.pushed));
        }

        let config = &self.config;
        let closed = match self.open.as_mut() {
            None => {
                self.open = Some(OpenRun::start(config, time, vector)?);
                (time > 0).then(|| Run {
                    begin: 0,
                    end: time - 1,
                    representative: None,
                })
            }
            Some(open) => {
                if open.absorb(config, vector)? {
                    None
                } else {
                    let next = OpenRun::start(config, time, vector)?;
                    let run = open.close(config, time - 1)?;
                    self.open = Some(next);
                    Some(run)
                }
            }
        };

        self.last_time = Some(time);
        self.pushed += 1;
        Ok(closed)
    }

    /// Close the open run at the last sample time.
    ///
    /// # Errors
    ///
    /// Propagates representative computation errors.
    pub fn finish(self) -> Result<Option<Run>> {
        match (&self.open, self.last_time) {
            (Some(open), Some(end)) => open.close(&self.config, end).map(Some),
            _ => Ok(None),
        }
    }
}

impl OpenRun {
    fn start(config: &SegmenterConfig, begin: u64, vector: Option<&ColumnVector>) -> Result<Self> {
        let scaled_sum = vector
            .map(|v| v.divided(config.quantization_scale, config.tolerance))
            .transpose()?;
        Ok(Self {
            begin,
            anchor: vector.cloned(),
            scaled_sum,
        })
    }

    /// Add `vector` if it is compatible with the anchor. Unchanged on error.
    fn absorb(&mut self, config: &SegmenterConfig, vector: Option<&ColumnVector>) -> Result<bool> {
        let (Some(anchor), Some(v)) = (&self.anchor, vector) else {
            return Ok(self.anchor.is_none() && vector.is_none());
        };
        let angle = anchor.angle(v, config.tolerance)?;
        // NaN only arises from rounding outside acos' domain or a zero-length
        // member and does not break the run.
        if angle > config.angle_threshold {
            return Ok(false);
        }
        let scaled = v.divided(config.quantization_scale, config.tolerance)?;
        let sum = match &self.scaled_sum {
            Some(sum) => sum.checked_add(&scaled)?,
            None => scaled,
        };
        self.scaled_sum = Some(sum);
        Ok(true)
    }

    fn close(&self, config: &SegmenterConfig, end: u64) -> Result<Run> {
        let representative = self
            .scaled_sum
            .as_ref()
            .map(|sum| quantize(sum, config))
            .transpose()?;
        Ok(Run {
            begin: self.begin,
            end,
            representative,
        })
    }
}

/// Normalize, rescale to `quantization_scale` and round half to even.
fn quantize(sum: &ColumnVector, config: &SegmenterConfig) -> Result<ColumnVector> {
    let scaled = sum
        .normalize(config.tolerance)?
        .scaled(config.quantization_scale)?;
    let rounded: Vec<f64> = scaled.as_slice().iter().map(|v| v.round_ties_even()).collect();
    ColumnVector::create(&rounded)
}

/// Compress a whole bone track into runs.
///
/// # Example
///
/// ```
/// use pose_compressor::math::ColumnVector;
/// use pose_compressor::{segment, Sample, SegmenterConfig};
///
/// let up = ColumnVector::create(&[0.0, 100.0, 0.0])?;
/// let samples = vec![
///     Sample::defined(3, up.clone()),
///     Sample::defined(4, up.clone()),
///     Sample::undefined(5),
/// ];
///
/// let runs = segment(&samples, &SegmenterConfig::default())?;
/// assert_eq!(runs.len(), 3);
/// assert!(runs[0].is_undefined() && runs[0].end == 2);
/// assert_eq!(runs[1].representative.as_ref(), Some(&up));
/// # Ok::<(), pose_compressor::PoseError>(())
/// ```
///
/// # Errors
///
/// See [`StreamingSegmenter::push`].
pub fn segment(samples: &[Sample], config: &SegmenterConfig) -> Result<Vec<Run>> {
    let mut segmenter = StreamingSegmenter::new(*config)?;
    let mut runs = Vec::new();
    for sample in samples {
        if let Some(run) = segmenter.push(sample.time, sample.vector.as_ref())? {
            runs.push(run);
        }
    }
    runs.extend(segmenter.finish()?);
    Ok(runs)
}

/// Ordered, disjoint runs of one bone with point lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Run>", into = "Vec<Run>")]
pub struct RunTrack {
    runs: Vec<Run>,
}

impl RunTrack {
    /// Wrap runs produced by [`segment`] or loaded from an archive.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::NonMonotonicTimestamps`] with the offending index
    /// if a run ends before it begins or overlaps its predecessor.
    pub fn new(runs: Vec<Run>) -> Result<Self> {
        for (i, run) in runs.iter().enumerate() {
            let overlaps = i > 0 && run.begin <= runs[i - 1].end;
            if run.end < run.begin || overlaps {
                return Err(PoseError::non_monotonic(i));
            }
        }
        Ok(Self { runs })
    }

    /// Run covering `time`, if any.
    #[must_use]
    pub fn lookup(&self, time: u64) -> Option<&Run> {
        let idx = self.runs.partition_point(|run| run.end < time);
        self.runs.get(idx).filter(|run| run.contains(time))
    }

    /// Representative active at `time`; `None` for undefined or uncovered time.
    #[must_use]
    pub fn representative_at(&self, time: u64) -> Option<&ColumnVector> {
        self.lookup(time).and_then(|run| run.representative.as_ref())
    }

    /// All runs in time order.
    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Number of runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// True if the track has no runs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Last covered tick.
    #[must_use]
    pub fn end_time(&self) -> Option<u64> {
        self.runs.last().map(|run| run.end)
    }
}

impl TryFrom<Vec<Run>> for RunTrack {
    type Error = PoseError;

    fn try_from(runs: Vec<Run>) -> Result<Self> {
        Self::new(runs)
    }
}

impl From<RunTrack> for Vec<Run> {
    fn from(track: RunTrack) -> Self {
        track.runs
    }
}
