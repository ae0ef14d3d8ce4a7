//! Comparison of a live recording against a compressed reference.
//!
//! Every raw sample of the user's recording is classified against the
//! representative that the compressed standard holds at the same time. The
//! per-sample [`Verdict`]s are tallied into a [`ComparisonSummary`] per bone
//! and for the whole recording.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::archive::{BoneRecording, CompressedBone};
use crate::config::ComparisonConfig;
use crate::error::{PoseError, Result};
use crate::math::ColumnVector;
use crate::segment::{RunTrack, Sample};
use crate::skeleton::Bone;

/// Outcome of comparing one user sample with the standard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// Angle below the similarity threshold, or identical vectors.
    Similar { offset: f64 },
    /// Angle at or above the similarity threshold.
    Dissimilar { offset: f64 },
    /// Neither side tracked the bone.
    BothUndefined,
    /// The standard has no representative at this time.
    StandardUndefined,
    /// The user sample is untracked.
    UserUndefined,
}

impl Verdict {
    /// Similar poses, counting two untracked bones as a match.
    #[must_use]
    pub const fn is_similar(&self) -> bool {
        matches!(self, Self::Similar { .. } | Self::BothUndefined)
    }

    /// Similar poses with both sides tracked.
    #[must_use]
    pub const fn is_strictly_similar(&self) -> bool {
        matches!(self, Self::Similar { .. })
    }

    /// Angle between the two vectors, when both were tracked.
    #[must_use]
    pub const fn offset(&self) -> Option<f64> {
        match *self {
            Self::Similar { offset } | Self::Dissimilar { offset } => Some(offset),
            _ => None,
        }
    }
}

/// Classify a user vector against the standard.
///
/// # Errors
///
/// Propagates angle errors: mismatched lengths, or two zero vectors.
pub fn classify(
    standard: Option<&ColumnVector>,
    user: Option<&ColumnVector>,
    config: &ComparisonConfig,
) -> Result<Verdict> {
    match (standard, user) {
        (None, None) => Ok(Verdict::BothUndefined),
        (None, Some(_)) => Ok(Verdict::StandardUndefined),
        (Some(_), None) => Ok(Verdict::UserUndefined),
        (Some(s), Some(u)) => {
            let offset = s.angle(u, config.tolerance)?;
            if offset < config.similarity_threshold || s == u {
                Ok(Verdict::Similar { offset })
            } else {
                Ok(Verdict::Dissimilar { offset })
            }
        }
    }
}

/// Verdict counts.
///
/// The undefined counts overlap: a sample untracked on both sides counts
/// toward `undefined`, `standard_undefined` and `user_undefined`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Samples compared.
    pub total: usize,
    /// Similar samples, including those untracked on both sides.
    pub similar: usize,
    /// Similar samples tracked on both sides.
    pub strictly_similar: usize,
    /// Samples untracked on either side.
    pub undefined: usize,
    /// Samples where the standard has no representative.
    pub standard_undefined: usize,
    /// Samples where the user's bone was untracked.
    pub user_undefined: usize,
}

impl ComparisonSummary {
    /// Count one verdict.
    pub fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        if verdict.is_similar() {
            self.similar += 1;
        }
        if verdict.is_strictly_similar() {
            self.strictly_similar += 1;
        }
        let (standard, user) = match verdict {
            Verdict::BothUndefined => (true, true),
            Verdict::StandardUndefined => (true, false),
            Verdict::UserUndefined => (false, true),
            Verdict::Similar { .. } | Verdict::Dissimilar { .. } => (false, false),
        };
        if standard || user {
            self.undefined += 1;
        }
        if standard {
            self.standard_undefined += 1;
        }
        if user {
            self.user_undefined += 1;
        }
    }

    /// Add another summary's counts.
    pub fn merge(&mut self, other: &Self) {
        self.total += other.total;
        self.similar += other.similar;
        self.strictly_similar += other.strictly_similar;
        self.undefined += other.undefined;
        self.standard_undefined += other.standard_undefined;
        self.user_undefined += other.user_undefined;
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total as f64
        }
    }

    /// Share of similar samples, in percent.
    #[must_use]
    pub fn similar_percent(&self) -> f64 {
        self.percent(self.similar)
    }

    /// Share of strictly similar samples, in percent.
    #[must_use]
    pub fn strictly_similar_percent(&self) -> f64 {
        self.percent(self.strictly_similar)
    }

    /// Share of samples untracked on either side, in percent.
    #[must_use]
    pub fn undefined_percent(&self) -> f64 {
        self.percent(self.undefined)
    }

    /// Share of samples without a standard representative, in percent.
    #[must_use]
    pub fn standard_undefined_percent(&self) -> f64 {
        self.percent(self.standard_undefined)
    }

    /// Share of untracked user samples, in percent.
    #[must_use]
    pub fn user_undefined_percent(&self) -> f64 {
        self.percent(self.user_undefined)
    }
}

/// Verdict for one user sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleComparison {
    pub time: u64,
    pub verdict: Verdict,
}

/// All verdicts of one bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneComparison {
    pub bone: Bone,
    pub samples: Vec<SampleComparison>,
    pub summary: ComparisonSummary,
}

/// Classify each user sample against the standard run covering its time.
///
/// Times past the end of the standard are treated as undefined there.
///
/// # Errors
///
/// Returns [`PoseError::InvalidConfig`] for an invalid `config` and
/// propagates [`classify`] errors.
pub fn compare_bone(
    user: &[Sample],
    standard: &RunTrack,
    config: &ComparisonConfig,
) -> Result<(Vec<SampleComparison>, ComparisonSummary)> {
    config.validate()?;
    let mut summary = ComparisonSummary::default();
    let comparisons = user
        .iter()
        .map(|sample| {
            let verdict = classify(
                standard.representative_at(sample.time),
                sample.vector.as_ref(),
                config,
            )?;
            summary.record(&verdict);
            Ok(SampleComparison {
                time: sample.time,
                verdict,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((comparisons, summary))
}

/// Compare every bone of a user recording with a compressed standard.
///
/// Both sides must list the same bones in the same order.
///
/// # Errors
///
/// Returns [`PoseError::InvalidArgument`] if the bone lists differ and
/// propagates per-bone errors.
pub fn compare_recording(
    user: &[BoneRecording],
    standard: &[CompressedBone],
    config: &ComparisonConfig,
) -> Result<(Vec<BoneComparison>, ComparisonSummary)> {
    if user.len() != standard.len() {
        return Err(PoseError::invalid_argument(format!(
            "user has {} bones, standard has {}",
            user.len(),
            standard.len()
        )));
    }

    let mut total = ComparisonSummary::default();
    let mut bones = Vec::with_capacity(user.len());
    for (recording, reference) in user.iter().zip(standard) {
        if recording.bone != reference.bone {
            return Err(PoseError::invalid_argument(format!(
                "bone mismatch: user {} vs standard {}",
                recording.bone, reference.bone
            )));
        }
        let (samples, summary) = compare_bone(&recording.samples, &reference.runs, config)?;
        debug!(
            bone = %recording.bone,
            similar = summary.similar,
            total = summary.total,
            "compared bone"
        );
        total.merge(&summary);
        bones.push(BoneComparison {
            bone: recording.bone,
            samples,
            summary,
        });
    }

    info!(
        bones = bones.len(),
        samples = total.total,
        similar_percent = total.similar_percent(),
        "compared recording"
    );
    Ok((bones, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Run;
    use crate::skeleton::BONES;
    use approx::assert_relative_eq;

    fn v(values: &[f64]) -> ColumnVector {
        ColumnVector::create(values).unwrap()
    }

    #[test]
    fn test_classify() {
        let config = ComparisonConfig::default();
        let x = v(&[100.0, 0.0, 0.0]);
        let y = v(&[0.0, 100.0, 0.0]);

        assert_eq!(classify(None, None, &config).unwrap(), Verdict::BothUndefined);
        assert_eq!(classify(None, Some(&x), &config).unwrap(), Verdict::StandardUndefined);
        assert_eq!(classify(Some(&x), None, &config).unwrap(), Verdict::UserUndefined);
        assert_eq!(classify(Some(&x), Some(&x), &config).unwrap(), Verdict::Similar { offset: 0.0 });

        let verdict = classify(Some(&x), Some(&y), &config).unwrap();
        assert!(!verdict.is_similar());
        assert_relative_eq!(verdict.offset().unwrap(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);

        let zero = v(&[0.0, 0.0, 0.0]);
        assert!(classify(Some(&zero), Some(&zero), &config).is_err());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let a = v(&[100.0, 0.0, 0.0]);
        let b = v(&[100.0 * 0.3_f64.cos(), 100.0 * 0.3_f64.sin(), 0.0]);
        let theta = a.angle(&b, Default::default()).unwrap();

        let at = ComparisonConfig::default().with_similarity_threshold(theta);
        assert!(!classify(Some(&a), Some(&b), &at).unwrap().is_similar());

        let above = ComparisonConfig::default().with_similarity_threshold(theta + 1e-9);
        assert!(classify(Some(&a), Some(&b), &above).unwrap().is_strictly_similar());
    }

    #[test]
    fn test_summary_percentages() {
        let mut summary = ComparisonSummary::default();
        assert_eq!(summary.similar_percent(), 0.0);

        for verdict in [
            Verdict::Similar { offset: 0.1 },
            Verdict::Dissimilar { offset: 1.0 },
            Verdict::BothUndefined,
            Verdict::UserUndefined,
        ] {
            summary.record(&verdict);
        }
        assert_eq!(summary.total, 4);
        assert_relative_eq!(summary.similar_percent(), 50.0);
        assert_relative_eq!(summary.strictly_similar_percent(), 25.0);
        assert_relative_eq!(summary.undefined_percent(), 50.0);
        assert_relative_eq!(summary.user_undefined_percent(), 50.0);
        assert_relative_eq!(summary.standard_undefined_percent(), 25.0);

        let mut merged = summary;
        merged.merge(&summary);
        assert_eq!(merged.total, 8);
        assert_relative_eq!(merged.similar_percent(), 50.0);
    }

    #[test]
    fn test_undefined_counts_overlap() {
        let mut summary = ComparisonSummary::default();
        summary.record(&Verdict::BothUndefined);
        summary.record(&Verdict::StandardUndefined);
        assert_eq!(summary.undefined, 2);
        assert_eq!(summary.standard_undefined, 2);
        assert_eq!(summary.user_undefined, 1);
        assert_eq!(summary.similar, 1);
        assert_eq!(summary.strictly_similar, 0);
    }

    #[test]
    fn test_compare_bone() {
        let x = v(&[100.0, 0.0, 0.0]);
        let track = RunTrack::new(vec![
            Run { begin: 0, end: 4, representative: Some(x.clone()) },
            Run { begin: 5, end: 9, representative: None },
        ])
        .unwrap();
        let user = vec![
            Sample::defined(2, x.clone()),
            Sample::defined(6, x.clone()),
            Sample::undefined(7),
            Sample::defined(20, x),
        ];

        let (samples, summary) = compare_bone(&user, &track, &ComparisonConfig::default()).unwrap();
        let verdicts: Vec<Verdict> = samples.iter().map(|s| s.verdict).collect();
        assert_eq!(
            verdicts,
            vec![
                Verdict::Similar { offset: 0.0 },
                Verdict::StandardUndefined,
                Verdict::BothUndefined,
                Verdict::StandardUndefined,
            ]
        );
        assert_eq!(summary.similar, 2);
        assert_eq!(summary.strictly_similar, 1);
        assert_eq!(summary.undefined, 3);
        assert_eq!(summary.standard_undefined, 3);
        assert_eq!(summary.user_undefined, 1);
    }

    #[test]
    fn test_compare_recording_rejects_mismatched_bones() {
        let user = vec![BoneRecording { bone: BONES[0], samples: Vec::new() }];
        let standard = vec![CompressedBone::from_runs(BONES[1], Vec::new()).unwrap()];
        assert!(matches!(
            compare_recording(&user, &standard, &ComparisonConfig::default()),
            Err(PoseError::InvalidArgument(_))
        ));
        assert!(compare_recording(&user, &[], &ComparisonConfig::default()).is_err());
    }
}
