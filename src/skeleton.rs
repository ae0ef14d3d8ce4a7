//! Tracked joints and the fixed bone table of a skeleton recording.
//!
//! A recording stores one track per bone, always in the order of [`BONES`].
//! Each bone sample is the orientation of the segment from `from` to `to`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The 25 joints reported by a Kinect v2 body frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Joint {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

impl Joint {
    /// Every joint in sensor order.
    pub const ALL: [Self; 25] = [
        Self::SpineBase,
        Self::SpineMid,
        Self::Neck,
        Self::Head,
        Self::ShoulderLeft,
        Self::ElbowLeft,
        Self::WristLeft,
        Self::HandLeft,
        Self::ShoulderRight,
        Self::ElbowRight,
        Self::WristRight,
        Self::HandRight,
        Self::HipLeft,
        Self::KneeLeft,
        Self::AnkleLeft,
        Self::FootLeft,
        Self::HipRight,
        Self::KneeRight,
        Self::AnkleRight,
        Self::FootRight,
        Self::SpineShoulder,
        Self::HandTipLeft,
        Self::ThumbLeft,
        Self::HandTipRight,
        Self::ThumbRight,
    ];
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A bone: the segment between two joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bone {
    /// Joint the bone starts at.
    pub from: Joint,
    /// Joint the bone points to.
    pub to: Joint,
}

impl Bone {
    #[must_use]
    pub const fn new(from: Joint, to: Joint) -> Self {
        Self { from, to }
    }

    /// Position of this bone in [`BONES`].
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        BONES.iter().position(|b| b == self)
    }
}

impl fmt::Display for Bone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "From {} To {}", self.from, self.to)
    }
}

/// Number of bones in a recording.
pub const BONE_COUNT: usize = 24;

const fn bone(to: Joint, from: Joint) -> Bone {
    Bone { from, to }
}

/// Bones in recording order.
pub const BONES: [Bone; BONE_COUNT] = {
    use Joint::*;
    [
        // Torso
        bone(Head, Neck),
        bone(Neck, SpineShoulder),
        bone(SpineShoulder, SpineMid),
        bone(SpineMid, SpineBase),
        bone(SpineShoulder, ShoulderRight),
        bone(SpineShoulder, ShoulderLeft),
        bone(SpineBase, HipRight),
        bone(SpineBase, HipLeft),
        // Right arm
        bone(ShoulderRight, ElbowRight),
        bone(ElbowRight, WristRight),
        bone(WristRight, HandRight),
        bone(HandRight, HandTipRight),
        bone(WristRight, ThumbRight),
        // Left arm
        bone(ShoulderLeft, ElbowLeft),
        bone(ElbowLeft, WristLeft),
        bone(WristLeft, HandLeft),
        bone(HandLeft, HandTipLeft),
        bone(WristLeft, ThumbLeft),
        // Right leg
        bone(HipRight, KneeRight),
        bone(KneeRight, AnkleRight),
        bone(AnkleRight, FootRight),
        // Left leg
        bone(HipLeft, KneeLeft),
        bone(KneeLeft, AnkleLeft),
        bone(AnkleLeft, FootLeft),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bones_are_distinct() {
        let unique: HashSet<_> = BONES.iter().collect();
        assert_eq!(unique.len(), BONE_COUNT);
    }

    #[test]
    fn test_every_joint_is_covered() {
        let touched: HashSet<Joint> = BONES.iter().flat_map(|b| [b.from, b.to]).collect();
        assert_eq!(touched.len(), Joint::ALL.len());
    }

    #[test]
    fn test_index_and_display() {
        let first = BONES[0];
        assert_eq!(first.from, Joint::Neck);
        assert_eq!(first.to, Joint::Head);
        assert_eq!(first.index(), Some(0));
        assert_eq!(first.to_string(), "From Neck To Head");
        assert_eq!(Bone::new(Joint::Head, Joint::FootLeft).index(), None);
    }
}
