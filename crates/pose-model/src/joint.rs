//! Anatomical joint labels.

use serde::{Deserialize, Serialize};

/// Body side of a bilateral joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// Joint kind without a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Ear,
    Shoulder,
    Hip,
    Knee,
    Ankle,
}

/// The joints the posture classifiers care about.
///
/// Serialized with the detector's snake_case labels (`left_shoulder`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointName {
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl JointName {
    pub const COUNT: usize = 10;

    pub const ALL: [JointName; JointName::COUNT] = [
        JointName::LeftEar,
        JointName::RightEar,
        JointName::LeftShoulder,
        JointName::RightShoulder,
        JointName::LeftHip,
        JointName::RightHip,
        JointName::LeftKnee,
        JointName::RightKnee,
        JointName::LeftAnkle,
        JointName::RightAnkle,
    ];

    /// Build a joint from its side and body part.
    pub fn new(side: Side, part: BodyPart) -> Self {
        match (side, part) {
            (Side::Left, BodyPart::Ear) => Self::LeftEar,
            (Side::Right, BodyPart::Ear) => Self::RightEar,
            (Side::Left, BodyPart::Shoulder) => Self::LeftShoulder,
            (Side::Right, BodyPart::Shoulder) => Self::RightShoulder,
            (Side::Left, BodyPart::Hip) => Self::LeftHip,
            (Side::Right, BodyPart::Hip) => Self::RightHip,
            (Side::Left, BodyPart::Knee) => Self::LeftKnee,
            (Side::Right, BodyPart::Knee) => Self::RightKnee,
            (Side::Left, BodyPart::Ankle) => Self::LeftAnkle,
            (Side::Right, BodyPart::Ankle) => Self::RightAnkle,
        }
    }

    /// Slot index inside a [`crate::KeypointFrame`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn side(self) -> Side {
        match self {
            Self::LeftEar | Self::LeftShoulder | Self::LeftHip | Self::LeftKnee | Self::LeftAnkle => {
                Side::Left
            }
            _ => Side::Right,
        }
    }

    pub fn part(self) -> BodyPart {
        match self {
            Self::LeftEar | Self::RightEar => BodyPart::Ear,
            Self::LeftShoulder | Self::RightShoulder => BodyPart::Shoulder,
            Self::LeftHip | Self::RightHip => BodyPart::Hip,
            Self::LeftKnee | Self::RightKnee => BodyPart::Knee,
            Self::LeftAnkle | Self::RightAnkle => BodyPart::Ankle,
        }
    }

    /// The detector label for this joint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Parse a detector label. Labels outside the closed set (nose, eyes,
    /// wrists, ...) return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|joint| joint.as_str() == name)
    }
}

impl std::fmt::Display for JointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
