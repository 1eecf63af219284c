//! Posture classifiers.
//!
//! Each classifier checks that its joints are present, measures one angle
//! per side, and compares it to a fixed threshold. Anything that keeps a
//! classifier from reaching a Good/Bad decision (missing joints, coincident
//! joints, a frame that does not show the scenario) becomes
//! [`PostureVerdict::NotApplicable`] for that classifier only.
//!
//! | Kind   | Vertex        | Arms                    | Bad when          |
//! |--------|---------------|-------------------------|-------------------|
//! | Slouch | left shoulder | left hip, left ear      | angle < 150°      |
//! | Desk   | each shoulder | ear, hip                | either side > 30° |
//! | Squat  | each hip      | ankle, shoulder or knee | either side < 150°|

use serde::{Deserialize, Serialize};

use postura_pose_model::{
    BodyPart, FrameVerdicts, JointName, KeypointFrame, Point2D, PostureKind, PostureVerdict, Side,
};

use crate::geometry::{angle_at, DegenerateGeometry};

/// Shoulder angle (hip–shoulder–ear) below which the subject is slouching.
pub const SLOUCH_MIN_ANGLE_DEG: f64 = 150.0;

/// Neck angle (ear–shoulder–hip) above which desk posture is bad.
pub const DESK_MAX_NECK_ANGLE_DEG: f64 = 30.0;

/// Squat form is only judged when the vertical hip–ankle distance is
/// below this many pixels.
pub const SQUAT_GATE_MAX_HIP_ANKLE_DISTANCE: f64 = 150.0;

/// Hip angle (ankle–hip–shoulder) below which squat form is bad.
pub const SQUAT_MIN_HIP_ANGLE_DEG: f64 = 150.0;

/// Thresholds used by the classifiers. Defaults are the named constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureThresholds {
    pub slouch_min_angle_deg: f64,
    pub desk_max_neck_angle_deg: f64,
    pub squat_gate_max_hip_ankle_distance: f64,
    pub squat_min_hip_angle_deg: f64,
}

impl Default for PostureThresholds {
    fn default() -> Self {
        Self {
            slouch_min_angle_deg: SLOUCH_MIN_ANGLE_DEG,
            desk_max_neck_angle_deg: DESK_MAX_NECK_ANGLE_DEG,
            squat_gate_max_hip_ankle_distance: SQUAT_GATE_MAX_HIP_ANKLE_DISTANCE,
            squat_min_hip_angle_deg: SQUAT_MIN_HIP_ANGLE_DEG,
        }
    }
}

/// Which joint forms the upper arm of the squat hip angle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquatArmPolicy {
    /// Use the shoulder; fall back to the knee when the shoulder is absent.
    #[default]
    ShoulderThenKnee,
    ShoulderOnly,
    KneeOnly,
}

impl SquatArmPolicy {
    fn resolve(self, frame: &KeypointFrame, side: Side) -> Result<Point2D, SkipReason> {
        let shoulder = JointName::new(side, BodyPart::Shoulder);
        let knee = JointName::new(side, BodyPart::Knee);
        let (primary, fallback) = match self {
            Self::ShoulderThenKnee => (shoulder, Some(knee)),
            Self::ShoulderOnly => (shoulder, None),
            Self::KneeOnly => (knee, None),
        };
        frame
            .position(primary)
            .or_else(|| fallback.and_then(|joint| frame.position(joint)))
            .ok_or(SkipReason::InsufficientKeypoints(primary))
    }
}

/// Why a classifier produced no Good/Bad verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    /// A required joint is absent from the frame.
    InsufficientKeypoints(JointName),
    /// An angle could not be measured.
    DegenerateGeometry(DegenerateGeometry),
    /// The squat gate rejected the frame.
    NotSquatting { hip_ankle_distance: f64 },
}

impl From<DegenerateGeometry> for SkipReason {
    fn from(err: DegenerateGeometry) -> Self {
        Self::DegenerateGeometry(err)
    }
}

/// A stateless rule judging one posture kind on one frame.
pub trait PostureClassifier: Send + Sync {
    fn kind(&self) -> PostureKind;

    /// Judge the frame, explaining any non-verdict.
    fn evaluate(&self, frame: &KeypointFrame) -> Result<PostureVerdict, SkipReason>;

    /// Judge the frame, folding every skip into `NotApplicable`.
    fn classify(&self, frame: &KeypointFrame) -> PostureVerdict {
        match self.evaluate(frame) {
            Ok(verdict) => verdict,
            Err(reason) => {
                tracing::trace!(kind = ?self.kind(), ?reason, "Classifier not applicable");
                PostureVerdict::NotApplicable
            }
        }
    }
}

fn require(frame: &KeypointFrame, joint: JointName) -> Result<Point2D, SkipReason> {
    frame
        .position(joint)
        .ok_or(SkipReason::InsufficientKeypoints(joint))
}

fn require_all(frame: &KeypointFrame, joints: &[JointName]) -> Result<(), SkipReason> {
    match frame.first_missing(joints) {
        Some(joint) => Err(SkipReason::InsufficientKeypoints(joint)),
        None => Ok(()),
    }
}

fn verdict(bad: bool) -> PostureVerdict {
    if bad {
        PostureVerdict::Bad
    } else {
        PostureVerdict::Good
    }
}

/// Left-side shoulder angle between hip and ear.
#[derive(Debug, Clone, Copy)]
pub struct SlouchClassifier {
    pub min_angle_deg: f64,
}

impl Default for SlouchClassifier {
    fn default() -> Self {
        Self {
            min_angle_deg: SLOUCH_MIN_ANGLE_DEG,
        }
    }
}

impl PostureClassifier for SlouchClassifier {
    fn kind(&self) -> PostureKind {
        PostureKind::Slouch
    }

    fn evaluate(&self, frame: &KeypointFrame) -> Result<PostureVerdict, SkipReason> {
        let hip = require(frame, JointName::LeftHip)?;
        let shoulder = require(frame, JointName::LeftShoulder)?;
        let ear = require(frame, JointName::LeftEar)?;

        let angle = angle_at(shoulder, hip, ear)?;
        Ok(verdict(angle < self.min_angle_deg))
    }
}

/// Neck angle at each shoulder between ear and hip.
#[derive(Debug, Clone, Copy)]
pub struct DeskClassifier {
    pub max_neck_angle_deg: f64,
}

impl Default for DeskClassifier {
    fn default() -> Self {
        Self {
            max_neck_angle_deg: DESK_MAX_NECK_ANGLE_DEG,
        }
    }
}

impl DeskClassifier {
    const REQUIRED: [JointName; 6] = [
        JointName::LeftEar,
        JointName::LeftShoulder,
        JointName::LeftHip,
        JointName::RightEar,
        JointName::RightShoulder,
        JointName::RightHip,
    ];
}

impl PostureClassifier for DeskClassifier {
    fn kind(&self) -> PostureKind {
        PostureKind::Desk
    }

    fn evaluate(&self, frame: &KeypointFrame) -> Result<PostureVerdict, SkipReason> {
        require_all(frame, &Self::REQUIRED)?;

        let mut bad = false;
        for side in Side::BOTH {
            let ear = require(frame, JointName::new(side, BodyPart::Ear))?;
            let shoulder = require(frame, JointName::new(side, BodyPart::Shoulder))?;
            let hip = require(frame, JointName::new(side, BodyPart::Hip))?;
            let neck = angle_at(shoulder, ear, hip)?;
            bad |= neck > self.max_neck_angle_deg;
        }
        Ok(verdict(bad))
    }
}

/// Hip angle at each hip between ankle and shoulder (or knee), judged only
/// when hips and ankles are close enough vertically to be a squat.
#[derive(Debug, Clone, Copy)]
pub struct SquatClassifier {
    pub gate_max_hip_ankle_distance: f64,
    pub min_hip_angle_deg: f64,
    pub arm_policy: SquatArmPolicy,
}

impl Default for SquatClassifier {
    fn default() -> Self {
        Self {
            gate_max_hip_ankle_distance: SQUAT_GATE_MAX_HIP_ANKLE_DISTANCE,
            min_hip_angle_deg: SQUAT_MIN_HIP_ANGLE_DEG,
            arm_policy: SquatArmPolicy::default(),
        }
    }
}

impl SquatClassifier {
    const REQUIRED: [JointName; 6] = [
        JointName::LeftHip,
        JointName::LeftKnee,
        JointName::LeftAnkle,
        JointName::RightHip,
        JointName::RightKnee,
        JointName::RightAnkle,
    ];

    /// Absolute vertical distance between the mean hip and mean ankle
    /// heights. Requires both hips and both ankles.
    pub fn hip_ankle_distance(frame: &KeypointFrame) -> Result<f64, SkipReason> {
        let left_hip = require(frame, JointName::LeftHip)?;
        let right_hip = require(frame, JointName::RightHip)?;
        let left_ankle = require(frame, JointName::LeftAnkle)?;
        let right_ankle = require(frame, JointName::RightAnkle)?;

        let hip_height = (left_hip.y + right_hip.y) / 2.0;
        let ankle_height = (left_ankle.y + right_ankle.y) / 2.0;
        Ok((hip_height - ankle_height).abs())
    }
}

impl PostureClassifier for SquatClassifier {
    fn kind(&self) -> PostureKind {
        PostureKind::Squat
    }

    fn evaluate(&self, frame: &KeypointFrame) -> Result<PostureVerdict, SkipReason> {
        require_all(frame, &Self::REQUIRED)?;

        let distance = Self::hip_ankle_distance(frame)?;
        if distance >= self.gate_max_hip_ankle_distance {
            return Err(SkipReason::NotSquatting {
                hip_ankle_distance: distance,
            });
        }

        let mut bad = false;
        for side in Side::BOTH {
            let hip = require(frame, JointName::new(side, BodyPart::Hip))?;
            let ankle = require(frame, JointName::new(side, BodyPart::Ankle))?;
            let upper = self.arm_policy.resolve(frame, side)?;
            let angle = angle_at(hip, ankle, upper)?;
            bad |= angle < self.min_hip_angle_deg;
        }
        Ok(verdict(bad))
    }
}

/// The three classifiers applied together to each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierSet {
    pub slouch: SlouchClassifier,
    pub desk: DeskClassifier,
    pub squat: SquatClassifier,
}

impl ClassifierSet {
    pub fn new(thresholds: PostureThresholds, squat_arm: SquatArmPolicy) -> Self {
        Self {
            slouch: SlouchClassifier {
                min_angle_deg: thresholds.slouch_min_angle_deg,
            },
            desk: DeskClassifier {
                max_neck_angle_deg: thresholds.desk_max_neck_angle_deg,
            },
            squat: SquatClassifier {
                gate_max_hip_ankle_distance: thresholds.squat_gate_max_hip_ankle_distance,
                min_hip_angle_deg: thresholds.squat_min_hip_angle_deg,
                arm_policy: squat_arm,
            },
        }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn classifier(&self, kind: PostureKind) -> &dyn PostureClassifier {
        match kind {
            PostureKind::Slouch => &self.slouch,
            PostureKind::Desk => &self.desk,
            PostureKind::Squat => &self.squat,
        }
    }

    pub fn classify(&self, frame: &KeypointFrame) -> FrameVerdicts {
        FrameVerdicts {
            slouch: self.slouch.classify(frame),
            desk: self.desk.classify(frame),
            squat: self.squat.classify(frame),
        }
    }
}
