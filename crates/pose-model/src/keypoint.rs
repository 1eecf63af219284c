//! Keypoints and the per-frame keypoint snapshot.

use serde::{Deserialize, Serialize};

use crate::detection::DetectedSubject;
use crate::joint::JointName;

/// A 2-D point in detector image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`.
    pub fn offset_from(&self, origin: &Point2D) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A detected body joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: JointName,
    pub x: f64,
    pub y: f64,
    /// Detector confidence in `[0.0, 1.0]`.
    pub score: f64,
}

impl Keypoint {
    pub fn new(name: JointName, x: f64, y: f64, score: f64) -> Self {
        Self { name, x, y, score }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// The keypoints of one subject in one frame, one optional slot per joint.
///
/// Built once per analysed frame and discarded after classification.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeypointFrame {
    slots: [Option<Keypoint>; JointName::COUNT],
}

impl KeypointFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from keypoints. A later keypoint with the same joint
    /// replaces an earlier one.
    pub fn from_keypoints(keypoints: impl IntoIterator<Item = Keypoint>) -> Self {
        let mut frame = Self::new();
        for keypoint in keypoints {
            frame.insert(keypoint);
        }
        frame
    }

    /// Build a frame from a detector subject, dropping labels outside the
    /// joint set and keypoints scored below `min_score`. Keypoints with a
    /// non-finite score are always dropped.
    pub fn from_subject(subject: &DetectedSubject, min_score: f64) -> Self {
        let mut frame = Self::new();
        for raw in &subject.keypoints {
            let Some(name) = JointName::from_name(&raw.name) else {
                continue;
            };
            let score = raw.confidence();
            if !score.is_finite() || score < min_score {
                continue;
            }
            frame.insert(Keypoint::new(name, raw.x, raw.y, score));
        }
        frame
    }

    pub fn insert(&mut self, keypoint: Keypoint) {
        self.slots[keypoint.name.index()] = Some(keypoint);
    }

    pub fn remove(&mut self, joint: JointName) -> Option<Keypoint> {
        self.slots[joint.index()].take()
    }

    pub fn get(&self, joint: JointName) -> Option<&Keypoint> {
        self.slots[joint.index()].as_ref()
    }

    pub fn position(&self, joint: JointName) -> Option<Point2D> {
        self.get(joint).map(Keypoint::position)
    }

    pub fn contains(&self, joint: JointName) -> bool {
        self.slots[joint.index()].is_some()
    }

    /// First joint in `required` that is absent, if any.
    pub fn first_missing(&self, required: &[JointName]) -> Option<JointName> {
        required.iter().copied().find(|joint| !self.contains(*joint))
    }

    /// Number of joints present.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present keypoints in joint order.
    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        self.slots.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::RawKeypoint;

    fn raw(name: &str, x: f64, y: f64, score: Option<f64>) -> RawKeypoint {
        RawKeypoint {
            name: name.to_string(),
            x,
            y,
            score,
        }
    }

    #[test]
    fn last_seen_keypoint_wins() {
        let frame = KeypointFrame::from_keypoints([
            Keypoint::new(JointName::LeftHip, 1.0, 2.0, 0.9),
            Keypoint::new(JointName::LeftHip, 3.0, 4.0, 0.8),
        ]);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.position(JointName::LeftHip), Some(Point2D::new(3.0, 4.0)));
    }

    #[test]
    fn subject_conversion_filters_unknown_and_low_scores() {
        let subject = DetectedSubject {
            score: Some(0.95),
            keypoints: vec![
                raw("nose", 10.0, 10.0, Some(0.99)),
                raw("left_ear", 12.0, 11.0, Some(0.2)),
                raw("left_shoulder", 20.0, 40.0, Some(0.9)),
                raw("left_hip", 22.0, 90.0, None),
                raw("right_ear", 30.0, 11.0, Some(f64::NAN)),
            ],
        };

        let frame = KeypointFrame::from_subject(&subject, 0.5);
        assert_eq!(frame.len(), 2);
        assert!(!frame.contains(JointName::LeftEar));
        assert!(frame.contains(JointName::LeftShoulder));
        assert_eq!(frame.get(JointName::LeftHip).map(|k| k.score), Some(1.0));

        assert!(!frame.contains(JointName::RightEar));

        let permissive = KeypointFrame::from_subject(&subject, 0.0);
        assert!(permissive.contains(JointName::LeftEar));
        assert!(!permissive.contains(JointName::RightEar));
    }

    #[test]
    fn first_missing_reports_in_required_order() {
        let frame = KeypointFrame::from_keypoints([Keypoint::new(
            JointName::LeftShoulder,
            0.0,
            0.0,
            1.0,
        )]);
        let required = [JointName::LeftHip, JointName::LeftShoulder, JointName::LeftEar];
        assert_eq!(frame.first_missing(&required), Some(JointName::LeftHip));
        assert_eq!(frame.first_missing(&[JointName::LeftShoulder]), None);
    }

    #[test]
    fn empty_frame() {
        let mut frame = KeypointFrame::new();
        assert!(frame.is_empty());
        frame.insert(Keypoint::new(JointName::RightKnee, 5.0, 5.0, 0.7));
        assert_eq!(frame.iter().count(), 1);
        assert!(frame.remove(JointName::RightKnee).is_some());
        assert!(frame.is_empty());
    }
}
