//! Pose detector interface and the detection-log replay adapter.

use std::collections::VecDeque;
use std::path::Path;

use image::RgbImage;

use postura_common::error::{PosturaError, PosturaResult};
use postura_pose_model::{parse_detections, DetectedSubject, DetectionRecord};

/// Given an image frame, return the detected subjects.
///
/// Subjects come back ranked; the driver analyses only the first. An empty
/// vector means nobody was found in the frame, which is not an error.
#[async_trait::async_trait]
pub trait PoseDetector: Send {
    /// Detector name for logging and result records.
    fn name(&self) -> &str;

    /// Run pose estimation on one frame.
    async fn estimate(&mut self, image: &RgbImage) -> PosturaResult<Vec<DetectedSubject>>;
}

/// Replays a recorded detection log, one record per call.
///
/// Lets a run be reproduced offline from the output of a real model. The
/// pixels passed to [`PoseDetector::estimate`] are ignored.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    name: String,
    pending: VecDeque<DetectionRecord>,
    served: u64,
}

impl ReplayDetector {
    pub fn from_records(name: impl Into<String>, records: Vec<DetectionRecord>) -> Self {
        Self {
            name: name.into(),
            pending: records.into(),
            served: 0,
        }
    }

    /// Load a JSON-lines detection log from disk.
    pub fn from_path(path: &Path) -> PosturaResult<Self> {
        if !path.exists() {
            return Err(PosturaError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let records = parse_detections(&content)
            .map_err(|e| PosturaError::detection_log(format!("{}: {e}", path.display())))?;

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            "Loaded detection log"
        );

        Ok(Self::from_records(
            format!("replay:{}", path.display()),
            records,
        ))
    }

    /// Records not yet replayed.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[async_trait::async_trait]
impl PoseDetector for ReplayDetector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn estimate(&mut self, _image: &RgbImage) -> PosturaResult<Vec<DetectedSubject>> {
        let record = self.pending.pop_front().ok_or_else(|| {
            PosturaError::detector(format!(
                "detection log exhausted after {} frame(s)",
                self.served
            ))
        })?;

        if record.frame != self.served {
            return Err(PosturaError::detector(format!(
                "detection log out of step: expected frame {}, found {}",
                self.served, record.frame
            )));
        }

        self.served += 1;
        Ok(record.subjects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postura_pose_model::RawKeypoint;

    fn record(frame: u64, subjects: usize) -> DetectionRecord {
        DetectionRecord {
            frame,
            subjects: (0..subjects)
                .map(|_| DetectedSubject {
                    score: Some(0.8),
                    keypoints: vec![RawKeypoint {
                        name: "left_hip".into(),
                        x: 10.0,
                        y: 20.0,
                        score: None,
                    }],
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn replays_records_in_order_then_fails() {
        let mut detector = ReplayDetector::from_records("test", vec![record(0, 1), record(1, 0)]);
        let image = RgbImage::new(2, 2);

        assert_eq!(detector.estimate(&image).await.unwrap().len(), 1);
        assert!(detector.estimate(&image).await.unwrap().is_empty());
        assert!(detector.is_empty());

        let err = detector.estimate(&image).await.unwrap_err();
        assert!(matches!(err, PosturaError::Detector { .. }));
    }

    #[tokio::test]
    async fn loads_log_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detections.jsonl");
        std::fs::write(
            &path,
            "{\"frame\":0,\"subjects\":[]}\n{\"frame\":1,\"subjects\":[]}\n",
        )
        .unwrap();

        let detector = ReplayDetector::from_path(&path).unwrap();
        assert_eq!(detector.len(), 2);
        assert!(detector.name().starts_with("replay:"));
    }

    #[test]
    fn malformed_log_is_a_detection_log_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jsonl");
        std::fs::write(&path, "{\"frame\":0}\nnot json\n").unwrap();

        assert!(matches!(
            ReplayDetector::from_path(&path),
            Err(PosturaError::DetectionLog { .. })
        ));
    }
}
