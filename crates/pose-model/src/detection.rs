//! Pose detector output and the detection log format.
//!
//! A detection log is JSONL: one [`DetectionRecord`] per analysed frame,
//! in frame order. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"frame":0,"subjects":[{"score":0.93,"keypoints":[{"name":"left_hip","x":310.0,"y":402.5,"score":0.98}]}]}
//! {"frame":1,"subjects":[]}
//! ```

use serde::{Deserialize, Serialize};

/// A keypoint exactly as the detector labels it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawKeypoint {
    /// Detector label, e.g. `left_shoulder` or `nose`.
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Confidence; detectors that omit it are taken as fully confident.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RawKeypoint {
    pub fn confidence(&self) -> f64 {
        self.score.unwrap_or(1.0)
    }
}

/// One person found by the detector in a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedSubject {
    /// Overall subject confidence, when the detector reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default)]
    pub keypoints: Vec<RawKeypoint>,
}

/// Everything the detector reported for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Zero-based frame index.
    pub frame: u64,

    #[serde(default)]
    pub subjects: Vec<DetectedSubject>,
}

/// Failure to read a detection log.
#[derive(Debug, thiserror::Error)]
pub enum DetectionLogError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: expected frame {expected}, found frame {found}")]
    OutOfOrder {
        line: usize,
        expected: u64,
        found: u64,
    },
}

/// Parse a detection log. Frames must be numbered consecutively from 0
/// because the log replays detector output one frame at a time.
pub fn parse_detections(jsonl: &str) -> Result<Vec<DetectionRecord>, DetectionLogError> {
    let mut records = Vec::new();
    for (i, line) in jsonl.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let record: DetectionRecord =
            serde_json::from_str(trimmed).map_err(|source| DetectionLogError::Parse {
                line: line_no,
                source,
            })?;

        let expected = records.len() as u64;
        if record.frame != expected {
            return Err(DetectionLogError::OutOfOrder {
                line: line_no,
                expected,
                found: record.frame,
            });
        }
        records.push(record);
    }
    Ok(records)
}

/// Serialize records to JSONL format.
pub fn serialize_detections(records: &[DetectionRecord]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}
