//! Postura Pose Model
//!
//! Defines the data contracts shared by the analysis pipeline:
//! - **Joints:** The closed set of anatomical labels the classifiers use
//! - **Keypoints:** Per-frame 2-D joint positions with confidence
//! - **Detections:** What a pose detector reports for one frame, and the
//!   JSONL detection log format used to replay detector output
//! - **Posture:** Verdicts, tallies, and the end-of-run summary
//!
//! Coordinates are in the detector's image space (pixels, y grows downward).

pub mod detection;
pub mod joint;
pub mod keypoint;
pub mod posture;

pub use detection::*;
pub use joint::*;
pub use keypoint::*;
pub use posture::*;
