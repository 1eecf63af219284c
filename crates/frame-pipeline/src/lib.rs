//! Postura Frame Pipeline
//!
//! Drives posture analysis across a whole video, one frame at a time.
//! The driver owns a video source, a pose detector, and the running
//! tallies; the detector call is the only await point per frame.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    FrameDriver                        │
//! │  ┌─────────────┐   ┌──────────────┐   ┌────────────┐  │
//! │  │ VideoSource │──▶│ PoseDetector │──▶│ Classifier │  │
//! │  │ (render k)  │   │  (await)     │   │    Set     │  │
//! │  └─────────────┘   └──────────────┘   └─────┬──────┘  │
//! │         ▲                                   ▼         │
//! │         └──────── advance ◀──────────  Aggregator     │
//! └───────────────────────────┬──────────────────────────┘
//!                             ▼
//!                 AnalysisSummary → ResultSink
//! ```

pub mod detector;
pub mod driver;
pub mod sink;
pub mod source;

pub use detector::{PoseDetector, ReplayDetector};
pub use driver::{DriverConfig, DriverState, FrameDriver};
pub use sink::{AnalysisRecord, JsonFileSink, LogSink, ResultSink};
pub use source::{ImageSequenceSource, SyntheticSource, VideoSource};
