//! Result sinks: where a finished run's summary goes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use postura_common::error::{PosturaError, PosturaResult};
use postura_pose_model::{AnalysisSummary, PostureKind};

/// A finished run, as handed to a [`ResultSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Name of the video source that was analysed.
    pub source: String,

    /// Name of the detector that produced the keypoints.
    pub detector: String,

    /// Wall-clock start of the run (RFC 3339).
    pub started_at: String,

    /// Run duration in seconds.
    pub elapsed_secs: f64,

    pub summary: AnalysisSummary,
}

/// Accepts finished analysis records.
pub trait ResultSink: Send {
    fn submit(&mut self, record: &AnalysisRecord) -> PosturaResult<()>;
}

/// Logs each record at `info` and keeps nothing.
#[derive(Debug, Default)]
pub struct LogSink {
    received: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}

impl ResultSink for LogSink {
    fn submit(&mut self, record: &AnalysisRecord) -> PosturaResult<()> {
        self.received += 1;
        let summary = &record.summary;
        tracing::info!(
            source = %record.source,
            detector = %record.detector,
            frames = summary.frames_processed,
            slouch_good = summary.tally(PostureKind::Slouch).good,
            slouch_bad = summary.tally(PostureKind::Slouch).bad,
            desk_good = summary.tally(PostureKind::Desk).good,
            desk_bad = summary.tally(PostureKind::Desk).bad,
            squat_good = summary.tally(PostureKind::Squat).good,
            squat_bad = summary.tally(PostureKind::Squat).bad,
            "Received posture result"
        );
        Ok(())
    }
}

/// Writes each record as pretty JSON to a file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A sink writing to `dir/posture-<unix millis>.json`.
    pub fn in_dir(dir: &Path) -> Self {
        let stamp = chrono::Utc::now().timestamp_millis();
        Self::new(dir.join(format!("posture-{stamp}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for JsonFileSink {
    fn submit(&mut self, record: &AnalysisRecord) -> PosturaResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PosturaError::sink(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, json).map_err(|e| {
            PosturaError::sink(format!("cannot write {}: {e}", self.path.display()))
        })?;

        tracing::info!(path = %self.path.display(), "Wrote posture result");
        Ok(())
    }
}
