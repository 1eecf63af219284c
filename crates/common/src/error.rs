//! Error types shared across Postura crates.

use std::path::PathBuf;

/// Why an analysis run was aborted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisFailure {
    /// The pose detector rejected or failed a frame.
    #[error("detector failure: {0}")]
    Detector(String),

    /// The video source could not render or advance before it ended.
    #[error("video source exhausted prematurely: {0}")]
    SourceExhausted(String),
}

/// Top-level error type for Postura operations.
#[derive(Debug, thiserror::Error)]
pub enum PosturaError {
    #[error("Analysis failed at frame {frame}: {cause}")]
    AnalysisFailed { frame: u64, cause: AnalysisFailure },

    #[error("Analysis cancelled after {frames_processed} frame(s)")]
    Cancelled { frames_processed: u64 },

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },

    #[error("Detection log error: {message}")]
    DetectionLog { message: String },

    #[error("Video source error: {message}")]
    Source { message: String },

    #[error("Detector error: {message}")]
    Detector { message: String },

    #[error("Result sink error: {message}")]
    Sink { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PosturaError.
pub type PosturaResult<T> = Result<T, PosturaError>;

impl PosturaError {
    pub fn detector_failure(frame: u64, msg: impl Into<String>) -> Self {
        Self::AnalysisFailed {
            frame,
            cause: AnalysisFailure::Detector(msg.into()),
        }
    }

    pub fn source_exhausted(frame: u64, msg: impl Into<String>) -> Self {
        Self::AnalysisFailed {
            frame,
            cause: AnalysisFailure::SourceExhausted(msg.into()),
        }
    }

    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline {
            message: msg.into(),
        }
    }

    pub fn detection_log(msg: impl Into<String>) -> Self {
        Self::DetectionLog {
            message: msg.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn detector(msg: impl Into<String>) -> Self {
        Self::Detector {
            message: msg.into(),
        }
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error aborted a run because of failing infrastructure
    /// (detector or source), as opposed to cancellation or setup problems.
    pub fn is_analysis_failure(&self) -> bool {
        matches!(self, Self::AnalysisFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_failures_are_distinguishable() {
        let err = PosturaError::detector_failure(2, "model rejected input");
        assert!(err.is_analysis_failure());
        assert_eq!(
            err.to_string(),
            "Analysis failed at frame 2: detector failure: model rejected input"
        );

        let cancelled = PosturaError::Cancelled {
            frames_processed: 2,
        };
        assert!(!cancelled.is_analysis_failure());
    }

    #[test]
    fn source_exhaustion_carries_frame() {
        match PosturaError::source_exhausted(7, "decode error") {
            PosturaError::AnalysisFailed { frame, cause } => {
                assert_eq!(frame, 7);
                assert_eq!(cause, AnalysisFailure::SourceExhausted("decode error".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
