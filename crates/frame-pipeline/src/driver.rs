//! The frame driver: one pass over a video, one frame in flight.

use image::RgbImage;
use tokio_util::sync::CancellationToken;

use postura_analysis_core::{Aggregator, ClassifierSet};
use postura_common::clock::{FrameTimer, RunClock};
use postura_common::error::{PosturaError, PosturaResult};
use postura_pose_model::{AnalysisSummary, FrameVerdicts, KeypointFrame};

use crate::detector::PoseDetector;
use crate::sink::{AnalysisRecord, ResultSink};
use crate::source::VideoSource;

/// Per-run analysis settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverConfig {
    /// Keypoints scored below this are treated as missing.
    pub min_keypoint_score: f64,

    pub classifiers: ClassifierSet,
}

/// Where a driver is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed, not yet run.
    Idle,
    /// Rendering frame `frame` and waiting on the detector.
    Detecting { frame: u64 },
    /// Classifying the detector output for frame `frame`.
    Classifying { frame: u64 },
    /// Moving the source past frame `frame`.
    Advancing { frame: u64 },
    /// Every frame was analysed.
    Finished,
    /// The detector or the source failed.
    Failed,
    /// The run was cancelled before the source ended.
    Cancelled,
}

impl DriverState {
    /// Whether the run is over, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Cancelled)
    }
}

/// Drives a video source and a pose detector through every frame, feeding
/// the classifiers and the running tallies.
///
/// A driver runs once. Partial tallies stay readable through
/// [`FrameDriver::summarize`] after a failure or cancellation.
pub struct FrameDriver {
    source: Box<dyn VideoSource>,
    detector: Box<dyn PoseDetector>,
    config: DriverConfig,
    aggregator: Aggregator,
    state: DriverState,
    cancel: CancellationToken,
    buffer: RgbImage,
    detect_timer: FrameTimer,
    record: Option<AnalysisRecord>,
}

impl FrameDriver {
    pub fn new(
        source: Box<dyn VideoSource>,
        detector: Box<dyn PoseDetector>,
        config: DriverConfig,
    ) -> Self {
        let (width, height) = source.dimensions();
        Self {
            source,
            detector,
            config,
            aggregator: Aggregator::new(),
            state: DriverState::Idle,
            cancel: CancellationToken::new(),
            buffer: RgbImage::new(width, height),
            detect_timer: FrameTimer::new(),
            record: None,
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that aborts the run when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Tallies so far. Valid mid-run and after any outcome.
    pub fn summarize(&self) -> AnalysisSummary {
        self.aggregator.summarize()
    }

    /// The finished run's record. `None` unless the run reached `Finished`.
    pub fn record(&self) -> Option<&AnalysisRecord> {
        self.record.as_ref()
    }

    /// Detector latency over the frames analysed so far.
    pub fn detector_latency(&self) -> &FrameTimer {
        &self.detect_timer
    }

    /// Hand the finished run's record to `sink`.
    pub fn submit_to(&self, sink: &mut dyn ResultSink) -> PosturaResult<()> {
        let record = self
            .record
            .as_ref()
            .ok_or_else(|| PosturaError::pipeline("no finished run to submit"))?;
        sink.submit(record)
    }

    /// Analyse every frame of the source, in order, once.
    pub async fn run(&mut self) -> PosturaResult<AnalysisSummary> {
        if self.state != DriverState::Idle {
            return Err(PosturaError::pipeline(format!(
                "driver already ran (state {:?})",
                self.state
            )));
        }

        let clock = RunClock::start();
        tracing::info!(
            source = %self.source.name(),
            detector = %self.detector.name(),
            frames = ?self.source.frame_count(),
            min_keypoint_score = self.config.min_keypoint_score,
            "Starting posture analysis"
        );

        let mut frame: u64 = 0;
        while !self.source.ended() {
            if self.cancel.is_cancelled() {
                return Err(self.cancelled());
            }

            self.state = DriverState::Detecting { frame };
            if let Err(e) = self.source.render_into(&mut self.buffer) {
                return Err(self.fail(PosturaError::source_exhausted(frame, failure_message(e))));
            }

            self.detect_timer.begin();
            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                result = self.detector.estimate(&self.buffer) => Some(result),
            };
            let subjects = match outcome {
                None => return Err(self.cancelled()),
                Some(Ok(subjects)) => subjects,
                Some(Err(e)) => {
                    return Err(self.fail(PosturaError::detector_failure(frame, failure_message(e))))
                }
            };
            if let Some(elapsed) = self.detect_timer.end() {
                tracing::debug!(
                    frame,
                    subjects = subjects.len(),
                    latency_ms = elapsed.as_secs_f64() * 1000.0,
                    "Detector returned"
                );
            }

            self.state = DriverState::Classifying { frame };
            let verdicts = match subjects.first() {
                Some(subject) => {
                    let keypoints =
                        KeypointFrame::from_subject(subject, self.config.min_keypoint_score);
                    self.config.classifiers.classify(&keypoints)
                }
                None => {
                    tracing::trace!(frame, "No subject detected");
                    FrameVerdicts::NONE
                }
            };
            self.aggregator.record_frame(&verdicts);
            tracing::trace!(
                frame,
                slouch = ?verdicts.slouch,
                desk = ?verdicts.desk,
                squat = ?verdicts.squat,
                "Frame classified"
            );

            self.state = DriverState::Advancing { frame };
            if let Err(e) = self.source.advance() {
                return Err(self.fail(PosturaError::source_exhausted(frame, failure_message(e))));
            }
            frame += 1;
        }

        self.state = DriverState::Finished;
        let summary = self.aggregator.summarize();
        let elapsed_secs = clock.elapsed_secs();

        tracing::info!(
            frames = summary.frames_processed,
            elapsed_secs,
            mean_detect_ms = self.detect_timer.mean().as_secs_f64() * 1000.0,
            slowest_detect_ms = self.detect_timer.slowest().as_secs_f64() * 1000.0,
            "Posture analysis finished"
        );

        self.record = Some(AnalysisRecord {
            source: self.source.name().to_string(),
            detector: self.detector.name().to_string(),
            started_at: clock.epoch_wall().to_string(),
            elapsed_secs,
            summary,
        });
        Ok(summary)
    }

    fn fail(&mut self, err: PosturaError) -> PosturaError {
        self.state = DriverState::Failed;
        tracing::error!(
            frames_processed = self.aggregator.frames_processed(),
            error = %err,
            "Posture analysis failed"
        );
        err
    }

    fn cancelled(&mut self) -> PosturaError {
        self.state = DriverState::Cancelled;
        let frames_processed = self.aggregator.frames_processed();
        tracing::warn!(frames_processed, "Posture analysis cancelled");
        PosturaError::Cancelled { frames_processed }
    }
}

/// The adapter's own message, without the outer error-kind prefix.
fn failure_message(err: PosturaError) -> String {
    match err {
        PosturaError::Detector { message } | PosturaError::Source { message } => message,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ReplayDetector;
    use crate::source::SyntheticSource;
    use postura_pose_model::DetectionRecord;

    fn empty_records(n: u64) -> Vec<DetectionRecord> {
        (0..n)
            .map(|frame| DetectionRecord {
                frame,
                subjects: Vec::new(),
            })
            .collect()
    }

    #[tokio::test]
    async fn already_ended_source_finishes_immediately() {
        let mut driver = FrameDriver::new(
            Box::new(SyntheticSource::new(0, 4, 4)),
            Box::new(ReplayDetector::from_records("none", Vec::new())),
            DriverConfig::default(),
        );

        let summary = driver.run().await.unwrap();
        assert_eq!(summary, AnalysisSummary::default());
        assert_eq!(driver.state(), DriverState::Finished);
        assert!(driver.record().is_some());
    }

    #[tokio::test]
    async fn driver_runs_only_once() {
        let mut driver = FrameDriver::new(
            Box::new(SyntheticSource::new(2, 4, 4)),
            Box::new(ReplayDetector::from_records("empty", empty_records(2))),
            DriverConfig::default(),
        );

        driver.run().await.unwrap();
        assert!(matches!(
            driver.run().await,
            Err(PosturaError::Pipeline { .. })
        ));
        assert_eq!(driver.summarize().frames_processed, 2);
    }

    #[tokio::test]
    async fn pre_cancelled_token_stops_before_first_frame() {
        let token = CancellationToken::new();
        token.cancel();
        let mut driver = FrameDriver::new(
            Box::new(SyntheticSource::new(3, 4, 4)),
            Box::new(ReplayDetector::from_records("empty", empty_records(3))),
            DriverConfig::default(),
        )
        .with_cancellation(token);

        assert!(matches!(
            driver.run().await,
            Err(PosturaError::Cancelled {
                frames_processed: 0
            })
        ));
        assert_eq!(driver.state(), DriverState::Cancelled);
        assert!(driver.state().is_terminal());
    }

    #[test]
    fn submit_requires_finished_run() {
        let driver = FrameDriver::new(
            Box::new(SyntheticSource::new(1, 4, 4)),
            Box::new(ReplayDetector::from_records("empty", empty_records(1))),
            DriverConfig::default(),
        );
        let mut sink = crate::sink::LogSink::new();
        assert!(driver.submit_to(&mut sink).is_err());
        assert_eq!(sink.received(), 0);
    }
}
