//! Run the frame pipeline over a recorded detection log.

use std::path::PathBuf;

use postura_common::config::AppConfig;
use postura_common::error::PosturaError;
use postura_frame_pipeline::{
    DriverConfig, FrameDriver, ImageSequenceSource, JsonFileSink, LogSink, ReplayDetector,
    ResultSink, SyntheticSource, VideoSource,
};
use postura_pose_model::{AnalysisSummary, PostureKind};

pub struct AnalyzeArgs {
    pub detections: PathBuf,
    pub frames: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub output: Option<PathBuf>,
    pub min_score: Option<f64>,
    pub config: Option<PathBuf>,
}

pub async fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?,
        None => AppConfig::load(),
    };

    let min_keypoint_score = args
        .min_score
        .unwrap_or(config.analysis.min_keypoint_score);
    if !(0.0..=1.0).contains(&min_keypoint_score) {
        anyhow::bail!("--min-score must be within [0.0, 1.0], got {min_keypoint_score}");
    }

    let detector = ReplayDetector::from_path(&args.detections)
        .map_err(|e| anyhow::anyhow!("Failed to load detections: {e}"))?;

    let source: Box<dyn VideoSource> = match &args.frames {
        Some(dir) => Box::new(
            ImageSequenceSource::open(dir)
                .map_err(|e| anyhow::anyhow!("Failed to open frames: {e}"))?,
        ),
        None => Box::new(SyntheticSource::new(
            detector.len() as u64,
            args.width,
            args.height,
        )),
    };

    if let Some(count) = source.frame_count() {
        if count != detector.len() as u64 {
            tracing::warn!(
                frames = count,
                detections = detector.len(),
                "Frame count and detection log length differ"
            );
        }
    }

    let (width, height) = source.dimensions();
    println!(
        "Analyzing {} ({} frames, {width}x{height})",
        source.name(),
        source
            .frame_count()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".into()),
    );

    let driver_config = DriverConfig {
        min_keypoint_score,
        ..Default::default()
    };
    let mut driver = FrameDriver::new(source, Box::new(detector), driver_config);

    let token = driver.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling analysis");
            token.cancel();
        }
    });

    let outcome = driver.run().await;
    interrupt.abort();

    match outcome {
        Ok(summary) => {
            println!();
            print_summary(&summary);

            let mut sink: Box<dyn ResultSink> = match (&args.output, &config.analysis.results_dir)
            {
                (Some(path), _) => Box::new(JsonFileSink::new(path)),
                (None, Some(dir)) => Box::new(JsonFileSink::in_dir(dir)),
                (None, None) => Box::new(LogSink::new()),
            };
            driver
                .submit_to(sink.as_mut())
                .map_err(|e| anyhow::anyhow!("Failed to store result: {e}"))?;
            Ok(())
        }
        Err(PosturaError::Cancelled { frames_processed }) => {
            println!("\nAnalysis cancelled after {frames_processed} frame(s). Partial results:");
            print_summary(&driver.summarize());
            anyhow::bail!("analysis cancelled")
        }
        Err(e) => Err(anyhow::anyhow!("Analysis failed: {e}")),
    }
}

fn print_summary(summary: &AnalysisSummary) {
    println!("Frames analyzed: {}", summary.frames_processed);
    for kind in PostureKind::ALL {
        let tally = summary.tally(kind);
        println!(
            "{} - Good: {}, Bad: {}",
            kind.label(),
            tally.good,
            tally.bad
        );
    }
}
