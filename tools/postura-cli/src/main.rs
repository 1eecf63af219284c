//! Postura CLI: posture analysis from recorded pose detections.
//!
//! Usage:
//!   postura analyze --detections <LOG>   Run the frame pipeline over a detection log
//!   postura validate <LOG>               Check a detection log and report joint coverage
//!   postura angle <V> <A> <B>            Angle at vertex V between A and B
//!   postura config show|init             Show or write the configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use postura_common::config::AppConfig;
use postura_pose_model::Point2D;

mod commands;

#[derive(Parser)]
#[command(
    name = "postura",
    about = "Frame-by-frame posture analysis: slouching, desk sitting, and squat form",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a video from its recorded pose detections
    Analyze {
        /// Detection log (JSON lines, one record per frame)
        #[arg(short, long)]
        detections: PathBuf,

        /// Directory of frame images; a blank synthetic video is used when omitted
        #[arg(short, long)]
        frames: Option<PathBuf>,

        /// Synthetic frame width
        #[arg(long, default_value = "640")]
        width: u32,

        /// Synthetic frame height
        #[arg(long, default_value = "480")]
        height: u32,

        /// Write the analysis record to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat keypoints scored below this as missing [0.0, 1.0]
        #[arg(long)]
        min_score: Option<f64>,

        /// Config file to use instead of the standard location
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a detection log
    Validate {
        /// Path to the detection log
        path: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Measure the angle at a vertex joint, in degrees
    Angle {
        /// Vertex as `x,y`
        #[arg(value_parser = commands::angle::parse_point, allow_hyphen_values = true)]
        vertex: Point2D,

        /// First arm end as `x,y`
        #[arg(value_parser = commands::angle::parse_point, allow_hyphen_values = true)]
        a: Point2D,

        /// Second arm end as `x,y`
        #[arg(value_parser = commands::angle::parse_point, allow_hyphen_values = true)]
        b: Point2D,
    },

    /// Show or write the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration and where it is read from
    Show,

    /// Write a configuration file
    Init {
        /// Write here instead of the standard location
        #[arg(long)]
        path: Option<PathBuf>,

        /// Default minimum keypoint score [0.0, 1.0]
        #[arg(long)]
        min_score: Option<f64>,

        /// Directory for analysis result files
        #[arg(long)]
        results_dir: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging = AppConfig::load().logging;
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    logging.json |= cli.log_json;
    postura_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Analyze {
            detections,
            frames,
            width,
            height,
            output,
            min_score,
            config,
        } => {
            commands::analyze::run(commands::analyze::AnalyzeArgs {
                detections,
                frames,
                width,
                height,
                output,
                min_score,
                config,
            })
            .await
        }
        Commands::Validate { path, json } => commands::validate::run(path, json),
        Commands::Angle { vertex, a, b } => commands::angle::run(vertex, a, b),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Init {
                path,
                min_score,
                results_dir,
                force,
            } => commands::config::init(path, min_score, results_dir, force),
        },
    }
}
