//! Show or write the configuration file.

use std::path::{Path, PathBuf};

use postura_common::config::{config_file_path, AppConfig};

pub fn show() -> anyhow::Result<()> {
    let path = config_file_path();
    let config = AppConfig::load();

    if path.exists() {
        println!("Config file: {}", path.display());
    } else {
        println!("Config file: {} (absent, using defaults)", path.display());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub fn init(
    path: Option<PathBuf>,
    min_score: Option<f64>,
    results_dir: Option<PathBuf>,
    force: bool,
) -> anyhow::Result<()> {
    let config = build(min_score, results_dir);
    let written = write(&config, path.as_deref(), force)?;
    println!("Wrote configuration to {}", written.display());
    Ok(())
}

fn build(min_score: Option<f64>, results_dir: Option<PathBuf>) -> AppConfig {
    let mut config = AppConfig::default();
    if let Some(score) = min_score {
        config.analysis.min_keypoint_score = score;
    }
    config.analysis.results_dir = results_dir;
    config
}

fn write(config: &AppConfig, path: Option<&Path>, force: bool) -> anyhow::Result<PathBuf> {
    let target = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }

    let result = match path {
        Some(path) => config.save_to(path).map(|()| path.to_path_buf()),
        None => config.save(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))
}
