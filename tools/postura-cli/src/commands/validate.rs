//! Validate a detection log and report how well it covers the joints the
//! classifiers need.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use postura_pose_model::{parse_detections, DetectionRecord, JointName, KeypointFrame};

#[derive(Debug, Default, Serialize)]
struct LogReport {
    frames: u64,
    frames_without_subjects: u64,
    frames_with_multiple_subjects: u64,
    /// Per joint, frames whose first subject reports it.
    coverage: Vec<JointCoverage>,
    /// Detector labels outside the classifier joint set.
    ignored_labels: BTreeSet<String>,
}

#[derive(Debug, Serialize)]
struct JointCoverage {
    joint: JointName,
    frames: u64,
}

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let records = load(&path)?;
    let report = build_report(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Validating detection log at: {}", path.display());
    println!("  Frames: {}", report.frames);
    println!("  Frames without subjects: {}", report.frames_without_subjects);
    println!(
        "  Frames with several subjects: {} (first subject analysed)",
        report.frames_with_multiple_subjects
    );

    println!("\nJoint coverage:");
    for entry in &report.coverage {
        let percent = if report.frames == 0 {
            0.0
        } else {
            entry.frames as f64 * 100.0 / report.frames as f64
        };
        println!(
            "  {:<15} {:>6} ({percent:5.1}%)",
            entry.joint.as_str(),
            entry.frames
        );
    }

    if !report.ignored_labels.is_empty() {
        let labels: Vec<_> = report.ignored_labels.iter().map(String::as_str).collect();
        println!("\nIgnored labels: {}", labels.join(", "));
    }

    println!("\nDetection log is valid.");
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Vec<DetectionRecord>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    parse_detections(&content).map_err(|e| anyhow::anyhow!("Invalid detection log: {e}"))
}

fn build_report(records: &[DetectionRecord]) -> LogReport {
    let mut report = LogReport::default();
    let mut seen = [0u64; JointName::COUNT];

    for record in records {
        report.frames += 1;
        match record.subjects.len() {
            0 => report.frames_without_subjects += 1,
            1 => {}
            _ => report.frames_with_multiple_subjects += 1,
        }

        let Some(subject) = record.subjects.first() else {
            continue;
        };
        for keypoint in &subject.keypoints {
            if JointName::from_name(&keypoint.name).is_none() {
                report.ignored_labels.insert(keypoint.name.clone());
            }
        }
        let frame = KeypointFrame::from_subject(subject, 0.0);
        for joint in JointName::ALL {
            if frame.contains(joint) {
                seen[joint.index()] += 1;
            }
        }
    }

    report.coverage = JointName::ALL
        .into_iter()
        .map(|joint| JointCoverage {
            joint,
            frames: seen[joint.index()],
        })
        .collect();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use postura_pose_model::{DetectedSubject, RawKeypoint};

    fn keypoint(name: &str) -> RawKeypoint {
        RawKeypoint {
            name: name.into(),
            x: 1.0,
            y: 2.0,
            score: Some(0.9),
        }
    }

    #[test]
    fn report_counts_coverage_from_first_subject() {
        let records = vec![
            DetectionRecord {
                frame: 0,
                subjects: vec![
                    DetectedSubject {
                        score: None,
                        keypoints: vec![keypoint("left_hip"), keypoint("nose")],
                    },
                    DetectedSubject {
                        score: None,
                        keypoints: vec![keypoint("right_hip")],
                    },
                ],
            },
            DetectionRecord {
                frame: 1,
                subjects: Vec::new(),
            },
        ];

        let report = build_report(&records);
        assert_eq!(report.frames, 2);
        assert_eq!(report.frames_without_subjects, 1);
        assert_eq!(report.frames_with_multiple_subjects, 1);
        assert!(report.ignored_labels.contains("nose"));

        let coverage = |joint: JointName| {
            report
                .coverage
                .iter()
                .find(|c| c.joint == joint)
                .map(|c| c.frames)
        };
        assert_eq!(coverage(JointName::LeftHip), Some(1));
        assert_eq!(coverage(JointName::RightHip), Some(0));
    }
}
