//! Postura Analysis Core
//!
//! Turns one frame's keypoints into posture verdicts and folds verdicts
//! into running tallies:
//! - **Geometry:** Angle at a vertex joint between two adjacent joints
//! - **Classifiers:** Slouch, desk-sitting neck angle, and squat form rules
//! - **Aggregator:** Good/bad counters per posture kind
//!
//! This crate is pure computation: no I/O, no async, no detector.
//! All inputs are data; all outputs are data.

pub mod aggregate;
pub mod classify;
pub mod geometry;

pub use aggregate::Aggregator;
pub use classify::{ClassifierSet, PostureClassifier, PostureThresholds};
pub use geometry::{angle_at, DegenerateGeometry};
