//! Postura Common Utilities
//!
//! Shared infrastructure for all Postura crates:
//! - Error types and result aliases
//! - Run clock and per-frame timing
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
