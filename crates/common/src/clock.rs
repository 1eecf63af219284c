//! Run clock and per-frame timing.
//!
//! An analysis run is anchored to a monotonic epoch recorded when the
//! driver starts. The wall-clock time at that epoch is kept alongside so
//! result records can say when a run happened.

use std::time::{Duration, Instant};

/// A clock anchored to the moment an analysis run started.
#[derive(Debug, Clone)]
pub struct RunClock {
    /// The instant the run started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl RunClock {
    /// Create a new run clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seconds elapsed since the run started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at run start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Accumulates per-frame latency so a run can report its slowest frame
/// and the mean time spent waiting on the detector.
#[derive(Debug, Default)]
pub struct FrameTimer {
    started: Option<Instant>,
    samples: u64,
    total: Duration,
    slowest: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a timed section.
    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the current section and return its duration. Returns `None`
    /// when [`FrameTimer::begin`] was not called first.
    pub fn end(&mut self) -> Option<Duration> {
        let started = self.started.take()?;
        let elapsed = started.elapsed();
        self.record(elapsed);
        Some(elapsed)
    }

    /// Record an externally measured duration.
    pub fn record(&mut self, elapsed: Duration) {
        self.samples += 1;
        self.total += elapsed;
        self.slowest = self.slowest.max(elapsed);
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn slowest(&self) -> Duration {
        self.slowest
    }

    /// Mean duration over all recorded sections.
    pub fn mean(&self) -> Duration {
        if self.samples == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.samples);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
