//! Wall-Clock Timing
//!
//! A start/stop stopwatch over `std::time::Instant`, which is monotonic on
//! every supported platform.

use std::time::{Duration, Instant};

// ─── Stopwatch ───────────────────────────────────────────────────────────────

/// Records a start and a stop instant for one measurement
///
/// `start()` and `stop()` are expected once each, in that order. Out-of-order
/// use is not rejected: `elapsed()` then reports `Duration::ZERO` instead of
/// a negative interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch {
    start: Option<Instant>,
    stop: Option<Instant>,
}

impl Stopwatch {
    /// Create a stopwatch with neither instant recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stopwatch and start it immediately
    #[inline]
    pub fn started() -> Self {
        let mut watch = Self::new();
        watch.start();
        watch
    }

    /// Record the start instant
    #[inline(always)]
    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Record the stop instant
    #[inline(always)]
    pub fn stop(&mut self) {
        self.stop = Some(Instant::now());
    }

    /// Whether `start()` has been called and `stop()` has not
    pub fn is_running(&self) -> bool {
        self.start.is_some() && self.stop.is_none()
    }

    /// Interval between the recorded start and stop instants
    ///
    /// Zero when either instant is missing or stop precedes start.
    pub fn elapsed(&self) -> Duration {
        match (self.start, self.stop) {
            (Some(start), Some(stop)) => stop.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`
pub fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
