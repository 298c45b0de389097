//! Wall clock abstraction and rate limiting.
//!
//! Gaze events are stamped with local wall-clock time, and the log
//! cadence is measured against the same clock. Engines take a
//! [`WallClock`] so tests can drive time explicitly.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local};

/// Source of the current wall-clock instant.
pub trait WallClock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A manually driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Local>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance_ms(&self, ms: i64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += Duration::milliseconds(ms);
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Interval-based rate limiter over wall-clock instants.
#[derive(Debug)]
pub struct RateController {
    interval: Duration,
    last_tick: Option<DateTime<Local>>,
}

impl RateController {
    /// Create a controller that fires at most once per `interval_ms`.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::milliseconds(interval_ms as i64),
            last_tick: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, now: DateTime<Local>) -> bool {
        match self.last_tick {
            None => {
                self.last_tick = Some(now);
                true
            }
            Some(last) if now - last >= self.interval => {
                self.last_tick = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Instant of the last tick, if any.
    pub fn last_tick(&self) -> Option<DateTime<Local>> {
        self.last_tick
    }

    /// Configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
