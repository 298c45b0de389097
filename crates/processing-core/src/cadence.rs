//! Rate limits for the two recurring session actions.
//!
//! The log limiter is driven by wall-clock time so it behaves the same at
//! any frame rate. The screenshot limiter counts face frames. The two
//! share no state.

use chrono::{DateTime, Local};
use gazelog_common::clock::RateController;
use gazelog_common::config::CadenceConfig;

/// Wall-clock limiter for gaze log lines.
#[derive(Debug)]
pub struct LogCadence {
    controller: RateController,
}

impl LogCadence {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            controller: RateController::new(interval_ms),
        }
    }

    /// True if a log line may be written at `now`. The first call fires.
    pub fn should_log(&mut self, now: DateTime<Local>) -> bool {
        self.controller.should_tick(now)
    }

    /// Instant of the last permitted log line.
    pub fn last_log_instant(&self) -> Option<DateTime<Local>> {
        self.controller.last_tick()
    }
}

/// Face-frame counter for screenshots.
///
/// A frame that finds the counter at `threshold` triggers and resets it;
/// otherwise the counter increments. With a threshold of 300 a trigger
/// therefore happens on every 301st face frame.
#[derive(Debug)]
pub struct ScreenshotCadence {
    counter: u32,
    threshold: u32,
}

impl ScreenshotCadence {
    pub fn new(threshold: u32) -> Self {
        Self {
            counter: 0,
            threshold,
        }
    }

    /// Observe one face frame; true if a screenshot is due.
    pub fn observe_face_frame(&mut self) -> bool {
        if self.counter >= self.threshold {
            self.counter = 0;
            true
        } else {
            self.counter += 1;
            false
        }
    }

    /// Current counter value.
    pub fn counter(&self) -> u32 {
        self.counter
    }
}

/// Decisions for a single face frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CadenceDecision {
    pub log: bool,
    pub screenshot: bool,
}

/// Both limiters, advanced together once per face frame.
#[derive(Debug)]
pub struct CadenceController {
    log: LogCadence,
    screenshot: ScreenshotCadence,
}

impl CadenceController {
    pub fn new(config: &CadenceConfig) -> Self {
        Self {
            log: LogCadence::new(config.log_interval_ms),
            screenshot: ScreenshotCadence::new(config.screenshot_frame_threshold),
        }
    }

    /// Advance both limiters for a face frame seen at `now`.
    pub fn observe(&mut self, now: DateTime<Local>) -> CadenceDecision {
        CadenceDecision {
            log: self.log.should_log(now),
            screenshot: self.screenshot.observe_face_frame(),
        }
    }

    pub fn log(&self) -> &LogCadence {
        &self.log
    }

    pub fn screenshot(&self) -> &ScreenshotCadence {
        &self.screenshot
    }
}

impl Default for CadenceController {
    fn default() -> Self {
        Self::new(&CadenceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at_ms(ms: i64) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn test_log_cadence_example_sequence() {
        let mut cadence = LogCadence::new(200);
        let fired: Vec<i64> = [0, 100, 250, 260, 460]
            .into_iter()
            .filter(|&t| cadence.should_log(at_ms(t)))
            .collect();
        assert_eq!(fired, vec![0, 250, 460]);
        assert_eq!(cadence.last_log_instant(), Some(at_ms(460)));
    }

    #[test]
    fn test_screenshot_first_trigger_on_301st_frame() {
        let mut cadence = ScreenshotCadence::new(300);
        for _ in 0..300 {
            assert!(!cadence.observe_face_frame());
        }
        assert_eq!(cadence.counter(), 300);
        assert!(cadence.observe_face_frame());
        assert_eq!(cadence.counter(), 0);
    }

    #[test]
    fn test_zero_threshold_fires_every_frame() {
        let mut cadence = ScreenshotCadence::new(0);
        assert!(cadence.observe_face_frame());
        assert!(cadence.observe_face_frame());
    }

    #[test]
    fn test_controller_advances_both_limiters() {
        let mut ctrl = CadenceController::default();
        let first = ctrl.observe(at_ms(0));
        assert_eq!(
            first,
            CadenceDecision {
                log: true,
                screenshot: false
            }
        );
        let second = ctrl.observe(at_ms(10));
        assert!(!second.log);
        assert_eq!(ctrl.screenshot().counter(), 2);
    }
}
