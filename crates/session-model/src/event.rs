//! Gaze log events.
//!
//! The session log is a plain text file with one event per line:
//!
//! ```text
//! (412, 233), "2026-01-01 12:00:00.250000"
//! ```
//!
//! The pair is the left iris center in frame pixels; the quoted value is
//! the local wall-clock time the event was recorded.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::gaze::IrisCenter;

/// Timestamp format used inside log lines.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A single gaze log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazeEvent {
    /// Wall-clock instant the event was emitted.
    pub timestamp: DateTime<Local>,

    /// Left iris center at that instant.
    pub left_iris_center: IrisCenter,
}

/// Errors reading a gaze log back.
#[derive(Debug, thiserror::Error)]
pub enum LogParseError {
    #[error("line {line}: malformed iris coordinates in {content:?}")]
    Coordinates { line: usize, content: String },

    #[error("line {line}: malformed timestamp in {content:?}")]
    Timestamp { line: usize, content: String },
}

impl GazeEvent {
    pub fn new(timestamp: DateTime<Local>, left_iris_center: IrisCenter) -> Self {
        Self {
            timestamp,
            left_iris_center,
        }
    }

    /// Render the event as a log line (without trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "({}, {}), \"{}\"",
            self.left_iris_center.x,
            self.left_iris_center.y,
            self.timestamp.format(LOG_TIMESTAMP_FORMAT)
        )
    }

    /// Parse a single log line. `line_no` is only used for error messages.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self, LogParseError> {
        let coords_err = || LogParseError::Coordinates {
            line: line_no,
            content: line.to_string(),
        };
        let ts_err = || LogParseError::Timestamp {
            line: line_no,
            content: line.to_string(),
        };

        let rest = line.trim().strip_prefix('(').ok_or_else(coords_err)?;
        let (pair, rest) = rest.split_once(')').ok_or_else(coords_err)?;
        let (x, y) = pair.split_once(',').ok_or_else(coords_err)?;
        let x = x.trim().parse::<i32>().map_err(|_| coords_err())?;
        let y = y.trim().parse::<i32>().map_err(|_| coords_err())?;

        let quoted = rest
            .trim_start()
            .strip_prefix(',')
            .map(str::trim)
            .ok_or_else(ts_err)?;
        let raw = quoted
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .ok_or_else(ts_err)?;
        let timestamp = parse_local_timestamp(raw).ok_or_else(ts_err)?;

        Ok(Self::new(timestamp, IrisCenter::new(x, y)))
    }
}

fn parse_local_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Parse a whole log file, skipping blank lines.
pub fn parse_log(content: &str) -> Result<Vec<GazeEvent>, LogParseError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| GazeEvent::parse_line(line, i + 1))
        .collect()
}
