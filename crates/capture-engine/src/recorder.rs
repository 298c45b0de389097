//! Append-only gaze log writer.
//!
//! Every append opens the file, writes one line and closes it again, so a
//! crash never loses lines that were already appended.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use gazelog_common::error::{GazeError, GazeResult};
use gazelog_session_model::event::GazeEvent;

/// Writes gaze events to the session log.
#[derive(Debug)]
pub struct SessionRecorder {
    path: PathBuf,
    events_written: u64,
}

impl SessionRecorder {
    /// Create a recorder for `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            events_written: 0,
        }
    }

    /// Append a single event as one line.
    pub fn append(&mut self, event: &GazeEvent) -> GazeResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                GazeError::recorder(format!("Failed to open {}: {e}", self.path.display()))
            })?;

        writeln!(file, "{}", event.to_line())
            .map_err(|e| GazeError::recorder(format!("Failed to write event: {e}")))?;
        file.flush()
            .map_err(|e| GazeError::recorder(format!("Failed to flush event: {e}")))?;

        self.events_written += 1;
        Ok(())
    }

    /// Number of events appended by this recorder.
    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
