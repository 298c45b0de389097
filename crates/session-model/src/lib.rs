//! gazelog Session Model
//!
//! Defines the data contracts of a recording session:
//! - **Landmarks:** Per-frame normalized face-mesh points
//! - **Gaze:** Iris centers, eye-corner references, and direction labels
//! - **Events:** Gaze log lines appended while recording
//! - **Artifacts:** The log file, screenshot directory, and archive on disk
//!
//! Landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! source frame; everything derived from them is in frame pixels.

pub mod artifacts;
pub mod event;
pub mod gaze;
pub mod landmark;

pub use artifacts::*;
pub use event::*;
pub use gaze::*;
pub use landmark::*;
