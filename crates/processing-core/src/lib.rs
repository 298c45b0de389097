//! gazelog Processing Core
//!
//! Turns one frame's landmarks into gaze decisions:
//! - **Geometry:** Iris centers and eye-corner references in frame pixels
//! - **Classifier:** Coarse left/center/right gaze direction
//! - **Cadence:** Rate limits for log writes and screenshots
//!
//! This crate is pure computation with no I/O.
//! All inputs are data; all outputs are data.

pub mod cadence;
pub mod classifier;
pub mod geometry;

pub use cadence::{CadenceController, CadenceDecision, LogCadence, ScreenshotCadence};
pub use classifier::classify;
pub use geometry::EyeGeometry;
