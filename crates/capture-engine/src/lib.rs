//! gazelog Capture Engine
//!
//! Runs the live recording loop: landmark frames come in one at a time,
//! are reduced to gaze geometry, and drive the gaze log and the periodic
//! screenshots.
//!
//! # Architecture
//!
//! ```text
//! FrameSource ──▶ LandmarkProvider ──▶ EyeGeometry ──▶ classify
//!                                           │
//!                                           ▼
//!                                   CadenceController
//!                                      │         │
//!                                      ▼         ▼
//!                           SessionRecorder   ScreenshotAnnotator
//!                           (gaze log)        (screenshots/*.png)
//! ```
//!
//! Everything mutable lives in one [`SessionEngine`]; there is no global
//! state, and the clock is injected.

pub mod recorder;
pub mod screenshot;
pub mod session;
pub mod source;

pub use recorder::SessionRecorder;
pub use screenshot::{CommandScreenCapture, ScreenCapture, ScreenshotAnnotator, TimestampFont};
pub use session::*;
pub use source::{
    FrameSource, JsonlLandmarkStream, LandmarkFrame, LandmarkProvider, PassthroughProvider,
};
