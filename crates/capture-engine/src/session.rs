//! The per-frame recording loop.

use std::path::PathBuf;

use tokio::sync::watch;

use gazelog_common::clock::WallClock;
use gazelog_common::config::CadenceConfig;
use gazelog_common::error::{GazeError, GazeResult};
use gazelog_processing_core::cadence::CadenceController;
use gazelog_processing_core::classifier::classify;
use gazelog_processing_core::geometry::EyeGeometry;
use gazelog_session_model::event::GazeEvent;
use gazelog_session_model::gaze::GazeDirection;
use gazelog_session_model::landmark::LandmarkSet;

use crate::recorder::SessionRecorder;
use crate::screenshot::ScreenshotAnnotator;
use crate::source::{FrameSource, LandmarkProvider};

/// What happened to a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No face detected; nothing downstream ran.
    NoFace,
    /// A face was processed.
    Face {
        direction: GazeDirection,
        /// A gaze event was appended to the log.
        logged: bool,
        /// Path of the screenshot taken on this frame, if any.
        screenshot: Option<PathBuf>,
    },
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    Shutdown,
}

/// Counters for a finished (or running) loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub faces: u64,
    pub events_logged: u64,
    pub screenshots: u64,
    pub stop_reason: Option<StopReason>,
}

/// Owns all per-session mutable state: both cadence limiters, the log
/// recorder and the screenshot annotator.
pub struct SessionEngine<C> {
    clock: C,
    cadence: CadenceController,
    recorder: SessionRecorder,
    annotator: Option<ScreenshotAnnotator>,
    summary: RunSummary,
}

impl<C: WallClock> SessionEngine<C> {
    /// Create an engine. Without an annotator screenshot triggers are
    /// counted by the cadence but nothing is captured.
    pub fn new(
        clock: C,
        cadence: &CadenceConfig,
        recorder: SessionRecorder,
        annotator: Option<ScreenshotAnnotator>,
    ) -> Self {
        Self {
            clock,
            cadence: CadenceController::new(cadence),
            recorder,
            annotator,
            summary: RunSummary::default(),
        }
    }

    /// Process one frame's detector result.
    ///
    /// Log and screenshot I/O failures are logged and do not fail the
    /// frame. A landmark set lacking the iris or eye-corner points is an
    /// error and leaves the cadence untouched.
    ///
    /// Blocking: log appends use `std::fs` and screenshots wait for the
    /// grabber process to exit.
    pub fn process_frame(&mut self, landmarks: Option<&LandmarkSet>) -> GazeResult<FrameOutcome> {
        self.summary.frames += 1;

        let Some(landmarks) = landmarks else {
            return Ok(FrameOutcome::NoFace);
        };

        let geometry = EyeGeometry::from_landmarks(landmarks).ok_or_else(|| {
            GazeError::landmarks(format!(
                "landmark set of {} points lacks iris or eye-corner indices",
                landmarks.len()
            ))
        })?;
        self.summary.faces += 1;

        let direction = classify(&geometry);
        let now = self.clock.now();
        let decision = self.cadence.observe(now);

        tracing::debug!(
            gaze = %direction,
            left_x = geometry.left_iris.x,
            left_y = geometry.left_iris.y,
            right_x = geometry.right_iris.x,
            right_y = geometry.right_iris.y,
            "Face frame"
        );

        let mut logged = false;
        if decision.log {
            match self
                .recorder
                .append(&GazeEvent::new(now, geometry.left_iris))
            {
                Ok(()) => {
                    logged = true;
                    self.summary.events_logged += 1;
                }
                Err(e) => tracing::warn!(error = %e, "Failed to append gaze event"),
            }
        }

        let mut screenshot = None;
        if decision.screenshot {
            if let Some(annotator) = self.annotator.as_mut() {
                match annotator.capture(now) {
                    Ok(path) => {
                        screenshot = Some(path);
                        self.summary.screenshots += 1;
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to capture screenshot"),
                }
            }
        }

        Ok(FrameOutcome::Face {
            direction,
            logged,
            screenshot,
        })
    }

    /// Pull frames until the source ends or `shutdown` turns true.
    ///
    /// Frames are processed one at a time on the caller's task; the
    /// shutdown signal is only observed between frames, so a frame is
    /// never cut short.
    ///
    /// [`process_frame`](Self::process_frame) blocks the worker thread
    /// while it appends to the log and runs the screen grabber. Drive this
    /// on a multi-thread runtime so other tasks, such as the signal
    /// listener, keep running.
    pub async fn run<S, P>(
        &mut self,
        source: &mut S,
        provider: &mut P,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunSummary
    where
        S: FrameSource,
        P: LandmarkProvider<S::Frame>,
    {
        tracing::info!("Session loop started");

        let reason = loop {
            let next = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break StopReason::Shutdown,
                next = source.next_frame() => next,
            };

            let frame = match next {
                Ok(Some(frame)) => frame,
                Ok(None) => break StopReason::EndOfStream,
                Err(e) => {
                    tracing::warn!(error = %e, "Frame source failed, ending session");
                    break StopReason::EndOfStream;
                }
            };

            let landmarks = provider.detect(&frame);
            if let Err(e) = self.process_frame(landmarks.as_ref()) {
                tracing::warn!(error = %e, "Skipping frame");
            }
        };

        self.summary.stop_reason = Some(reason);
        tracing::info!(
            ?reason,
            frames = self.summary.frames,
            faces = self.summary.faces,
            events = self.summary.events_logged,
            screenshots = self.summary.screenshots,
            "Session loop stopped"
        );
        self.summary
    }

    /// Counters so far.
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn cadence(&self) -> &CadenceController {
        &self.cadence
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }
}

/// Resolves once shutdown is requested. A dropped sender means no request
/// can arrive any more, so the future then never resolves.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
