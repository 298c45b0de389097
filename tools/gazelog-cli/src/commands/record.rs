//! Record a gaze session.

use std::path::PathBuf;

use gazelog_capture_engine::{
    CommandScreenCapture, JsonlLandmarkStream, PassthroughProvider, RunSummary,
    ScreenshotAnnotator, SessionEngine, SessionRecorder, StopReason, TimestampFont,
};
use gazelog_common::clock::SystemClock;
use gazelog_common::config::AppConfig;
use gazelog_session_model::artifacts::ArtifactLayout;

use crate::signals;

/// Record until the stream ends or a signal arrives, then finalize.
/// Setup and finalize failures are reported; finalize always runs and the
/// command always succeeds.
pub async fn run(
    config: AppConfig,
    landmarks: Option<PathBuf>,
    screenshots: bool,
) -> anyhow::Result<()> {
    println!("Research Project - Eye Gaze Tracking");
    println!(
        "This program tracks your eye movements from a webcam landmark stream. \
         It saves the data to a CSV file and uploads it to a remote server."
    );
    println!(
        "Webcam warnings - 1. Make sure the webcam is connected and working. \
         2. Make sure the webcam is not being used by another application."
    );
    println!("Press Ctrl+C to stop the program");
    println!();

    let layout = ArtifactLayout::from(&config.artifacts);
    match layout.ensure_screenshots_dir() {
        Ok(true) => println!("Created directory: {}", layout.screenshots_dir.display()),
        Ok(false) => {}
        Err(e) => tracing::warn!(
            path = %layout.screenshots_dir.display(),
            error = %e,
            "Failed to create screenshot directory"
        ),
    }

    let shutdown = signals::spawn_listener();

    let annotator = if screenshots {
        annotator(&config, &layout)
    } else {
        None
    };

    let mut engine = SessionEngine::new(
        SystemClock,
        &config.cadence,
        SessionRecorder::new(&layout.log_file),
        annotator,
    );

    let mut provider = PassthroughProvider;
    let summary = match landmarks {
        Some(path) => match JsonlLandmarkStream::open(&path).await {
            Ok(mut source) => engine.run(&mut source, &mut provider, shutdown).await,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Cannot open landmark stream");
                println!("Error: {e}");
                RunSummary {
                    stop_reason: Some(StopReason::EndOfStream),
                    ..engine.summary()
                }
            }
        },
        None => {
            let mut source = JsonlLandmarkStream::stdin();
            engine.run(&mut source, &mut provider, shutdown).await
        }
    };

    if summary.stop_reason == Some(StopReason::EndOfStream) {
        println!("Landmark stream ended. Cleaning up...");
    }
    println!(
        "Frames: {}  Faces: {}  Logged: {}  Screenshots: {}",
        summary.frames, summary.faces, summary.events_logged, summary.screenshots
    );

    println!("Uploading CSV file...");
    super::finalize(&config, layout).await;

    Ok(())
}

fn annotator(config: &AppConfig, layout: &ArtifactLayout) -> Option<ScreenshotAnnotator> {
    let capture = match CommandScreenCapture::from_config(&config.screenshot) {
        Ok(capture) => capture,
        Err(e) => {
            tracing::error!(error = %e, "Screenshots disabled");
            println!("Screenshots disabled: {e}");
            return None;
        }
    };
    tracing::info!(program = capture.program(), "Screen capture ready");
    let font = TimestampFont::load(&config.screenshot.font_paths, config.screenshot.font_size);
    Some(ScreenshotAnnotator::new(
        Box::new(capture),
        font,
        &layout.screenshots_dir,
    ))
}
