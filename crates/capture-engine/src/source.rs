//! Frame intake.
//!
//! The face-mesh detector runs outside gazelog and streams one JSON object
//! per video frame:
//!
//! ```text
//! {"frame_width":640,"frame_height":480,"landmarks":[{"x":0.41,"y":0.52}, ...]}
//! {"frame_width":640,"frame_height":480,"landmarks":null}
//! ```
//!
//! `landmarks` is `null` (or absent) when no face was found.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use gazelog_common::error::{GazeError, GazeResult};
use gazelog_session_model::landmark::{Landmark, LandmarkSet};

/// Supplies raw frames one at a time.
#[async_trait]
pub trait FrameSource: Send {
    type Frame: Send;

    /// Next frame, or `None` at end of stream.
    async fn next_frame(&mut self) -> GazeResult<Option<Self::Frame>>;
}

/// Extracts the landmarks of a single face from a frame.
pub trait LandmarkProvider<F>: Send {
    /// `None` if no face is present.
    fn detect(&mut self, frame: &F) -> Option<LandmarkSet>;
}

/// One line of the detector stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

impl LandmarkFrame {
    /// A frame without a detected face.
    pub fn absent(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            landmarks: None,
        }
    }
}

/// Reads [`LandmarkFrame`]s from JSON Lines.
///
/// Blank lines and `#` comments are skipped. A line that does not parse is
/// logged and yielded as a frame without a face.
pub struct JsonlLandmarkStream<R> {
    reader: R,
    line: String,
    line_no: usize,
}

impl<R> JsonlLandmarkStream<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
        }
    }

    /// Lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl JsonlLandmarkStream<BufReader<tokio::io::Stdin>> {
    /// Stream frames from standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl JsonlLandmarkStream<BufReader<tokio::fs::File>> {
    /// Stream frames from a file.
    pub async fn open(path: &Path) -> GazeResult<Self> {
        if !path.exists() {
            return Err(GazeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

#[async_trait]
impl<R> FrameSource for JsonlLandmarkStream<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    type Frame = LandmarkFrame;

    async fn next_frame(&mut self) -> GazeResult<Option<LandmarkFrame>> {
        loop {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line).await?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return match serde_json::from_str::<LandmarkFrame>(trimmed) {
                Ok(frame) => Ok(Some(frame)),
                Err(e) => {
                    tracing::warn!(line = self.line_no, error = %e, "Malformed landmark frame");
                    Ok(Some(LandmarkFrame::absent(0, 0)))
                }
            };
        }
    }
}

/// Provider for frames that already carry detector output.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughProvider;

impl LandmarkProvider<LandmarkFrame> for PassthroughProvider {
    fn detect(&mut self, frame: &LandmarkFrame) -> Option<LandmarkSet> {
        let points = frame.landmarks.as_ref()?;
        if points.is_empty() {
            return None;
        }
        Some(LandmarkSet::new(
            frame.frame_width,
            frame.frame_height,
            points.clone(),
        ))
    }
}
