//! Timestamped full-screen screenshots.

use std::path::{Path, PathBuf};
use std::process::Command;

use ab_glyph::{FontVec, PxScale};
use chrono::{DateTime, Local};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use gazelog_common::config::ScreenshotConfig;
use gazelog_common::error::{GazeError, GazeResult};

/// Overlay timestamp format.
pub const OVERLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TEXT_ORIGIN: (i32, i32) = (10, 10);
const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Produces a full-screen raster image on demand.
pub trait ScreenCapture: Send {
    fn capture_screen(&mut self) -> GazeResult<RgbaImage>;
}

/// Grabs the screen by running an external program that writes a PNG to
/// stdout.
#[derive(Debug, Clone)]
pub struct CommandScreenCapture {
    program: String,
    args: Vec<String>,
}

impl CommandScreenCapture {
    /// Use an explicit argv.
    pub fn new(argv: Vec<String>) -> GazeResult<Self> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .ok_or_else(|| GazeError::config("Screen capture command is empty"))?;
        Ok(Self {
            program,
            args: argv.collect(),
        })
    }

    /// Pick a grabber for the current platform and display server.
    pub fn detect() -> Self {
        let argv: &[&str] = if cfg!(target_os = "macos") {
            &["screencapture", "-x", "-t", "png", "/dev/stdout"]
        } else if std::env::var("WAYLAND_DISPLAY").is_ok() {
            &["grim", "-"]
        } else {
            &["import", "-window", "root", "png:-"]
        };
        Self {
            program: argv[0].to_string(),
            args: argv[1..].iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Configured argv if present, autodetected otherwise.
    pub fn from_config(config: &ScreenshotConfig) -> GazeResult<Self> {
        match &config.capture_command {
            Some(argv) => Self::new(argv.clone()),
            None => Ok(Self::detect()),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ScreenCapture for CommandScreenCapture {
    fn capture_screen(&mut self) -> GazeResult<RgbaImage> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| GazeError::screenshot(format!("Failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(GazeError::screenshot(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let image = image::load_from_memory(&output.stdout)
            .map_err(|e| GazeError::screenshot(format!("Failed to decode screen grab: {e}")))?;
        Ok(image.to_rgba8())
    }
}

/// Font used for the timestamp overlay.
pub enum TimestampFont {
    /// A TrueType/OpenType font rendered at `size` pixels.
    TrueType { font: FontVec, size: f32 },
    /// Built-in 5x7 glyphs, each dot drawn as a `scale`-sized square.
    Bitmap { scale: u32 },
}

impl TimestampFont {
    /// Load the first usable font among `candidates`, falling back to the
    /// built-in glyphs.
    pub fn load(candidates: &[PathBuf], size: f32) -> Self {
        for path in candidates {
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(_) => continue,
            };
            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), "Loaded overlay font");
                    return Self::TrueType { font, size };
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Unusable overlay font");
                }
            }
        }
        tracing::info!("No overlay font found, using built-in glyphs");
        Self::bitmap(size)
    }

    /// Built-in glyphs sized to roughly match a `size`-pixel font.
    pub fn bitmap(size: f32) -> Self {
        let scale = (size / GLYPH_HEIGHT as f32).round().max(1.0) as u32;
        Self::Bitmap { scale }
    }

    /// Draw `text` with its top-left corner at (x, y).
    pub fn draw(&self, image: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
        match self {
            Self::TrueType { font, size } => {
                draw_text_mut(image, color, x, y, PxScale::from(*size), font, text);
            }
            Self::Bitmap { scale } => draw_bitmap_text(image, x, y, *scale, color, text),
        }
    }
}

impl std::fmt::Debug for TimestampFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrueType { size, .. } => f.debug_struct("TrueType").field("size", size).finish(),
            Self::Bitmap { scale } => f.debug_struct("Bitmap").field("scale", scale).finish(),
        }
    }
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// Rows of a 5x7 glyph, bit 4 is the leftmost column.
/// Only the characters of a timestamp are covered.
fn glyph(ch: char) -> [u8; 7] {
    match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        _ => [0x00; 7],
    }
}

fn draw_bitmap_text(image: &mut RgbaImage, x: i32, y: i32, scale: u32, color: Rgba<u8>, text: &str) {
    let advance = ((GLYPH_WIDTH + 1) * scale) as i32;
    for (i, ch) in text.chars().enumerate() {
        let origin_x = x + i as i32 * advance;
        for (row, &bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 1 {
                    let rect = Rect::at(
                        origin_x + (col * scale) as i32,
                        y + (row as u32 * scale) as i32,
                    )
                    .of_size(scale, scale);
                    draw_filled_rect_mut(image, rect, color);
                }
            }
        }
    }
}

/// Stamp `text` onto the image: two offset black copies for an outline,
/// then the white text on top.
pub fn annotate(image: &mut RgbaImage, font: &TimestampFont, text: &str) {
    let (x, y) = TEXT_ORIGIN;
    font.draw(image, x + 1, y + 1, OUTLINE_COLOR, text);
    font.draw(image, x - 1, y - 1, OUTLINE_COLOR, text);
    font.draw(image, x, y, TEXT_COLOR, text);
}

/// File name for a screenshot taken at `now`.
pub fn screenshot_file_name(now: DateTime<Local>) -> String {
    format!("screenshot_{}.png", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Captures, timestamps and stores screenshots in one directory.
pub struct ScreenshotAnnotator {
    capture: Box<dyn ScreenCapture>,
    font: TimestampFont,
    dir: PathBuf,
    captured: u64,
}

impl ScreenshotAnnotator {
    pub fn new(capture: Box<dyn ScreenCapture>, font: TimestampFont, dir: impl Into<PathBuf>) -> Self {
        Self {
            capture,
            font,
            dir: dir.into(),
            captured: 0,
        }
    }

    /// Grab the screen, stamp it with `now` and save it. Returns the file path.
    pub fn capture(&mut self, now: DateTime<Local>) -> GazeResult<PathBuf> {
        let mut image = self.capture.capture_screen()?;
        annotate(
            &mut image,
            &self.font,
            &now.format(OVERLAY_TIMESTAMP_FORMAT).to_string(),
        );

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(screenshot_file_name(now));
        image
            .save(&path)
            .map_err(|e| GazeError::screenshot(format!("Failed to save {}: {e}", path.display())))?;

        self.captured += 1;
        tracing::info!(path = %path.display(), "Screenshot saved");
        Ok(path)
    }

    /// Screenshots saved by this annotator.
    pub fn captured(&self) -> u64 {
        self.captured
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
