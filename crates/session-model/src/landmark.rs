//! Face-mesh landmark sets.

use serde::{Deserialize, Serialize};

/// Number of points in a refined face mesh (468 face + 10 iris).
pub const FACE_MESH_POINTS: usize = 478;

/// Iris boundary points of the left eye.
pub const LEFT_IRIS: [usize; 4] = [474, 475, 476, 477];

/// Iris boundary points of the right eye.
pub const RIGHT_IRIS: [usize; 4] = [469, 470, 471, 472];

/// Corner points paired with [`LEFT_IRIS`].
pub const LEFT_EYE: [usize; 2] = [33, 133];

/// Corner points paired with [`RIGHT_IRIS`].
pub const RIGHT_EYE: [usize; 2] = [362, 263];

/// A single normalized landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X coordinate [0.0, 1.0].
    pub x: f64,
    /// Normalized Y coordinate [0.0, 1.0].
    pub y: f64,
    /// Relative depth; unused by the gaze heuristics.
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// All landmarks of one detected face, plus the frame size they refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    /// Source frame width in pixels.
    pub frame_width: u32,
    /// Source frame height in pixels.
    pub frame_height: u32,
    /// Points indexed by face-mesh position.
    pub points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(frame_width: u32, frame_height: u32, points: Vec<Landmark>) -> Self {
        Self {
            frame_width,
            frame_height,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Pixel X of a landmark, truncated toward zero.
    pub fn pixel_x(&self, index: usize) -> Option<i32> {
        self.get(index).map(|p| (p.x * self.frame_width as f64) as i32)
    }

    /// Pixel position of a landmark, truncated toward zero on both axes.
    pub fn pixel(&self, index: usize) -> Option<(i32, i32)> {
        self.get(index).map(|p| {
            (
                (p.x * self.frame_width as f64) as i32,
                (p.y * self.frame_height as f64) as i32,
            )
        })
    }
}
