//! Derived per-frame gaze geometry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Centroid of one eye's iris boundary, in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrisCenter {
    pub x: i32,
    pub y: i32,
}

impl IrisCenter {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel X of the two corners of one eye, in face-mesh index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EyeReference {
    pub first: i32,
    pub second: i32,
}

impl EyeReference {
    pub fn new(first: i32, second: i32) -> Self {
        Self { first, second }
    }
}

/// Coarse horizontal gaze direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GazeDirection {
    Left,
    Right,
    Center,
}

impl GazeDirection {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            GazeDirection::Left => "Looking Left",
            GazeDirection::Right => "Looking Right",
            GazeDirection::Center => "Looking Center",
        }
    }
}

impl fmt::Display for GazeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
