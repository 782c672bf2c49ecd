//! Core types for mask editing sessions

use crate::config::{MAX_BRUSH_DIAMETER, MIN_BRUSH_DIAMETER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Active brush behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Strokes remove pixels from the kept foreground
    #[default]
    Erase,
    /// Strokes bring previously removed pixels back
    Restore,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Erase => write!(f, "erase"),
            Self::Restore => write!(f, "restore"),
        }
    }
}

impl FromStr for EditMode {
    type Err = crate::error::MaskEditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "erase" => Ok(Self::Erase),
            "restore" => Ok(Self::Restore),
            other => Err(crate::error::MaskEditError::invalid_config(format!(
                "Unknown edit mode '{}' (expected 'erase' or 'restore')",
                other
            ))),
        }
    }
}

/// Pointer position in mask pixel space (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Session lifecycle
///
/// `Uninitialized -> Ready <-> Gesturing -> Accepted | Cancelled`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Image and cutout not loaded yet
    Uninitialized,
    /// Buffers loaded, no gesture in progress
    Ready,
    /// A pointer drag is accumulating into the stroke buffer
    Gesturing,
    /// Flattened result handed to the sink
    Accepted,
    /// Session discarded without output
    Cancelled,
}

impl SessionState {
    /// Whether buffers are loaded and edits are possible
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Ready | Self::Gesturing)
    }

    /// Whether the session has ended
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Cancelled)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Gesturing => "gesturing",
            Self::Accepted => "accepted",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Per-session brush and pointer state
#[derive(Debug, Clone, PartialEq)]
pub struct EditState {
    /// Active brush mode
    pub mode: EditMode,
    brush_diameter: u32,
    /// Where the cursor indicator is drawn, `None` when the pointer is outside
    pub hover: Option<Point>,
}

impl EditState {
    /// Fresh state: erase mode with the given default diameter
    #[must_use]
    pub fn new(default_brush_diameter: u32) -> Self {
        Self {
            mode: EditMode::Erase,
            brush_diameter: clamp_brush_diameter(i64::from(default_brush_diameter)),
            hover: None,
        }
    }

    #[must_use]
    pub fn brush_diameter(&self) -> u32 {
        self.brush_diameter
    }

    #[must_use]
    pub fn brush_radius(&self) -> f32 {
        self.brush_diameter as f32 / 2.0
    }

    /// Store a new diameter clamped to the supported range, returning the stored value
    pub fn set_brush_diameter(&mut self, diameter: i64) -> u32 {
        self.brush_diameter = clamp_brush_diameter(diameter);
        self.brush_diameter
    }
}

fn clamp_brush_diameter(diameter: i64) -> u32 {
    diameter.clamp(i64::from(MIN_BRUSH_DIAMETER), i64::from(MAX_BRUSH_DIAMETER)) as u32
}

/// Statistics about mask coverage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStatistics {
    pub total_pixels: usize,
    /// Pixels with any coverage
    pub covered_pixels: usize,
    /// Pixels with full coverage
    pub opaque_pixels: usize,
    /// Pixels with no coverage
    pub transparent_pixels: usize,
    pub coverage_ratio: f32,
}
