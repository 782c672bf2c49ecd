//! Configuration types for mask editing sessions

use crate::error::{MaskEditError, Result};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest brush diameter the editor stores
pub const MIN_BRUSH_DIAMETER: u32 = 1;
/// Largest brush diameter the editor stores
pub const MAX_BRUSH_DIAMETER: u32 = 400;
/// Smallest diameter a host slider should offer
pub const UI_MIN_BRUSH_DIAMETER: u32 = 3;
/// Largest diameter a host slider should offer
pub const UI_MAX_BRUSH_DIAMETER: u32 = 200;
/// Diameter a new session starts with
pub const DEFAULT_BRUSH_DIAMETER: u32 = 40;

/// Output image format options for the flattened result
///
/// Only lossless RGBA encodings are offered: the result carries the edited alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    #[default]
    Png,
    /// TIFF with alpha channel transparency and lossless compression
    Tiff,
    /// Raw RGBA8 pixel data (4 bytes per pixel)
    Rgba8,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Tiff => write!(f, "tiff"),
            Self::Rgba8 => write!(f, "rgba8"),
        }
    }
}

/// Resampling filter used when cover-scaling the background image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Configuration for an editing session
///
/// Colors are straight-alpha RGBA quadruples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Brush diameter every session starts with (1-400)
    pub default_brush_diameter: u32,

    /// Overlay drawn over removed regions in the preview
    pub tint_color: [u8; 4],

    /// Edge length of one checkerboard square in pixels
    pub checker_tile_size: u32,

    /// Checkerboard color of even squares
    pub checker_light: [u8; 4],

    /// Checkerboard color of odd squares
    pub checker_dark: [u8; 4],

    /// Cursor fill while erasing
    pub erase_cursor_color: [u8; 4],

    /// Cursor fill while restoring
    pub restore_cursor_color: [u8; 4],

    /// Alpha of the one-pixel ring drawn around the cursor fill (0 disables it)
    pub cursor_ring_alpha: u8,

    /// Filter used to cover-scale the background image
    pub background_filter: ResampleFilter,

    /// Encoding handed to the result sink on accept
    pub output_format: OutputFormat,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_brush_diameter: DEFAULT_BRUSH_DIAMETER,
            tint_color: [0, 0, 0, 128],
            checker_tile_size: 8,
            checker_light: [255, 255, 255, 255],
            checker_dark: [204, 204, 204, 255],
            erase_cursor_color: [239, 68, 68, 90],
            restore_cursor_color: [34, 197, 94, 90],
            cursor_ring_alpha: 200,
            background_filter: ResampleFilter::default(),
            output_format: OutputFormat::default(),
        }
    }
}

impl EditorConfig {
    /// Create a new configuration builder
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imgly_mask_editor::{EditorConfig, OutputFormat};
    ///
    /// let config = EditorConfig::builder()
    ///     .default_brush_diameter(24)
    ///     .output_format(OutputFormat::Tiff)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.default_brush_diameter, 24);
    /// ```
    #[must_use]
    pub fn builder() -> EditorConfigBuilder {
        EditorConfigBuilder::default()
    }

    /// Load and validate a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref)
            .map_err(|e| MaskEditError::file_io_error("read config file", path_ref, &e))?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a configuration from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    ///
    /// # Validation Rules
    ///
    /// - Default brush diameter: 1-400 (inclusive)
    /// - Checkerboard tile size: at least 1 pixel
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imgly_mask_editor::EditorConfig;
    ///
    /// let mut config = EditorConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.default_brush_diameter = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BRUSH_DIAMETER..=MAX_BRUSH_DIAMETER).contains(&self.default_brush_diameter) {
            return Err(MaskEditError::config_value_error(
                "default brush diameter",
                self.default_brush_diameter,
                "1-400",
                Some(DEFAULT_BRUSH_DIAMETER),
            ));
        }

        if self.checker_tile_size == 0 {
            return Err(MaskEditError::config_value_error(
                "checkerboard tile size",
                self.checker_tile_size,
                ">= 1",
                Some(8),
            ));
        }

        Ok(())
    }
}

/// Builder for `EditorConfig`
#[derive(Debug, Default)]
pub struct EditorConfigBuilder {
    config: EditorConfig,
}

impl EditorConfigBuilder {
    /// Set the initial brush diameter
    #[must_use]
    pub fn default_brush_diameter(mut self, diameter: u32) -> Self {
        self.config.default_brush_diameter = diameter;
        self
    }

    /// Set the removed-region tint
    #[must_use]
    pub fn tint_color(mut self, color: [u8; 4]) -> Self {
        self.config.tint_color = color;
        self
    }

    /// Set the checkerboard square size
    #[must_use]
    pub fn checker_tile_size(mut self, size: u32) -> Self {
        self.config.checker_tile_size = size;
        self
    }

    /// Set both checkerboard colors
    #[must_use]
    pub fn checker_colors(mut self, light: [u8; 4], dark: [u8; 4]) -> Self {
        self.config.checker_light = light;
        self.config.checker_dark = dark;
        self
    }

    /// Set the cursor fill colors for erase and restore mode
    #[must_use]
    pub fn cursor_colors(mut self, erase: [u8; 4], restore: [u8; 4]) -> Self {
        self.config.erase_cursor_color = erase;
        self.config.restore_cursor_color = restore;
        self
    }

    /// Set the cursor ring alpha
    #[must_use]
    pub fn cursor_ring_alpha(mut self, alpha: u8) -> Self {
        self.config.cursor_ring_alpha = alpha;
        self
    }

    /// Set the background resampling filter
    #[must_use]
    pub fn background_filter(mut self, filter: ResampleFilter) -> Self {
        self.config.background_filter = filter;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<EditorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
