//! Live preview compositing
//!
//! Builds the displayed frame, back to front:
//!
//! 1. cover-scaled background, or a checkerboard when none is set
//! 2. dark tint over everything the mask does not keep
//! 3. while restoring, the tint is also lifted under the active stroke
//! 4. original image limited to the mask
//! 5. while gesturing, the stroke previewed against that image
//!    (erase cuts it away, restore layers the stroke-limited original on top)
//! 6. the result over the tinted background
//! 7. the brush cursor at the hover position
//!
//! Rendering only reads the mask and stroke buffer. Scratch surfaces are
//! allocated once per session and reused by every frame.

use crate::config::EditorConfig;
use crate::mask::Mask;
use crate::raster::{brush, scale, Compositing};
use crate::stroke::StrokeBuffer;
use crate::types::{EditMode, EditState};
use image::{Rgba, RgbaImage};

/// Read-only view of everything a frame depends on
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub image: &'a RgbaImage,
    pub mask: &'a Mask,
    pub stroke: &'a StrokeBuffer,
    /// Already cover-scaled to the canvas
    pub background: Option<&'a RgbaImage>,
    pub edit: &'a EditState,
    pub gesturing: bool,
}

/// Frame builder owning the per-session scratch surfaces
#[derive(Debug, Clone)]
pub struct Compositor {
    frame: RgbaImage,
    tint: RgbaImage,
    scratch: RgbaImage,
    restore_scratch: RgbaImage,
    checkerboard: RgbaImage,
    tint_color: Rgba<u8>,
    erase_cursor: Rgba<u8>,
    restore_cursor: Rgba<u8>,
    ring_alpha: u8,
}

impl Compositor {
    #[must_use]
    pub fn new(width: u32, height: u32, config: &EditorConfig) -> Self {
        Self {
            frame: RgbaImage::new(width, height),
            tint: RgbaImage::new(width, height),
            scratch: RgbaImage::new(width, height),
            restore_scratch: RgbaImage::new(width, height),
            checkerboard: scale::checkerboard(
                width,
                height,
                config.checker_tile_size,
                Rgba(config.checker_light),
                Rgba(config.checker_dark),
            ),
            tint_color: Rgba(config.tint_color),
            erase_cursor: Rgba(config.erase_cursor_color),
            restore_cursor: Rgba(config.restore_cursor_color),
            ring_alpha: config.cursor_ring_alpha,
        }
    }

    /// The most recently rendered frame
    #[must_use]
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Recompose the frame from the current inputs
    pub fn render(&mut self, inputs: &FrameInputs<'_>) -> &RgbaImage {
        let stroke = inputs.stroke.raster();
        let stroke_region = inputs.stroke.dirty_region();
        let preview = if inputs.gesturing { Some(inputs.edit.mode) } else { None };

        self.frame
            .copy_pixels_from(inputs.background.unwrap_or(&self.checkerboard));

        self.tint.fill_solid(self.tint_color);
        self.tint.subtract_coverage(inputs.mask.raster());
        if preview == Some(EditMode::Restore) {
            self.tint.subtract_coverage_in(stroke, stroke_region);
        }
        self.frame.paint_over(&self.tint);

        self.scratch.copy_pixels_from(inputs.image);
        self.scratch.intersect_coverage(inputs.mask.raster());
        match preview {
            Some(EditMode::Erase) => self.scratch.subtract_coverage_in(stroke, stroke_region),
            Some(EditMode::Restore) => {
                self.restore_scratch.copy_pixels_from(inputs.image);
                self.restore_scratch.intersect_coverage(stroke);
                self.scratch.paint_over_in(&self.restore_scratch, stroke_region);
            },
            None => {},
        }
        self.frame.paint_over(&self.scratch);

        if let Some(hover) = inputs.edit.hover {
            let color = match inputs.edit.mode {
                EditMode::Erase => self.erase_cursor,
                EditMode::Restore => self.restore_cursor,
            };
            brush::draw_cursor(&mut self.frame, hover, inputs.edit.brush_radius(), color, self.ring_alpha);
        }

        &self.frame
    }
}
