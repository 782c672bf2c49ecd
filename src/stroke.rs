//! Stroke engine: accumulates one drag gesture into a transient coverage buffer

use crate::raster::{brush, Compositing, PixelRect, OPAQUE_WHITE};
use crate::types::Point;
use image::RgbaImage;

/// Coverage painted by the gesture in progress
///
/// Only holds content between gesture begin and the commit or discard that
/// ends it. The dirty region bounds everything painted since the last clear.
#[derive(Debug, Clone)]
pub struct StrokeBuffer {
    raster: RgbaImage,
    dirty: PixelRect,
}

impl StrokeBuffer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: RgbaImage::new(width, height),
            dirty: PixelRect::empty(),
        }
    }

    #[must_use]
    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// Bounds of all coverage painted since the last clear
    #[must_use]
    pub fn dirty_region(&self) -> PixelRect {
        self.dirty
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Reset to fully transparent; touches only the dirty region
    pub fn clear(&mut self) {
        if !self.dirty.is_empty() {
            self.raster.clear_in(self.dirty);
            self.dirty = PixelRect::empty();
        }
    }

    fn stamp(&mut self, from: Point, to: Point, diameter: u32) {
        let touched = brush::stamp_segment(&mut self.raster, from, to, diameter as f32 / 2.0, OPAQUE_WHITE);
        self.dirty = self.dirty.union(&touched);
    }
}

/// Turns pointer samples of one gesture into capsule segments
#[derive(Debug, Clone)]
pub struct StrokeEngine {
    buffer: StrokeBuffer,
    anchor: Option<Point>,
}

impl StrokeEngine {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: StrokeBuffer::new(width, height),
            anchor: None,
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &StrokeBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    #[must_use]
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// Start a gesture: clear leftovers and paint a dot so a tap still edits
    pub fn begin(&mut self, point: Point, diameter: u32) {
        self.buffer.clear();
        self.anchor = Some(point);
        self.buffer.stamp(point, point, diameter);
    }

    /// Paint a segment from the anchor to `point` and advance the anchor
    ///
    /// The diameter is taken per call, so a brush change mid-gesture only
    /// affects later segments. Returns `false` when no gesture is active.
    pub fn extend(&mut self, point: Point, diameter: u32) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        self.buffer.stamp(anchor, point, diameter);
        self.anchor = Some(point);
        true
    }

    /// Finish the gesture and hand the buffer over for committing
    ///
    /// Returns `None` if no gesture was active. The caller must clear the
    /// buffer once merged.
    pub fn end(&mut self) -> Option<&mut StrokeBuffer> {
        self.anchor.take()?;
        Some(&mut self.buffer)
    }

    /// Drop the gesture without committing it
    pub fn discard(&mut self) {
        self.anchor = None;
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_paints_dot() {
        let mut engine = StrokeEngine::new(50, 50);
        engine.begin(Point::new(25.0, 25.0), 10);
        assert!(engine.is_active());
        assert_eq!(engine.buffer().raster().get_pixel(25, 25)[3], 255);
        assert!(!engine.buffer().is_empty());
    }

    #[test]
    fn test_extend_requires_active_gesture() {
        let mut engine = StrokeEngine::new(50, 50);
        assert!(!engine.extend(Point::new(10.0, 10.0), 10));
        assert!(engine.buffer().is_empty());
    }

    #[test]
    fn test_extend_accumulates_monotonically() {
        let mut engine = StrokeEngine::new(100, 100);
        engine.begin(Point::new(10.0, 50.0), 10);
        let before: Vec<u8> = engine.buffer().raster().pixels().map(|p| p[3]).collect();

        assert!(engine.extend(Point::new(90.0, 50.0), 10));
        let after: Vec<u8> = engine.buffer().raster().pixels().map(|p| p[3]).collect();

        assert!(before.iter().zip(&after).all(|(b, a)| a >= b));
        assert_eq!(engine.buffer().raster().get_pixel(50, 50)[3], 255);
        assert_eq!(engine.anchor(), Some(Point::new(90.0, 50.0)));
    }

    #[test]
    fn test_width_follows_latest_diameter() {
        let mut engine = StrokeEngine::new(100, 100);
        engine.begin(Point::new(10.0, 20.0), 4);
        engine.extend(Point::new(40.0, 20.0), 4);
        engine.extend(Point::new(70.0, 20.0), 30);

        let raster = engine.buffer().raster();
        // Thin first segment
        assert_eq!(raster.get_pixel(25, 30)[3], 0);
        // Wide second segment
        assert_eq!(raster.get_pixel(55, 30)[3], 255);
    }

    #[test]
    fn test_end_then_clear_resets_buffer() {
        let mut engine = StrokeEngine::new(30, 30);
        engine.begin(Point::new(15.0, 15.0), 6);
        let buffer = engine.end().expect("gesture was active");
        buffer.clear();
        assert!(!engine.is_active());
        assert!(engine.buffer().raster().pixels().all(|p| p[3] == 0));
        assert!(engine.end().is_none());
    }

    #[test]
    fn test_begin_clears_previous_leftovers() {
        let mut engine = StrokeEngine::new(60, 60);
        engine.begin(Point::new(10.0, 10.0), 6);
        engine.discard();
        assert!(engine.buffer().is_empty());

        engine.begin(Point::new(50.0, 50.0), 6);
        assert_eq!(engine.buffer().raster().get_pixel(10, 10)[3], 0);
        assert_eq!(engine.buffer().raster().get_pixel(50, 50)[3], 255);
    }
}
