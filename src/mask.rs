//! Committed foreground mask: seeding from the cutout and merging strokes
//!
//! The mask is white RGBA whose alpha is the kept coverage. It changes only
//! when a finished stroke is committed (or when it is re-seeded).

use crate::raster::Compositing;
use crate::stroke::StrokeBuffer;
use crate::types::{EditMode, MaskStatistics};
use image::{GrayImage, Luma, Rgba, RgbaImage};

#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    raster: RgbaImage,
}

impl Mask {
    /// Seed a mask from the cutout's alpha channel
    ///
    /// Cutout colors are discarded; covered pixels become white with the
    /// cutout's alpha.
    #[must_use]
    pub fn from_cutout(cutout: &RgbaImage) -> Self {
        let (width, height) = cutout.dimensions();
        let raster = RgbaImage::from_fn(width, height, |x, y| Rgba([255, 255, 255, cutout.get_pixel(x, y)[3]]));
        Self { raster }
    }

    #[must_use]
    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// Coverage at a pixel, 0 outside the mask
    #[must_use]
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.raster.get_pixel_checked(x, y).map_or(0, |p| p[3])
    }

    /// Merge a finished stroke and clear it
    ///
    /// Erase removes coverage wherever the stroke painted; restore layers the
    /// stroke over the mask, bringing those pixels back to full coverage.
    pub fn commit(&mut self, stroke: &mut StrokeBuffer, mode: EditMode) {
        let region = stroke.dirty_region();
        if !region.is_empty() {
            match mode {
                EditMode::Erase => self.raster.subtract_coverage_in(stroke.raster(), region),
                EditMode::Restore => self.raster.paint_over_in(stroke.raster(), region),
            }
            tracing::trace!(
                mode = %mode,
                width = region.width(),
                height = region.height(),
                "Committed stroke into mask"
            );
        }
        stroke.clear();
    }

    /// Coverage counts over the whole mask
    #[must_use]
    pub fn statistics(&self) -> MaskStatistics {
        let (width, height) = self.dimensions();
        let total_pixels = width as usize * height as usize;
        let mut covered_pixels = 0;
        let mut opaque_pixels = 0;
        for pixel in self.raster.pixels() {
            if pixel[3] > 0 {
                covered_pixels += 1;
            }
            if pixel[3] == 255 {
                opaque_pixels += 1;
            }
        }

        MaskStatistics {
            total_pixels,
            covered_pixels,
            opaque_pixels,
            transparent_pixels: total_pixels - covered_pixels,
            coverage_ratio: if total_pixels == 0 {
                0.0
            } else {
                covered_pixels as f32 / total_pixels as f32
            },
        }
    }

    /// Mask coverage as a grayscale image (white = kept)
    #[must_use]
    pub fn to_alpha_image(&self) -> GrayImage {
        let (width, height) = self.dimensions();
        GrayImage::from_fn(width, height, |x, y| Luma([self.raster.get_pixel(x, y)[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokeEngine;
    use crate::types::Point;

    fn opaque_cutout(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([120, 60, 30, 255]))
    }

    fn covered(mask: &Mask) -> usize {
        mask.statistics().covered_pixels
    }

    #[test]
    fn test_from_cutout_keeps_only_alpha() {
        let mut cutout = RgbaImage::new(3, 1);
        cutout.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        cutout.put_pixel(1, 0, Rgba([40, 50, 60, 100]));

        let mask = Mask::from_cutout(&cutout);
        assert_eq!(*mask.raster().get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*mask.raster().get_pixel(1, 0), Rgba([255, 255, 255, 100]));
        assert_eq!(mask.alpha_at(2, 0), 0);
        assert_eq!(mask.alpha_at(99, 99), 0);
    }

    #[test]
    fn test_erase_never_increases_and_restore_never_decreases() {
        let mut mask = Mask::from_cutout(&opaque_cutout(60, 60));
        let mut engine = StrokeEngine::new(60, 60);

        let before = covered(&mask);
        engine.begin(Point::new(5.0, 5.0), 8);
        engine.extend(Point::new(55.0, 40.0), 8);
        mask.commit(engine.end().unwrap(), EditMode::Erase);
        let after_erase = covered(&mask);
        assert!(after_erase < before);

        engine.begin(Point::new(30.0, 5.0), 12);
        engine.extend(Point::new(30.0, 55.0), 12);
        mask.commit(engine.end().unwrap(), EditMode::Restore);
        assert!(covered(&mask) >= after_erase);
    }

    #[test]
    fn test_commit_clears_stroke() {
        let mut mask = Mask::from_cutout(&opaque_cutout(20, 20));
        let mut engine = StrokeEngine::new(20, 20);
        engine.begin(Point::new(10.0, 10.0), 6);
        mask.commit(engine.end().unwrap(), EditMode::Erase);
        assert!(engine.buffer().is_empty());
        assert!(engine.buffer().raster().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_commit_is_idempotent_per_stroke() {
        let mut engine = StrokeEngine::new(40, 40);
        engine.begin(Point::new(5.0, 20.0), 10);
        engine.extend(Point::new(35.0, 20.0), 10);
        let stroke = engine.buffer().clone();

        for mode in [EditMode::Erase, EditMode::Restore] {
            let mut cutout = opaque_cutout(40, 40);
            for x in 0..20 {
                for y in 0..40 {
                    cutout.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                }
            }
            let mut mask = Mask::from_cutout(&cutout);

            let mut first = stroke.clone();
            mask.commit(&mut first, mode);
            let once = mask.clone();

            let mut second = stroke.clone();
            mask.commit(&mut second, mode);
            assert_eq!(mask, once, "second {} commit changed the mask", mode);
        }
    }

    #[test]
    fn test_statistics_and_alpha_image() {
        let mut cutout = RgbaImage::new(4, 1);
        cutout.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        cutout.put_pixel(1, 0, Rgba([0, 0, 0, 64]));
        let mask = Mask::from_cutout(&cutout);

        let stats = mask.statistics();
        assert_eq!(stats.total_pixels, 4);
        assert_eq!(stats.covered_pixels, 2);
        assert_eq!(stats.opaque_pixels, 1);
        assert_eq!(stats.transparent_pixels, 2);
        assert!((stats.coverage_ratio - 0.5).abs() < f32::EPSILON);

        let gray = mask.to_alpha_image();
        assert_eq!(gray.get_pixel(1, 0)[0], 64);
        assert_eq!(gray.get_pixel(3, 0)[0], 0);
    }
}
