//! Fixed-size RGBA surfaces and the compositing operations over them
//!
//! Every editor buffer is an [`image::RgbaImage`] in straight alpha. The
//! [`Compositing`] trait supplies the handful of whole-buffer operations the
//! compositor, committer and flattener are written in terms of; region
//! variants restrict work to a [`PixelRect`] so per-gesture operations stay
//! proportional to the stroke instead of the canvas.

pub mod blend;
pub mod brush;
pub mod scale;

use crate::error::MaskEditError;
use image::{Rgba, RgbaImage};

/// Fully transparent pixel
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Opaque white, the color of mask and stroke coverage
pub const OPAQUE_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Half-open pixel rectangle `[left, right) x [top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelRect {
    #[must_use]
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The whole surface
    #[must_use]
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Smallest rectangle containing the float bounds, clipped to the surface
    #[must_use]
    pub fn from_bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32, width: u32, height: u32) -> Self {
        let clip = |v: f32, limit: u32| -> u32 {
            if v <= 0.0 {
                0
            } else {
                (v as u32).min(limit)
            }
        };
        let left = clip(min_x.floor(), width);
        let top = clip(min_y.floor(), height);
        let right = clip(max_x.ceil(), width);
        let bottom = clip(max_y.ceil(), height);
        if left >= right || top >= bottom {
            return Self::empty();
        }
        Self::new(left, top, right, bottom)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Bounding rectangle of both
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// Raster compositing over equally sized RGBA buffers
///
/// Mismatched dimensions violate the session invariant that all buffers are
/// sized once from the cutout, so they panic rather than return an error.
pub trait Compositing {
    /// Layer `src` over `self` (source-over) within `region`
    fn paint_over_in(&mut self, src: &RgbaImage, region: PixelRect);

    /// Remove coverage wherever `src` has alpha (destination-out) within `region`
    fn subtract_coverage_in(&mut self, src: &RgbaImage, region: PixelRect);

    /// Keep coverage only where `src` has alpha (destination-in) over the whole surface
    fn intersect_coverage(&mut self, src: &RgbaImage);

    /// Reset `region` to fully transparent
    fn clear_in(&mut self, region: PixelRect);

    /// Replace every pixel with `color`
    fn fill_solid(&mut self, color: Rgba<u8>);

    /// Overwrite every pixel with the pixels of `src`, reusing the allocation
    fn copy_pixels_from(&mut self, src: &RgbaImage);

    fn bounds(&self) -> PixelRect;

    fn paint_over(&mut self, src: &RgbaImage) {
        let region = self.bounds();
        self.paint_over_in(src, region);
    }

    fn subtract_coverage(&mut self, src: &RgbaImage) {
        let region = self.bounds();
        self.subtract_coverage_in(src, region);
    }

    fn clear(&mut self) {
        let region = self.bounds();
        self.clear_in(region);
    }
}

impl Compositing for RgbaImage {
    fn paint_over_in(&mut self, src: &RgbaImage, region: PixelRect) {
        assert_same_dimensions("paint over", self, src);
        for_each_pixel_in(self, src, region, |dst, s| *dst = blend::src_over(*dst, s));
    }

    fn subtract_coverage_in(&mut self, src: &RgbaImage, region: PixelRect) {
        assert_same_dimensions("subtract coverage", self, src);
        for_each_pixel_in(self, src, region, |dst, s| {
            if s[3] != 0 {
                *dst = blend::dst_out(*dst, s[3]);
            }
        });
    }

    fn intersect_coverage(&mut self, src: &RgbaImage) {
        assert_same_dimensions("intersect coverage", self, src);
        for (dst, s) in self.pixels_mut().zip(src.pixels()) {
            *dst = blend::dst_in(*dst, s[3]);
        }
    }

    fn clear_in(&mut self, region: PixelRect) {
        let region = clip_region(region, self.width(), self.height());
        for y in region.top..region.bottom {
            for x in region.left..region.right {
                self.put_pixel(x, y, TRANSPARENT);
            }
        }
    }

    fn fill_solid(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels_mut() {
            *pixel = color;
        }
    }

    fn copy_pixels_from(&mut self, src: &RgbaImage) {
        assert_same_dimensions("copy pixels", self, src);
        let dst: &mut [u8] = self;
        dst.copy_from_slice(src.as_raw());
    }

    fn bounds(&self) -> PixelRect {
        PixelRect::full(self.width(), self.height())
    }
}

fn clip_region(region: PixelRect, width: u32, height: u32) -> PixelRect {
    PixelRect::new(
        region.left.min(width),
        region.top.min(height),
        region.right.min(width),
        region.bottom.min(height),
    )
}

fn for_each_pixel_in(
    dst: &mut RgbaImage,
    src: &RgbaImage,
    region: PixelRect,
    mut op: impl FnMut(&mut Rgba<u8>, Rgba<u8>),
) {
    let region = clip_region(region, dst.width(), dst.height());
    for y in region.top..region.bottom {
        for x in region.left..region.right {
            let s = *src.get_pixel(x, y);
            op(dst.get_pixel_mut(x, y), s);
        }
    }
}

fn assert_same_dimensions(operation: &str, dst: &RgbaImage, src: &RgbaImage) {
    if dst.dimensions() != src.dimensions() {
        panic!(
            "{}",
            MaskEditError::dimension_mismatch(operation, dst.dimensions(), src.dimensions())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_bounds_clips_to_surface() {
        let rect = PixelRect::from_bounds(-5.0, 2.5, 12.2, 30.0, 10, 20);
        assert_eq!(rect, PixelRect::new(0, 2, 10, 20));
        assert!(PixelRect::from_bounds(15.0, 0.0, 20.0, 5.0, 10, 10).is_empty());
    }

    #[test]
    fn test_rect_union_ignores_empty() {
        let a = PixelRect::new(2, 2, 4, 4);
        assert_eq!(a.union(&PixelRect::empty()), a);
        assert_eq!(PixelRect::empty().union(&a), a);
        assert_eq!(a.union(&PixelRect::new(3, 0, 8, 3)), PixelRect::new(2, 0, 8, 4));
    }

    #[test]
    fn test_subtract_then_intersect() {
        let mut dst = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let mut cover = RgbaImage::new(4, 4);
        cover.put_pixel(1, 1, OPAQUE_WHITE);

        dst.subtract_coverage(&cover);
        assert_eq!(dst.get_pixel(1, 1)[3], 0);
        assert_eq!(dst.get_pixel(1, 1)[0], 10);
        assert_eq!(dst.get_pixel(2, 2)[3], 255);

        let mut kept = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        kept.intersect_coverage(&cover);
        assert_eq!(kept.get_pixel(1, 1)[3], 255);
        assert_eq!(kept.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_region_ops_leave_outside_untouched() {
        let mut dst = RgbaImage::from_pixel(4, 4, OPAQUE_WHITE);
        let src = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        dst.paint_over_in(&src, PixelRect::new(0, 0, 2, 2));
        assert_eq!(*dst.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*dst.get_pixel(2, 2), OPAQUE_WHITE);

        dst.clear_in(PixelRect::new(3, 3, 10, 10));
        assert_eq!(*dst.get_pixel(3, 3), TRANSPARENT);
        assert_eq!(*dst.get_pixel(2, 3), OPAQUE_WHITE);
    }

    #[test]
    fn test_fill_and_copy() {
        let mut dst = RgbaImage::new(3, 2);
        dst.fill_solid(Rgba([1, 2, 3, 4]));
        assert!(dst.pixels().all(|p| *p == Rgba([1, 2, 3, 4])));

        let src = RgbaImage::from_pixel(3, 2, Rgba([9, 9, 9, 9]));
        dst.copy_pixels_from(&src);
        assert_eq!(dst, src);

        dst.clear();
        assert!(dst.pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    #[should_panic(expected = "Dimension mismatch")]
    fn test_mismatched_dimensions_panic() {
        let mut dst = RgbaImage::new(4, 4);
        let src = RgbaImage::new(2, 2);
        dst.paint_over(&src);
    }
}
