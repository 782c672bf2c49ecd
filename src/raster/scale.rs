//! Background fitting and placeholder patterns

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Scale `src` to fully cover `width` x `height`, preserving aspect ratio,
/// centered, with overflow cropped
///
/// The visible window is cut from the source before resampling, so work and
/// memory are bounded by the target size whatever the source aspect ratio.
#[must_use]
pub fn cover_scale(src: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage {
    let (src_width, src_height) = src.dimensions();
    if src_width == 0 || src_height == 0 || width == 0 || height == 0 {
        return RgbaImage::new(width, height);
    }

    let scale = (f64::from(width) / f64::from(src_width)).max(f64::from(height) / f64::from(src_height));
    let crop_width = ((f64::from(width) / scale).round() as u32).clamp(1, src_width);
    let crop_height = ((f64::from(height) / scale).round() as u32).clamp(1, src_height);

    let x = (src_width - crop_width) / 2;
    let y = (src_height - crop_height) / 2;
    let window = imageops::crop_imm(src, x, y, crop_width, crop_height);

    if (crop_width, crop_height) == (width, height) {
        return window.to_image();
    }
    imageops::resize(&*window, width, height, filter)
}

/// Alternating square pattern signalling transparency
#[must_use]
pub fn checkerboard(width: u32, height: u32, tile: u32, light: Rgba<u8>, dark: Rgba<u8>) -> RgbaImage {
    let tile = tile.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        if ((x / tile) + (y / tile)) % 2 == 0 {
            light
        } else {
            dark
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn split_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, _| if x < width / 2 { RED } else { BLUE })
    }

    #[test]
    fn test_cover_crops_wide_source_centered() {
        let src = split_image(200, 100);
        let out = cover_scale(&src, 100, 100, FilterType::Nearest);
        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(*out.get_pixel(10, 50), RED);
        assert_eq!(*out.get_pixel(49, 50), RED);
        assert_eq!(*out.get_pixel(50, 50), BLUE);
        assert_eq!(*out.get_pixel(90, 50), BLUE);
    }

    #[test]
    fn test_cover_upscales_small_source() {
        let src = RgbaImage::from_pixel(10, 20, RED);
        let out = cover_scale(&src, 100, 100, FilterType::Triangle);
        assert_eq!(out.dimensions(), (100, 100));
        assert!(out.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_cover_same_size_is_identity() {
        let src = split_image(64, 32);
        let out = cover_scale(&src, 64, 32, FilterType::Lanczos3);
        assert_eq!(out, src);
    }

    #[test]
    fn test_cover_extreme_aspect_ratio_stays_bounded() {
        let src = RgbaImage::from_pixel(1, 100_000, RED);
        let out = cover_scale(&src, 400, 400, FilterType::Triangle);
        assert_eq!(out.dimensions(), (400, 400));
        assert!(out.pixels().all(|p| *p == RED));

        let wide = RgbaImage::from_pixel(100_000, 1, BLUE);
        let out = cover_scale(&wide, 300, 200, FilterType::Nearest);
        assert_eq!(out.dimensions(), (300, 200));
        assert!(out.pixels().all(|p| *p == BLUE));
    }

    #[test]
    fn test_cover_downscales_from_centered_window() {
        // 400x200 split source onto 100x100: the window is the middle 200x200
        let src = split_image(400, 200);
        let out = cover_scale(&src, 100, 100, FilterType::Nearest);
        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(*out.get_pixel(10, 50), RED);
        assert_eq!(*out.get_pixel(90, 50), BLUE);
    }

    #[test]
    fn test_checkerboard_alternates() {
        let light = Rgba([255, 255, 255, 255]);
        let dark = Rgba([204, 204, 204, 255]);
        let board = checkerboard(16, 16, 8, light, dark);
        assert_eq!(*board.get_pixel(0, 0), light);
        assert_eq!(*board.get_pixel(8, 0), dark);
        assert_eq!(*board.get_pixel(0, 8), dark);
        assert_eq!(*board.get_pixel(8, 8), light);
    }
}
