//! Final output: committed mask applied to the original, over the background

use crate::config::OutputFormat;
use crate::error::Result;
use crate::mask::Mask;
use crate::raster::Compositing;
use crate::services::ImageIOService;
use image::RgbaImage;

/// Produces the delivered image from committed state only
///
/// No checkerboard, tint, cursor or in-progress stroke ever reaches the output.
pub struct Flattener;

impl Flattener {
    /// Compose the single-layer result
    ///
    /// # Arguments
    /// * `image` - Original image, already sized to the mask
    /// * `mask` - Committed mask
    /// * `background` - Cover-scaled background, or `None` for transparency
    #[must_use]
    pub fn flatten(image: &RgbaImage, mask: &Mask, background: Option<&RgbaImage>) -> RgbaImage {
        let (width, height) = mask.dimensions();
        let mut output = match background {
            Some(background) => background.clone(),
            None => RgbaImage::new(width, height),
        };

        let mut foreground = image.clone();
        foreground.intersect_coverage(mask.raster());
        output.paint_over(&foreground);
        output
    }

    /// Flatten and encode in a lossless RGBA format
    pub fn flatten_to_bytes(
        image: &RgbaImage,
        mask: &Mask,
        background: Option<&RgbaImage>,
        format: OutputFormat,
    ) -> Result<Vec<u8>> {
        let start = std::time::Instant::now();
        let output = Self::flatten(image, mask, background);
        let bytes = ImageIOService::encode(&output, format)?;
        tracing::debug!(
            format = %format,
            bytes = bytes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Flattened result"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::blend;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([(x * 10) as u8, (y * 10) as u8, 77, 255]))
    }

    fn cutout_of(image: &RgbaImage) -> RgbaImage {
        RgbaImage::from_fn(image.width(), image.height(), |x, y| {
            let p = image.get_pixel(x, y);
            match x {
                0..=4 => Rgba([p[0], p[1], p[2], 255]),
                5..=7 => Rgba([p[0], p[1], p[2], 90]),
                _ => Rgba([0, 0, 0, 0]),
            }
        })
    }

    #[test]
    fn test_untouched_mask_reproduces_cutout() {
        let image = gradient(10, 6);
        let cutout = cutout_of(&image);
        let mask = Mask::from_cutout(&cutout);

        let output = Flattener::flatten(&image, &mask, None);
        assert_eq!(output, cutout);
    }

    #[test]
    fn test_untouched_mask_over_background() {
        let image = gradient(10, 6);
        let cutout = cutout_of(&image);
        let mask = Mask::from_cutout(&cutout);
        let background = RgbaImage::from_pixel(10, 6, Rgba([0, 255, 0, 255]));

        let output = Flattener::flatten(&image, &mask, Some(&background));
        for (x, y, pixel) in output.enumerate_pixels() {
            let expected = blend::src_over(*background.get_pixel(x, y), *cutout.get_pixel(x, y));
            assert_eq!(*pixel, expected);
        }
        assert_eq!(*output.get_pixel(9, 0), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_flatten_to_png_decodes_back() {
        let image = gradient(10, 6);
        let mask = Mask::from_cutout(&cutout_of(&image));
        let bytes = Flattener::flatten_to_bytes(&image, &mask, None, OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, Flattener::flatten(&image, &mask, None));
    }
}
