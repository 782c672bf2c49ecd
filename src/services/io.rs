//! Image I/O operations service
//!
//! Decoding of session inputs and encoding of the flattened result live here,
//! keeping format handling out of the editing core.

use crate::{
    config::OutputFormat,
    error::{MaskEditError, Result},
};
use image::{GrayImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Service for decoding editor inputs and encoding results
pub struct ImageIOService;

impl ImageIOService {
    /// Decode raster bytes into an RGBA image
    ///
    /// # Arguments
    /// * `bytes` - Encoded image data (PNG, JPEG, TIFF, WebP)
    /// * `input` - Name of the input, used in error messages ("original", "cutout", ...)
    ///
    /// # Returns
    /// * `Ok(RgbaImage)` - Decoded image with at least one pixel
    /// * `Err(MaskEditError::Decode)` - Bytes are malformed or decode to an empty raster
    ///
    /// # Examples
    /// ```rust,no_run
    /// use imgly_mask_editor::services::ImageIOService;
    ///
    /// let bytes = std::fs::read("cutout.png")?;
    /// let cutout = ImageIOService::load_from_bytes(&bytes, "cutout")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_bytes(bytes: &[u8], input: &str) -> Result<RgbaImage> {
        let image = image::load_from_memory(bytes).map_err(|e| MaskEditError::decode_error(input, &e))?;
        let rgba = image.to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(MaskEditError::empty_raster(input, rgba.dimensions()));
        }
        tracing::trace!(
            input = %input,
            width = rgba.width(),
            height = rgba.height(),
            bytes = bytes.len(),
            "Decoded image"
        );
        Ok(rgba)
    }

    /// Read an async stream to the end and decode it
    pub async fn load_from_reader<R: AsyncRead + Unpin>(mut reader: R, input: &str) -> Result<RgbaImage> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await?;
        Self::load_from_bytes(&buffer, input)
    }

    /// Encode an RGBA image in a lossless format
    ///
    /// # Examples
    /// ```rust
    /// use imgly_mask_editor::{services::ImageIOService, OutputFormat};
    /// use image::RgbaImage;
    ///
    /// let image = RgbaImage::new(4, 4);
    /// let raw = ImageIOService::encode(&image, OutputFormat::Rgba8)?;
    /// assert_eq!(raw.len(), 4 * 4 * 4);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn encode(image: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>> {
        let image_format = match format {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Tiff => ImageFormat::Tiff,
            OutputFormat::Rgba8 => return Ok(image.as_raw().clone()),
        };

        let mut buffer = Vec::new();
        image.write_to(&mut Cursor::new(&mut buffer), image_format)?;
        Ok(buffer)
    }

    /// Encode a single-channel coverage image as grayscale PNG
    pub fn encode_gray_png(image: &GrayImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
        Ok(buffer)
    }

    /// Write encoded bytes, creating parent directories as needed
    pub fn save_bytes<P: AsRef<Path>>(bytes: &[u8], path: P) -> Result<()> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| MaskEditError::file_io_error("create output directory", parent, &e))?;
            }
        }
        std::fs::write(path_ref, bytes).map_err(|e| MaskEditError::file_io_error("write output file", path_ref, &e))
    }

    /// Encode and write an image
    pub fn save_image<P: AsRef<Path>>(image: &RgbaImage, path: P, format: OutputFormat) -> Result<()> {
        let bytes = Self::encode(image, format)?;
        Self::save_bytes(&bytes, path)
    }

    /// Check if a file path has a supported input image extension
    pub fn is_supported_format<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                matches!(
                    ext.to_lowercase().as_str(),
                    "jpg" | "jpeg" | "png" | "webp" | "tiff" | "tif"
                )
            })
    }
}
