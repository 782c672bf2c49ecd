//! Output format handling service

use crate::config::OutputFormat;
use std::path::Path;

/// Service describing output formats
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Get the appropriate file extension for a given output format
    ///
    /// # Examples
    /// ```rust
    /// use imgly_mask_editor::{services::OutputFormatHandler, OutputFormat};
    ///
    /// assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Png), "png");
    /// assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Rgba8), "raw");
    /// ```
    #[must_use]
    pub fn get_extension(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Rgba8 => "raw",
        }
    }

    /// Pick the output format matching a file name, if any
    ///
    /// # Examples
    /// ```rust
    /// use imgly_mask_editor::{services::OutputFormatHandler, OutputFormat};
    ///
    /// assert_eq!(OutputFormatHandler::from_path("out/result.TIF"), Some(OutputFormat::Tiff));
    /// assert_eq!(OutputFormatHandler::from_path("result.jpg"), None);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<OutputFormat> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::Png),
            "tif" | "tiff" => Some(OutputFormat::Tiff),
            "raw" | "rgba" => Some(OutputFormat::Rgba8),
            _ => None,
        }
    }
}
