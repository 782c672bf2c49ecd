//! Error types for mask editing operations

use thiserror::Error;

/// Result type alias for mask editing operations
pub type Result<T> = std::result::Result<T, MaskEditError>;

/// Error types for mask editing sessions
#[derive(Error, Debug)]
pub enum MaskEditError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Raster bytes could not be decoded into an RGBA image
    #[error("Decode error: {0}")]
    Decode(String),

    /// An operation was requested in a session state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Two rasters that must share dimensions do not
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The result sink rejected the delivered output
    #[error("Sink error: {0}")]
    Sink(String),
}

impl MaskEditError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new sink delivery error
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        Self::Sink(msg.into())
    }

    /// Create a decode error naming the input that failed
    pub fn decode_error(input: &str, error: &image::ImageError) -> Self {
        Self::Decode(format!("Failed to decode {} image: {}", input, error))
    }

    /// Create a decode error for rasters that decoded but are unusable
    pub fn empty_raster(input: &str, dimensions: (u32, u32)) -> Self {
        Self::Decode(format!(
            "Decoded {} image has no pixels ({}x{})",
            input, dimensions.0, dimensions.1
        ))
    }

    /// Create an invalid state error for an operation attempted in the wrong state
    pub fn invalid_state(operation: &str, state: impl std::fmt::Display) -> Self {
        Self::InvalidState(format!(
            "Cannot {} while session is {}",
            operation, state
        ))
    }

    /// Create a dimension mismatch error with both sizes
    pub fn dimension_mismatch(context: &str, expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch(format!(
            "{}: expected {}x{}, got {}x{}",
            context, expected.0, expected.1, actual.0, actual.1
        ))
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let recommendation = match recommended {
            Some(rec) => format!(" Recommended: {}", rec),
            None => String::new(),
        };

        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {}).{}",
            parameter, value, valid_range, recommendation
        ))
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let err = MaskEditError::invalid_config("test config error");
        assert!(matches!(err, MaskEditError::InvalidConfig(_)));

        let err = MaskEditError::invalid_state("accept", "uninitialized");
        assert!(matches!(err, MaskEditError::InvalidState(_)));
    }

    #[test]
    fn test_error_display() {
        let err = MaskEditError::invalid_state("accept", "uninitialized");
        assert_eq!(
            err.to_string(),
            "Invalid state: Cannot accept while session is uninitialized"
        );

        let err = MaskEditError::dimension_mismatch("stroke buffer", (100, 100), (50, 20));
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: stroke buffer: expected 100x100, got 50x20"
        );
    }

    #[test]
    fn test_enhanced_error_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = MaskEditError::file_io_error("write result", Path::new("/out/result.png"), &io_error);
        let error_string = err.to_string();
        assert!(error_string.contains("write result"));
        assert!(error_string.contains("/out/result.png"));

        let err = MaskEditError::config_value_error("brush diameter", 0, "1-400", Some(40));
        let error_string = err.to_string();
        assert!(error_string.contains("brush diameter"));
        assert!(error_string.contains("1-400"));
        assert!(error_string.contains("Recommended: 40"));

        let err = MaskEditError::empty_raster("cutout", (0, 10));
        assert!(err.to_string().contains("0x10"));
        assert!(matches!(err, MaskEditError::Decode(_)));
    }
}
