// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the filter engine and the application around it

use thiserror::Error;

/// Result type alias using FilterError
pub type FilterResult<T> = Result<T, FilterError>;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by the filter engine
///
/// Unknown filters are never an error (they resolve to the identity filter),
/// and channel overflow is always clamped. What remains are contract
/// violations by the caller and cooperative cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Malformed pixel buffer or parameter
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Kernel dimensions or values that cannot be applied
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),
    /// The caller cancelled the operation between scanlines
    #[error("filter cancelled")]
    Cancelled,
    /// The background worker running the filter failed
    #[error("filter worker failed: {0}")]
    Worker(String),
}

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Filter engine errors
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// Filesystem errors
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
    /// Image decoding or encoding errors at the CLI edge
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

// Conversion from String for ad-hoc messages
impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_converts_into_app_error() {
        let err: AppError = FilterError::Cancelled.into();
        assert!(matches!(err, AppError::Filter(FilterError::Cancelled)));
        assert_eq!(err.to_string(), "Filter error: filter cancelled");
    }

    #[test]
    fn test_image_and_message_conversions() {
        let decode = image::load_from_memory(b"not an image").unwrap_err();
        let err: AppError = decode.into();
        assert!(matches!(err, AppError::Image(_)));

        let err: AppError = "buffer mismatch".into();
        assert!(matches!(err, AppError::Other(ref m) if m == "buffer mismatch"));
        let err: AppError = format!("handler {}", 1).into();
        assert_eq!(err.to_string(), "handler 1");
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = FilterError::InvalidArgument("width must be > 0".into());
        assert_eq!(err.to_string(), "invalid argument: width must be > 0");
    }
}
