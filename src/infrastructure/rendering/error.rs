//! # Rendering Errors
//!
//! Errors produced while drawing the summary image or storing it.

use thiserror::Error;

/// Error type for summary rendering and image storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The image could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The image slot could not be read or written.
    #[error("io error: {0}")]
    Io(String),
}

impl RenderError {
    /// Creates an encoding error.
    #[must_use]
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Creates an io error.
    #[must_use]
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        assert_eq!(
            RenderError::encoding("bad dimensions").to_string(),
            "encoding error: bad dimensions"
        );
        assert_eq!(RenderError::io("disk full").to_string(), "io error: disk full");
    }

    #[test]
    fn from_io_error() {
        let err: RenderError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, RenderError::Io(msg) if msg.contains("denied")));
    }
}
