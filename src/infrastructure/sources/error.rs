//! # Source Errors
//!
//! Error types for the upstream data adapters.
//!
//! # Examples
//!
//! ```
//! use country_cache::infrastructure::sources::error::SourceError;
//!
//! let error = SourceError::timeout("restcountries");
//! assert!(error.is_transport());
//!
//! let error = SourceError::malformed("open-er-api", "expected an object");
//! assert!(!error.is_transport());
//! ```

use thiserror::Error;

/// Error type for upstream adapter operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Upstream could not be reached, timed out, or answered with an error status.
    #[error("{upstream} unavailable: {message}")]
    SourceUnavailable {
        /// Name of the upstream service.
        upstream: String,
        /// Error message.
        message: String,
        /// HTTP status, when the upstream answered at all.
        status: Option<u16>,
    },

    /// Upstream answered but the body did not have the expected shape.
    #[error("{upstream} returned a malformed response: {message}")]
    MalformedResponse {
        /// Name of the upstream service.
        upstream: String,
        /// Error message.
        message: String,
    },
}

impl SourceError {
    /// Creates an unavailable error for a transport failure.
    #[must_use]
    pub fn unavailable(upstream: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            upstream: upstream.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Creates an unavailable error for a request that timed out.
    #[must_use]
    pub fn timeout(upstream: impl Into<String>) -> Self {
        Self::unavailable(upstream, "request timed out")
    }

    /// Creates an unavailable error for a non-success HTTP status.
    #[must_use]
    pub fn status(upstream: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            upstream: upstream.into(),
            message: message.into(),
            status: Some(status),
        }
    }

    /// Creates a malformed response error.
    #[must_use]
    pub fn malformed(upstream: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            upstream: upstream.into(),
            message: message.into(),
        }
    }

    /// Returns the upstream service name.
    #[must_use]
    pub fn upstream(&self) -> &str {
        match self {
            Self::SourceUnavailable { upstream, .. } | Self::MalformedResponse { upstream, .. } => {
                upstream
            }
        }
    }

    /// Returns true if the upstream was never reached (no HTTP status).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::SourceUnavailable { status: None, .. })
    }

    /// Returns true if the upstream is unreachable or reports itself unable
    /// to serve: a transport failure, a 5xx status, or 429.
    #[must_use]
    pub fn is_service_failure(&self) -> bool {
        match self {
            Self::SourceUnavailable { status: None, .. } => true,
            Self::SourceUnavailable {
                status: Some(code), ..
            } => *code >= 500 || *code == 429,
            Self::MalformedResponse { .. } => false,
        }
    }

    /// Returns true if this is a malformed response error.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }
}

/// Result type for upstream adapter operations.
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transport() {
        let error = SourceError::timeout("restcountries");
        assert!(error.is_transport());
        assert!(!error.is_malformed());
        assert!(error.to_string().contains("timed out"));
    }

    #[test]
    fn status_error_is_not_transport() {
        let error = SourceError::status("open-er-api", 404, "unknown code");
        assert!(!error.is_transport());
        assert_eq!(error.upstream(), "open-er-api");
    }

    #[test]
    fn service_failure_classification() {
        assert!(SourceError::timeout("open-er-api").is_service_failure());
        assert!(SourceError::status("open-er-api", 503, "down").is_service_failure());
        assert!(SourceError::status("open-er-api", 500, "boom").is_service_failure());
        assert!(SourceError::status("open-er-api", 429, "slow down").is_service_failure());
        assert!(!SourceError::status("open-er-api", 404, "unknown code").is_service_failure());
        assert!(!SourceError::malformed("open-er-api", "not json").is_service_failure());
    }

    #[test]
    fn malformed_display() {
        let error = SourceError::malformed("restcountries", "expected an array");
        assert!(error.is_malformed());
        let display = error.to_string();
        assert!(display.contains("restcountries"));
        assert!(display.contains("expected an array"));
    }
}
