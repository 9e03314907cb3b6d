//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Each variant corresponds to one HTTP status at the REST boundary.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Source(SourceError)          - Upstream unreachable or malformed (503)
//! ├── Repository(RepositoryError)  - Store failure (500)
//! ├── NotFound { resource, id }    - Unknown record or empty image slot (404)
//! ├── InvalidParameter { .. }      - Rejected query parameter (400)
//! ├── Render(RenderError)          - Summary image failure (500)
//! └── Internal(String)             - Anything else (500)
//! ```
//!
//! # Examples
//!
//! ```
//! use country_cache::application::error::ApplicationError;
//! use country_cache::domain::errors::DomainError;
//!
//! let err = ApplicationError::not_found("country", "Atlantis");
//! assert!(err.is_not_found());
//!
//! let err: ApplicationError = DomainError::BlankFilter("region").into();
//! assert!(err.is_invalid_parameter());
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::rendering::RenderError;
use crate::infrastructure::sources::SourceError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Upstream source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Store error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Resource not found.
    #[error("not found: {resource} {id}")]
    NotFound {
        /// Kind of resource.
        resource: &'static str,
        /// Resource identifier.
        id: String,
    },

    /// A request parameter was rejected.
    #[error("invalid parameter {parameter}: {message}")]
    InvalidParameter {
        /// Parameter name.
        parameter: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Summary rendering or image storage error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        Self::InvalidParameter {
            parameter: err.parameter(),
            message: err.to_string(),
        }
    }
}

impl ApplicationError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is an invalid parameter error.
    #[must_use]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Returns true if an upstream source caused the failure.
    #[must_use]
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
