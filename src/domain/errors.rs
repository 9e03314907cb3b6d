//! # Domain Errors
//!
//! Validation failures raised while constructing domain values.

use thiserror::Error;

/// Error type for domain value construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Currency code is not three ASCII letters.
    #[error("invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),

    /// Sort key is not one of the supported orderings.
    #[error("invalid sort key: {0:?} (expected one of: gdp_desc, pop_desc)")]
    InvalidSortKey(String),

    /// A filter was supplied but is blank.
    #[error("{0} filter must not be blank")]
    BlankFilter(&'static str),
}

impl DomainError {
    /// Returns the name of the offending parameter, when there is one.
    #[must_use]
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidCurrencyCode(_) => "currency",
            Self::InvalidSortKey(_) => "sort",
            Self::BlankFilter(name) => name,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sort_key_lists_choices() {
        let err = DomainError::InvalidSortKey("name_asc".to_string());
        assert!(err.to_string().contains("name_asc"));
        assert!(err.to_string().contains("gdp_desc"));
        assert_eq!(err.parameter(), "sort");
    }

    #[test]
    fn blank_filter_names_parameter() {
        let err = DomainError::BlankFilter("region");
        assert_eq!(err.to_string(), "region filter must not be blank");
        assert_eq!(err.parameter(), "region");
    }
}
