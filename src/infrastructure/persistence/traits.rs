//! # Repository Traits
//!
//! Port definition for the country store.
//!
//! The store is the only mutable shared state of the service. Its committed
//! state is replaced wholesale by a refresh and otherwise only shrinks
//! through single-record deletes.
//!
//! # Examples
//!
//! ```ignore
//! use country_cache::infrastructure::persistence::traits::CountryRepository;
//!
//! async fn report(repo: &dyn CountryRepository) {
//!     let status = repo.status().await.unwrap();
//!     println!("{} countries, last refreshed {:?}", status.count, status.last_refreshed_at);
//! }
//! ```

use crate::domain::entities::Country;
use crate::domain::value_objects::{CountryFilter, RefreshStatus};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Stored data could not be converted back into a record.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Store of country records.
///
/// All reads observe committed state only; a concurrent
/// [`replace_all`](CountryRepository::replace_all) is seen either entirely
/// or not at all.
#[async_trait]
pub trait CountryRepository: Send + Sync + fmt::Debug {
    /// Atomically replaces every stored record with `countries`.
    ///
    /// Returns the number of records written. Prior content is discarded,
    /// never merged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Query` if the write fails, in which case the
    /// prior content is left intact.
    async fn replace_all(&self, countries: &[Country]) -> RepositoryResult<u64>;

    /// Lists records matching the filter, in the filter's order.
    async fn list(&self, filter: &CountryFilter) -> RepositoryResult<Vec<Country>>;

    /// Gets a record by exact name.
    ///
    /// Returns `None` if no record has that name.
    async fn get_by_name(&self, name: &str) -> RepositoryResult<Option<Country>>;

    /// Deletes a record by exact name.
    ///
    /// Returns `Ok(true)` if the record was deleted, `Ok(false)` if it didn't exist.
    async fn delete_by_name(&self, name: &str) -> RepositoryResult<bool>;

    /// Returns the record count and the newest refresh time among stored records.
    async fn status(&self) -> RepositoryResult<RefreshStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error() {
        let err = RepositoryError::connection("Connection refused");
        assert!(err.to_string().contains("Connection"));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn query_error() {
        let err = RepositoryError::query("UNIQUE constraint failed");
        assert!(err.to_string().contains("Query"));
        assert!(err.to_string().contains("UNIQUE"));
    }

    #[test]
    fn serialization_error() {
        let err = RepositoryError::serialization("bad uuid");
        assert!(err.to_string().contains("Serialization"));
    }

    #[test]
    fn internal_error() {
        let err = RepositoryError::internal("Unexpected state");
        assert!(err.to_string().contains("Internal"));
    }
}
