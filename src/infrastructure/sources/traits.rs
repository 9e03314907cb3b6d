//! # Source Traits
//!
//! Port definitions for the two upstream data sources.
//!
//! # Examples
//!
//! ```ignore
//! use country_cache::infrastructure::sources::traits::CountrySource;
//!
//! async fn count_upstream(source: &dyn CountrySource) -> usize {
//!     source.fetch_countries().await.map(|c| c.len()).unwrap_or(0)
//! }
//! ```

use crate::domain::entities::RawCountry;
use crate::domain::value_objects::CurrencyCode;
use crate::infrastructure::sources::error::SourceResult;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Mapping from currency code to its base-currency value.
pub type RateTable = HashMap<CurrencyCode, f64>;

/// Upstream catalog of countries.
#[async_trait]
pub trait CountrySource: Send + Sync + fmt::Debug {
    /// Fetches every country the catalog knows about, in upstream order.
    ///
    /// # Errors
    ///
    /// - `SourceError::SourceUnavailable` if the call errors or times out
    /// - `SourceError::MalformedResponse` if the body has the wrong shape
    async fn fetch_countries(&self) -> SourceResult<Vec<RawCountry>>;
}

/// Upstream exchange-rate service.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync + fmt::Debug {
    /// Fetches rates for a set of unique currency codes.
    ///
    /// Implementations issue their requests concurrently, at most one per
    /// code. Codes that cannot be resolved are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::SourceUnavailable` only when the fetch could not
    /// be performed at all.
    async fn fetch_rates(&self, codes: &BTreeSet<CurrencyCode>) -> SourceResult<RateTable>;
}
