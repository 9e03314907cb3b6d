//! # Country Query
//!
//! Filter and ordering options accepted by the store's listing operation.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::CurrencyCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordering of a country listing.
///
/// Absence of a sort key means name-ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountrySort {
    /// Estimated GDP, largest first. Countries without an estimate come last.
    #[serde(rename = "gdp_desc")]
    GdpDesc,
    /// Population, largest first.
    #[serde(rename = "pop_desc")]
    PopDesc,
}

impl CountrySort {
    /// Returns the wire name of the sort key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GdpDesc => "gdp_desc",
            Self::PopDesc => "pop_desc",
        }
    }
}

impl fmt::Display for CountrySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountrySort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gdp_desc" => Ok(Self::GdpDesc),
            "pop_desc" => Ok(Self::PopDesc),
            other => Err(DomainError::InvalidSortKey(other.to_string())),
        }
    }
}

/// Filter and sort options for listing countries.
///
/// Region and currency filters compare ASCII case-insensitively.
///
/// # Examples
///
/// ```
/// use country_cache::domain::value_objects::{CountryFilter, CountrySort};
///
/// let filter = CountryFilter::new()
///     .with_region("Africa")
///     .unwrap()
///     .with_sort(CountrySort::GdpDesc);
/// assert_eq!(filter.region(), Some("Africa"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
    region: Option<String>,
    currency: Option<String>,
    sort: Option<CountrySort>,
}

impl CountryFilter {
    /// Creates a filter that matches every country in name order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to a region.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BlankFilter` if the region is empty or whitespace.
    pub fn with_region(mut self, region: impl Into<String>) -> DomainResult<Self> {
        let region = region.into();
        if region.trim().is_empty() {
            return Err(DomainError::BlankFilter("region"));
        }
        self.region = Some(region.trim().to_string());
        Ok(self)
    }

    /// Restricts the listing to a currency code.
    ///
    /// The value is free text; anything that is not a well-formed code simply
    /// matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BlankFilter` if the currency is empty or whitespace.
    pub fn with_currency(mut self, currency: impl Into<String>) -> DomainResult<Self> {
        let currency = currency.into();
        if currency.trim().is_empty() {
            return Err(DomainError::BlankFilter("currency"));
        }
        self.currency = Some(currency.trim().to_string());
        Ok(self)
    }

    /// Sets the ordering.
    #[must_use]
    pub fn with_sort(mut self, sort: CountrySort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Returns the region filter.
    #[inline]
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Returns the currency filter.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// Returns the ordering.
    #[inline]
    #[must_use]
    pub fn sort(&self) -> Option<CountrySort> {
        self.sort
    }

    /// Returns true if `region` passes the region filter.
    #[must_use]
    pub fn matches_region(&self, region: Option<&str>) -> bool {
        match (&self.region, region) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }

    /// Returns true if `currency` passes the currency filter.
    #[must_use]
    pub fn matches_currency(&self, currency: Option<&CurrencyCode>) -> bool {
        match (&self.currency, currency) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual.as_str()),
            (Some(_), None) => false,
        }
    }
}
