//! # Raw Country Entry
//!
//! A country as reported by the upstream catalog, after boundary validation
//! and before exchange rates are joined on.

use crate::domain::value_objects::CurrencyCode;

/// Validated upstream country entry.
///
/// Adapters build these from their wire formats; anything that failed
/// validation has already been dropped or nulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCountry {
    /// Common country name.
    pub name: String,
    /// Capital city, if reported.
    pub capital: Option<String>,
    /// Region, if reported.
    pub region: Option<String>,
    /// Population.
    pub population: u64,
    /// First listed currency, if it is a well-formed code.
    pub currency_code: Option<CurrencyCode>,
    /// Flag image URL, if reported.
    pub flag_url: Option<String>,
}

impl RawCountry {
    /// Creates an entry with only the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, population: u64) -> Self {
        Self {
            name: name.into(),
            capital: None,
            region: None,
            population,
            currency_code: None,
            flag_url: None,
        }
    }

    /// Sets the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the currency code.
    #[must_use]
    pub fn with_currency(mut self, code: CurrencyCode) -> Self {
        self.currency_code = Some(code);
        self
    }
}
