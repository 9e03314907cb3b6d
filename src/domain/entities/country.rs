//! # Country Entity
//!
//! The stored country record.
//!
//! Records are only ever created in bulk by a refresh, which joins a
//! [`RawCountry`] with its exchange rate and derives the GDP estimate.
//!
//! # Examples
//!
//! ```
//! use country_cache::domain::entities::{Country, RawCountry};
//! use country_cache::domain::value_objects::{CurrencyCode, Timestamp};
//!
//! let raw = RawCountry::new("Ghana", 1_000).with_currency(CurrencyCode::new("GHS").unwrap());
//! let country = Country::from_raw(raw, Some(0.5), 1500.0, Timestamp::now());
//!
//! assert_eq!(country.estimated_gdp(), Some(750_000.0));
//! ```

use crate::domain::entities::raw_country::RawCountry;
use crate::domain::value_objects::{CountrySort, CurrencyCode, Timestamp};
use std::cmp::Ordering;
use uuid::Uuid;

/// Computes the GDP estimate for a population at a given rate.
///
/// `rate` is the base-currency value of one unit of the local currency and
/// `per_capita_factor` is output per person in local currency units.
#[must_use]
pub fn estimate_gdp(population: u64, rate: f64, per_capita_factor: f64) -> f64 {
    population as f64 * per_capita_factor * rate
}

/// A cached country record.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    id: Uuid,
    name: String,
    capital: Option<String>,
    region: Option<String>,
    population: u64,
    currency_code: Option<CurrencyCode>,
    exchange_rate: Option<f64>,
    estimated_gdp: Option<f64>,
    flag_url: Option<String>,
    last_refreshed_at: Timestamp,
}

impl Country {
    /// Joins an upstream entry with its exchange rate.
    ///
    /// The GDP estimate is present exactly when the rate is.
    #[must_use]
    pub fn from_raw(
        raw: RawCountry,
        exchange_rate: Option<f64>,
        per_capita_factor: f64,
        refreshed_at: Timestamp,
    ) -> Self {
        let estimated_gdp =
            exchange_rate.map(|rate| estimate_gdp(raw.population, rate, per_capita_factor));
        Self {
            id: Uuid::new_v4(),
            name: raw.name,
            capital: raw.capital,
            region: raw.region,
            population: raw.population,
            currency_code: raw.currency_code,
            exchange_rate,
            estimated_gdp,
            flag_url: raw.flag_url,
            last_refreshed_at: refreshed_at,
        }
    }

    /// Returns a builder, used when reconstructing records from storage.
    #[must_use]
    pub fn builder(name: impl Into<String>, population: u64) -> CountryBuilder {
        CountryBuilder::new(name, population)
    }

    /// Returns the record ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the country name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the capital.
    #[inline]
    #[must_use]
    pub fn capital(&self) -> Option<&str> {
        self.capital.as_deref()
    }

    /// Returns the region.
    #[inline]
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Returns the population.
    #[inline]
    #[must_use]
    pub fn population(&self) -> u64 {
        self.population
    }

    /// Returns the currency code.
    #[inline]
    #[must_use]
    pub fn currency_code(&self) -> Option<&CurrencyCode> {
        self.currency_code.as_ref()
    }

    /// Returns the exchange rate to the base currency.
    #[inline]
    #[must_use]
    pub fn exchange_rate(&self) -> Option<f64> {
        self.exchange_rate
    }

    /// Returns the GDP estimate.
    #[inline]
    #[must_use]
    pub fn estimated_gdp(&self) -> Option<f64> {
        self.estimated_gdp
    }

    /// Returns the flag URL.
    #[inline]
    #[must_use]
    pub fn flag_url(&self) -> Option<&str> {
        self.flag_url.as_deref()
    }

    /// Returns when the refresh that wrote this record committed.
    #[inline]
    #[must_use]
    pub fn last_refreshed_at(&self) -> Timestamp {
        self.last_refreshed_at
    }
}

/// Orders two countries for a listing.
///
/// - `GdpDesc`: GDP descending, countries without an estimate last
/// - `PopDesc`: population descending
/// - `None`: name ascending
///
/// Ties always fall back to name ascending, so the order is total.
#[must_use]
pub fn listing_order(sort: Option<CountrySort>, a: &Country, b: &Country) -> Ordering {
    let primary = match sort {
        Some(CountrySort::GdpDesc) => match (a.estimated_gdp, b.estimated_gdp) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        Some(CountrySort::PopDesc) => b.population.cmp(&a.population),
        None => Ordering::Equal,
    };
    primary.then_with(|| a.name.cmp(&b.name))
}

/// Sorts countries in place for a listing. See [`listing_order`].
pub fn sort_countries(countries: &mut [Country], sort: Option<CountrySort>) {
    countries.sort_by(|a, b| listing_order(sort, a, b));
}

/// Builder for [`Country`].
#[derive(Debug, Clone)]
pub struct CountryBuilder {
    inner: Country,
}

impl CountryBuilder {
    /// Creates a builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, population: u64) -> Self {
        Self {
            inner: Country {
                id: Uuid::new_v4(),
                name: name.into(),
                capital: None,
                region: None,
                population,
                currency_code: None,
                exchange_rate: None,
                estimated_gdp: None,
                flag_url: None,
                last_refreshed_at: Timestamp::now(),
            },
        }
    }

    /// Sets the record ID.
    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.inner.id = id;
        self
    }

    /// Sets the capital.
    #[must_use]
    pub fn capital(mut self, capital: Option<String>) -> Self {
        self.inner.capital = capital;
        self
    }

    /// Sets the region.
    #[must_use]
    pub fn region(mut self, region: Option<String>) -> Self {
        self.inner.region = region;
        self
    }

    /// Sets the currency code.
    #[must_use]
    pub fn currency_code(mut self, code: Option<CurrencyCode>) -> Self {
        self.inner.currency_code = code;
        self
    }

    /// Sets the exchange rate.
    #[must_use]
    pub fn exchange_rate(mut self, rate: Option<f64>) -> Self {
        self.inner.exchange_rate = rate;
        self
    }

    /// Sets the GDP estimate.
    #[must_use]
    pub fn estimated_gdp(mut self, gdp: Option<f64>) -> Self {
        self.inner.estimated_gdp = gdp;
        self
    }

    /// Sets the flag URL.
    #[must_use]
    pub fn flag_url(mut self, url: Option<String>) -> Self {
        self.inner.flag_url = url;
        self
    }

    /// Sets the refresh commit time.
    #[must_use]
    pub fn last_refreshed_at(mut self, at: Timestamp) -> Self {
        self.inner.last_refreshed_at = at;
        self
    }

    /// Builds the record.
    #[must_use]
    pub fn build(self) -> Country {
        self.inner
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn country(name: &str, population: u64, gdp: Option<f64>) -> Country {
        Country::builder(name, population).estimated_gdp(gdp).build()
    }

    fn names(countries: &[Country]) -> Vec<&str> {
        countries.iter().map(Country::name).collect()
    }

    #[test]
    fn from_raw_with_rate_computes_gdp() {
        let raw = RawCountry::new("Nigeria", 200)
            .with_region("Africa")
            .with_currency(CurrencyCode::new("NGN").unwrap());
        let at = Timestamp::from_millis(1_700_000_000_000).unwrap();

        let c = Country::from_raw(raw, Some(0.002), 1500.0, at);

        assert_eq!(c.name(), "Nigeria");
        assert_eq!(c.region(), Some("Africa"));
        assert_eq!(c.exchange_rate(), Some(0.002));
        assert_eq!(c.estimated_gdp(), Some(200.0 * 1500.0 * 0.002));
        assert_eq!(c.last_refreshed_at(), at);
    }

    #[test]
    fn from_raw_without_rate_leaves_gdp_null() {
        let raw = RawCountry::new("Antarctica", 1000);
        let c = Country::from_raw(raw, None, 1500.0, Timestamp::now());
        assert_eq!(c.exchange_rate(), None);
        assert_eq!(c.estimated_gdp(), None);
    }

    #[test]
    fn gdp_desc_puts_nulls_last() {
        let mut list = vec![
            country("B", 10, None),
            country("A", 10, Some(5.0)),
            country("C", 10, Some(50.0)),
            country("D", 10, None),
        ];
        sort_countries(&mut list, Some(CountrySort::GdpDesc));
        assert_eq!(names(&list), vec!["C", "A", "B", "D"]);
    }

    #[test]
    fn pop_desc_ties_break_by_name() {
        let mut list = vec![
            country("Zed", 5, None),
            country("Alpha", 5, None),
            country("Big", 50, None),
        ];
        sort_countries(&mut list, Some(CountrySort::PopDesc));
        assert_eq!(names(&list), vec!["Big", "Alpha", "Zed"]);
    }

    #[test]
    fn default_order_is_by_name() {
        let mut list = vec![country("Chad", 1, None), country("Benin", 9, Some(1.0))];
        sort_countries(&mut list, None);
        assert_eq!(names(&list), vec!["Benin", "Chad"]);
    }
}
