//! # Domain Entities
//!
//! - [`Country`]: stored country record with its derived GDP estimate
//! - [`RawCountry`]: validated upstream entry awaiting its exchange rate

pub mod country;
pub mod raw_country;

pub use country::{Country, CountryBuilder, estimate_gdp, listing_order, sort_countries};
pub use raw_country::RawCountry;
