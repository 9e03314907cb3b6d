//! # Upstream Sources
//!
//! Adapters for the two external APIs a refresh reads from.
//!
//! ## Ports
//!
//! - [`CountrySource`]: country catalog
//! - [`ExchangeRateSource`]: per-currency exchange rates
//!
//! ## Implementations
//!
//! - [`RestCountriesSource`]: REST Countries v2 style catalog
//! - [`OpenErApiSource`]: Open ER API style rates, fetched concurrently

pub mod error;
pub mod http_client;
pub mod open_er_api;
pub mod rest_countries;
pub mod traits;

pub use error::{SourceError, SourceResult};
pub use http_client::HttpClient;
pub use open_er_api::OpenErApiSource;
pub use rest_countries::RestCountriesSource;
pub use traits::{CountrySource, ExchangeRateSource, RateTable};
