//! # Country Cache
//!
//! Caches country metadata joined with exchange rates, derives a GDP
//! estimate per country and serves the result over REST together with a
//! rendered summary image.
//!
//! # Architecture
//!
//! - [`domain`]: country records, query values and validation
//! - [`application`]: refresh orchestration and application errors
//! - [`infrastructure`]: upstream adapters, country store, image rendering
//! - [`api`]: axum REST surface
//! - [`config`]: layered configuration
//! - [`telemetry`]: tracing subscriber setup
//!
//! # Refresh pipeline
//!
//! ```text
//! POST /countries/refresh
//!   -> CountrySource::fetch_countries
//!   -> unique currency codes
//!   -> ExchangeRateSource::fetch_rates (bounded concurrent fan-out)
//!   -> join + GDP estimate
//!   -> CountryRepository::replace_all (one transaction)
//!   -> SummaryRenderer + ImageStore
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
