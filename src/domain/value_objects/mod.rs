//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`CurrencyCode`]: normalised three-letter currency identifier
//! - [`Timestamp`]: UTC instant with millisecond precision
//! - [`CountryFilter`], [`CountrySort`]: listing options
//! - [`RefreshStatus`]: derived store status

pub mod country_query;
pub mod currency_code;
pub mod refresh_status;
pub mod timestamp;

pub use country_query::{CountryFilter, CountrySort};
pub use currency_code::CurrencyCode;
pub use refresh_status::RefreshStatus;
pub use timestamp::Timestamp;
