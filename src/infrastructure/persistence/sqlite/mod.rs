//! # SQLite Persistence
//!
//! SQLite implementation of the country store using sqlx.

pub mod country_repository;
pub mod schema;

pub use country_repository::SqliteCountryRepository;
pub use schema::connect;
