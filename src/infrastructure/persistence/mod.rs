//! # Persistence Layer
//!
//! ## Repository Traits (Ports)
//!
//! - [`CountryRepository`]: persistence for country records
//!
//! ## Implementations
//!
//! - `in_memory`: in-memory store for tests and ephemeral runs
//! - `sqlite`: SQLite store via sqlx

pub mod in_memory;
pub mod sqlite;
pub mod traits;

pub use in_memory::InMemoryCountryRepository;
pub use sqlite::SqliteCountryRepository;
pub use traits::{CountryRepository, RepositoryError, RepositoryResult};
