//! # In-Memory Repositories
//!
//! In-memory implementations for testing without database dependencies.
//!
//! ## Thread Safety
//!
//! Records live behind `Arc<RwLock<...>>`; a bulk replace swaps the whole
//! map under one write lock.

pub mod country_repository;

pub use country_repository::InMemoryCountryRepository;
