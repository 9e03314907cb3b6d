//! # Domain Layer
//!
//! Core types of the country cache: the stored [`Country`](entities::Country)
//! record, the typed upstream entry, and the value objects used to query
//! and describe the store.
//!
//! This layer has no knowledge of HTTP, SQL, or image encoding.

pub mod entities;
pub mod errors;
pub mod value_objects;
