//! # Infrastructure Layer
//!
//! Adapters for everything outside the process.
//!
//! - [`sources`]: upstream country catalog and exchange-rate APIs
//! - [`persistence`]: country store (in-memory and SQLite)
//! - [`rendering`]: summary image renderer and image slot

pub mod persistence;
pub mod rendering;
pub mod sources;
