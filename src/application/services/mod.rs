//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`RefreshService`]: end-to-end refresh of the country store
//! - [`build_summary`]: statistics drawn on the summary image

pub mod refresh;
pub mod summary;

pub use refresh::{RefreshConfig, RefreshResult, RefreshService};
pub use summary::build_summary;
