//! # Application Layer
//!
//! Use-case orchestration on top of the domain and infrastructure layers.
//!
//! - [`error`]: `ApplicationError`, mapped to HTTP statuses by the REST layer
//! - [`services`]: refresh orchestration and summary statistics

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{RefreshConfig, RefreshResult, RefreshService};
