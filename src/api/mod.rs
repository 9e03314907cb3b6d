//! # API Layer
//!
//! HTTP surface of the service.
//!
//! - [`rest`]: axum router, handlers and response types

pub mod rest;
