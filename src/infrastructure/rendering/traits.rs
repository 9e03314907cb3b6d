//! # Rendering Traits
//!
//! Ports for the summary image: a pure renderer and a single-slot store.

use crate::domain::value_objects::Timestamp;
use crate::infrastructure::rendering::error::RenderResult;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

/// Aggregate statistics drawn on the summary image.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    /// Number of countries written by the refresh.
    pub total: u64,
    /// Countries with the largest GDP estimates, largest first.
    pub top: Vec<(String, f64)>,
    /// Refresh commit timestamp.
    pub refreshed_at: Timestamp,
}

/// Draws [`SummaryStats`] into an encoded image.
///
/// Rendering has no side effects; the same stats always produce the same
/// bytes.
pub trait SummaryRenderer: Send + Sync + fmt::Debug {
    /// Renders the stats and returns the encoded image.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Encoding` if the image cannot be encoded.
    fn render(&self, stats: &SummaryStats) -> RenderResult<Vec<u8>>;

    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str;
}

/// A single overwritable slot holding the latest summary image.
#[async_trait]
pub trait ImageStore: Send + Sync + fmt::Debug {
    /// Replaces the slot content.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Io` if the slot cannot be written.
    async fn put(&self, image: Bytes) -> RenderResult<()>;

    /// Returns the slot content, or `None` if nothing was ever stored.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Io` if the slot exists but cannot be read.
    async fn get(&self) -> RenderResult<Option<Bytes>>;
}
