//! # Summary Rendering
//!
//! Summary image generation and the slot that holds the latest image.
//!
//! - [`traits`]: `SummaryRenderer` and `ImageStore` ports
//! - [`png`]: PNG renderer built on the `image` crate
//! - [`image_store`]: file and in-memory slots

pub mod error;
pub mod image_store;
pub mod png;
pub mod traits;

pub use error::{RenderError, RenderResult};
pub use image_store::{FileImageStore, InMemoryImageStore};
pub use png::PngSummaryRenderer;
pub use traits::{ImageStore, SummaryRenderer, SummaryStats};
