#![deny(missing_docs)]
//! Raster image types for the retouch filter engine.

/// Error types for the image module.
pub mod error;

/// image representation for filtering purposes.
pub mod image;

/// pixel representation with 8-bit channels.
pub mod pixel;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::pixel::Pixel;
