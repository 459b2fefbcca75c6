#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// processor configuration module.
pub mod config;

/// image basic operations module.
pub mod core;

/// image filtering module.
pub mod filter;

/// histogram computation and equalization module.
pub mod histogram;

/// pointwise intensity transformations module.
pub mod intensity;

/// module containing parallization utilities.
pub mod parallel;

/// the common processor contract.
pub mod processor;

pub use crate::processor::{Chain, ImageProcessor};
