//! Filter operations
//!
//! This module provides the spatial filters and the kernels they are built on.

/// Filter kernels
pub mod kernels;

/// Convolution over a square neighborhood
mod convolution;
pub use convolution::*;

/// Filter processors
mod ops;
pub use ops::*;
