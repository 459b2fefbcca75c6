use retouch_image::{Image, ImageError, Pixel};

use crate::core::clamp_u8;
use crate::parallel::{self, ExecutionStrategy};
use crate::processor::ImageProcessor;

/// Define the RGB weights for the grayscale conversion.
const RW: f64 = 0.299;
const GW: f64 = 0.587;
const BW: f64 = 0.114;

/// Compute the luma of a pixel using the formula:
///
/// Y = clamp(round(0.299 * R + 0.587 * G + 0.114 * B))
///
/// # Example
///
/// ```
/// use retouch_image::Pixel;
/// use retouch_imgproc::color::luma;
///
/// assert_eq!(luma(&Pixel::rgb(255, 0, 0)), 76);
/// ```
pub fn luma(pixel: &Pixel) -> u8 {
    clamp_u8(RW * pixel.r as f64 + GW * pixel.g as f64 + BW * pixel.b as f64)
}

/// Convert an image to grayscale, writing the luma to the three color channels.
///
/// Alpha is preserved.
#[derive(Debug, Clone, Default)]
pub struct GrayScale {
    strategy: ExecutionStrategy,
}

impl GrayScale {
    /// Create a new grayscale conversion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl ImageProcessor for GrayScale {
    fn name(&self) -> &'static str {
        "GrayScale"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        let mut dst = Image::from_size(image.size());

        // parallelize the grayscale conversion by rows
        parallel::map_pixels(image, &mut dst, self.strategy, |p| {
            Pixel::gray(luma(p), p.a)
        })?;

        Ok(dst)
    }
}
