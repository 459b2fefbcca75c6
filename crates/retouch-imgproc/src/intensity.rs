use retouch_image::{Image, ImageError, Pixel};

use crate::core::build_lut;
use crate::parallel::{self, ExecutionStrategy};
use crate::processor::ImageProcessor;

/// Default gamma of the reference pipeline.
pub const DEFAULT_GAMMA: f64 = 2.6;

/// Default multiplier of the logarithmic transformation.
pub const DEFAULT_LOG_CONSTANT: f64 = 255.0;

/// Map the color channels of every pixel through a lookup table, keeping alpha.
fn apply_lut(
    image: &Image,
    lut: &[u8; 256],
    strategy: ExecutionStrategy,
) -> Result<Image, ImageError> {
    let mut dst = Image::from_size(image.size());
    parallel::map_pixels(image, &mut dst, strategy, |p| {
        p.map_rgb(|c| lut[c as usize])
    })?;
    Ok(dst)
}

/// Invert the color channels of an image, `c' = 255 - c`.
///
/// Alpha is preserved. Applying the transform twice yields the input.
#[derive(Debug, Clone, Default)]
pub struct Negate {
    strategy: ExecutionStrategy,
}

impl Negate {
    /// Create a new negation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl ImageProcessor for Negate {
    fn name(&self) -> &'static str {
        "Negate"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        let mut dst = Image::from_size(image.size());
        parallel::map_pixels(image, &mut dst, self.strategy, |p| {
            Pixel::rgba(255 - p.r, 255 - p.g, 255 - p.b, p.a)
        })?;
        Ok(dst)
    }
}

/// Power-law transform of the color channels:
///
/// c' = clamp(round(255 * (c / 255) ^ gamma))
///
/// A gamma below one brightens the image, above one darkens it. Alpha is preserved.
#[derive(Debug, Clone)]
pub struct GammaTransformation {
    gamma: f64,
    lut: [u8; 256],
    strategy: ExecutionStrategy,
}

impl GammaTransformation {
    /// Create a gamma transformation.
    ///
    /// # Errors
    ///
    /// `gamma` must be finite and strictly positive.
    pub fn new(gamma: f64) -> Result<Self, ImageError> {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(ImageError::InvalidArgument(format!(
                "gamma must be a positive number, got {gamma}"
            )));
        }

        Ok(Self {
            gamma,
            lut: build_lut(|c| 255.0 * (c / 255.0).powf(gamma)),
            strategy: ExecutionStrategy::default(),
        })
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The gamma exponent.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl ImageProcessor for GammaTransformation {
    fn name(&self) -> &'static str {
        "GammaTransformation"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        apply_lut(image, &self.lut, self.strategy)
    }
}

/// Logarithmic transform of the color channels:
///
/// c' = clamp(round(k * ln(1 + c)))
///
/// The multiplier `k` stretches the dark range of the image. Alpha is preserved.
#[derive(Debug, Clone)]
pub struct LogarithmicTransformation {
    constant: f64,
    lut: [u8; 256],
    strategy: ExecutionStrategy,
}

impl LogarithmicTransformation {
    /// Create a logarithmic transformation with multiplier `constant`.
    ///
    /// # Errors
    ///
    /// `constant` must be a finite number.
    pub fn new(constant: f64) -> Result<Self, ImageError> {
        if !constant.is_finite() {
            return Err(ImageError::InvalidArgument(format!(
                "logarithmic constant must be finite, got {constant}"
            )));
        }

        Ok(Self {
            constant,
            lut: build_lut(|c| constant * c.ln_1p()),
            strategy: ExecutionStrategy::default(),
        })
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The multiplier applied to `ln(1 + c)`.
    pub fn constant(&self) -> f64 {
        self.constant
    }
}

impl Default for LogarithmicTransformation {
    fn default() -> Self {
        Self {
            constant: DEFAULT_LOG_CONSTANT,
            lut: build_lut(|c| DEFAULT_LOG_CONSTANT * c.ln_1p()),
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl ImageProcessor for LogarithmicTransformation {
    fn name(&self) -> &'static str {
        "LogarithmicTransformation"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        apply_lut(image, &self.lut, self.strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_image(seed: u64, width: usize, height: usize) -> Result<Image, ImageError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let bytes: Vec<u8> = (0..width * height * 4).map(|_| rng.random()).collect();
        Image::from_rgba8([width, height].into(), &bytes)
    }

    #[test]
    fn test_negate_single_pixel() -> Result<(), ImageError> {
        let image = Image::from_size_val([1, 1].into(), Pixel::rgba(10, 20, 30, 40));
        let negated = Negate::new().process(&image)?;
        assert_eq!(negated.get_pixel(0, 0)?, Pixel::rgba(245, 235, 225, 40));

        Ok(())
    }

    #[test]
    fn test_negate_involutive() -> Result<(), ImageError> {
        let image = random_image(7, 13, 11)?;
        let negate = Negate::new();
        let twice = negate.process(&negate.process(&image)?)?;
        assert_eq!(twice, image);

        Ok(())
    }

    #[test]
    fn test_gamma_identity() -> Result<(), ImageError> {
        let image = random_image(3, 8, 8)?;
        let output = GammaTransformation::new(1.0)?.process(&image)?;
        assert_eq!(output.size(), image.size());
        for (a, b) in image.as_slice().iter().zip(output.as_slice()) {
            for (ca, cb) in a.channels().iter().zip(b.channels().iter()) {
                assert!((*ca as i16 - *cb as i16).abs() <= 1);
            }
            assert_eq!(a.a, b.a);
        }

        Ok(())
    }

    #[test]
    fn test_gamma_brightens_and_darkens() -> Result<(), ImageError> {
        let image = Image::from_size_val([2, 1].into(), Pixel::rgba(128, 0, 255, 9));

        let dark = GammaTransformation::new(DEFAULT_GAMMA)?.process(&image)?;
        let p = dark.get_pixel(1, 0)?;
        // 255 * (128 / 255) ^ 2.6 = 42.49
        assert_eq!(p, Pixel::rgba(42, 0, 255, 9));

        let bright = GammaTransformation::new(0.5)?.process(&image)?;
        // 255 * sqrt(128 / 255) = 180.66
        assert_eq!(bright.get_pixel(0, 0)?, Pixel::rgba(181, 0, 255, 9));

        Ok(())
    }

    #[test]
    fn test_gamma_invalid() {
        for gamma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                GammaTransformation::new(gamma),
                Err(ImageError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_logarithmic() -> Result<(), ImageError> {
        let image = Image::from_size_val([1, 1].into(), Pixel::rgba(0, 1, 255, 77));

        let output = LogarithmicTransformation::new(10.0)?.process(&image)?;
        // 10 * ln(2) = 6.93, 10 * ln(256) = 55.45
        assert_eq!(output.get_pixel(0, 0)?, Pixel::rgba(0, 7, 55, 77));

        let saturated = LogarithmicTransformation::default().process(&image)?;
        assert_eq!(saturated.get_pixel(0, 0)?, Pixel::rgba(0, 177, 255, 77));
        assert_eq!(LogarithmicTransformation::default().constant(), 255.0);

        assert!(LogarithmicTransformation::new(f64::NAN).is_err());

        Ok(())
    }

    #[test]
    fn test_strategies_agree() -> Result<(), ImageError> {
        let image = random_image(11, 31, 17)?;
        let serial = GammaTransformation::new(2.2)?
            .with_strategy(ExecutionStrategy::Serial)
            .process(&image)?;
        let rows = GammaTransformation::new(2.2)?.process(&image)?;
        let fixed = GammaTransformation::new(2.2)?
            .with_strategy(ExecutionStrategy::Fixed(4))
            .process(&image)?;
        assert_eq!(serial, rows);
        assert_eq!(serial, fixed);

        Ok(())
    }
}
