use rayon::prelude::*;

use retouch_image::{Image, ImageError, Pixel};

use crate::color::luma;
use crate::core::clamp_u8;
use crate::parallel::{self, ExecutionStrategy};
use crate::processor::ImageProcessor;

/// The pixel component a histogram is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// The red channel.
    Red,
    /// The green channel.
    Green,
    /// The blue channel.
    Blue,
    /// The alpha channel.
    Alpha,
    /// The weighted grayscale value of the color channels.
    Luma,
}

impl Channel {
    fn value(&self, p: &Pixel) -> u8 {
        match self {
            Channel::Red => p.r,
            Channel::Green => p.g,
            Channel::Blue => p.b,
            Channel::Alpha => p.a,
            Channel::Luma => luma(p),
        }
    }
}

/// Compute the intensity histogram of one channel of an image.
///
/// The counts are added to `hist`, so a histogram can be accumulated over
/// several images.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
/// * `channel` - The channel to count.
/// * `hist` - The output histogram.
/// * `num_bins` - The number of bins to use for the histogram.
///
/// # Errors
///
/// Returns an error if the number of bins is not in `1..=256` or does not
/// match the length of `hist`.
///
/// # Example
///
/// ```
/// use retouch_image::{Image, ImageSize, Pixel};
/// use retouch_imgproc::histogram::{compute_histogram, Channel};
///
/// let data = [0, 2, 4, 128, 130, 132, 254, 255, 255]
///     .iter()
///     .map(|&v| Pixel::gray(v, 255))
///     .collect();
/// let image = Image::new(ImageSize { width: 3, height: 3 }, data).unwrap();
///
/// let mut histogram = vec![0; 3];
/// compute_histogram(&image, Channel::Red, &mut histogram, 3).unwrap();
/// assert_eq!(histogram, vec![3, 3, 3]);
/// ```
pub fn compute_histogram(
    src: &Image,
    channel: Channel,
    hist: &mut [usize],
    num_bins: usize,
) -> Result<(), ImageError> {
    if num_bins == 0 || num_bins > 256 || hist.len() != num_bins {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    let mut bin_lut = [0usize; 256];
    for (i, bin) in bin_lut.iter_mut().enumerate() {
        *bin = (i * num_bins) >> 8;
    }

    let counts = src
        .as_slice()
        .par_chunks(4096)
        .fold(
            || vec![0usize; num_bins],
            |mut local, chunk| {
                for p in chunk {
                    local[bin_lut[channel.value(p) as usize]] += 1;
                }
                local
            },
        )
        .reduce(
            || vec![0usize; num_bins],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        );

    hist.iter_mut().zip(counts).for_each(|(h, c)| *h += c);

    Ok(())
}

/// Build the lookup table that flattens the cumulative distribution of `hist`.
///
/// The smallest occupied intensity maps to 0 and the largest to 255. A
/// histogram with a single occupied intensity yields the identity table.
fn equalization_lut(hist: &[usize; 256]) -> [u8; 256] {
    let total: usize = hist.iter().sum();
    let cdf_min = hist.iter().copied().find(|&c| c > 0).unwrap_or(0);

    let mut lut = [0u8; 256];
    if total == cdf_min {
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = i as u8;
        }
        return lut;
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut cdf = 0usize;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        cdf += count;
        *entry = clamp_u8(cdf.saturating_sub(cdf_min) as f64 * scale);
    }
    lut
}

/// Spread the intensities of every color channel over the full `0..=255` range.
///
/// Each of the red, green and blue channels is equalized independently from
/// its own histogram. Alpha is preserved.
#[derive(Debug, Clone, Default)]
pub struct HistogramEqualization {
    strategy: ExecutionStrategy,
}

impl HistogramEqualization {
    /// Create a new histogram equalization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl ImageProcessor for HistogramEqualization {
    fn name(&self) -> &'static str {
        "HistogramEqualization"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        let mut luts = [[0u8; 256]; 3];
        for (lut, channel) in luts
            .iter_mut()
            .zip([Channel::Red, Channel::Green, Channel::Blue])
        {
            let mut hist = [0usize; 256];
            compute_histogram(image, channel, &mut hist, 256)?;
            *lut = equalization_lut(&hist);
        }

        let [lut_r, lut_g, lut_b] = luts;
        let mut dst = Image::from_size(image.size());
        parallel::map_pixels(image, &mut dst, self.strategy, |p| {
            Pixel::rgba(
                lut_r[p.r as usize],
                lut_g[p.g as usize],
                lut_b[p.b as usize],
                p.a,
            )
        })?;

        Ok(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_image(width: usize, values: &[u8]) -> Result<Image, ImageError> {
        let data = values.iter().map(|&v| Pixel::gray(v, 255)).collect();
        Image::new([width, values.len() / width].into(), data)
    }

    #[test]
    fn test_compute_histogram() -> Result<(), ImageError> {
        let image = gray_image(3, &[0, 2, 4, 128, 130, 132, 254, 255, 255])?;

        let mut histogram = vec![0; 3];
        compute_histogram(&image, Channel::Red, &mut histogram, 3)?;
        assert_eq!(histogram, vec![3, 3, 3]);

        // counts accumulate across calls
        compute_histogram(&image, Channel::Luma, &mut histogram, 3)?;
        assert_eq!(histogram, vec![6, 6, 6]);

        let mut alpha = vec![0; 256];
        compute_histogram(&image, Channel::Alpha, &mut alpha, 256)?;
        assert_eq!(alpha[255], 9);

        Ok(())
    }

    #[test]
    fn test_compute_histogram_channels() -> Result<(), ImageError> {
        let image = Image::new(
            [2, 1].into(),
            vec![Pixel::rgba(10, 20, 30, 40), Pixel::rgba(10, 200, 30, 40)],
        )?;

        let mut green = vec![0; 256];
        compute_histogram(&image, Channel::Green, &mut green, 256)?;
        assert_eq!(green[20], 1);
        assert_eq!(green[200], 1);

        let mut blue = vec![0; 2];
        compute_histogram(&image, Channel::Blue, &mut blue, 2)?;
        assert_eq!(blue, vec![2, 0]);

        Ok(())
    }

    #[test]
    fn test_compute_histogram_invalid_bins() -> Result<(), ImageError> {
        let image = gray_image(1, &[7])?;
        for (bins, len) in [(0, 0), (257, 257), (4, 3)] {
            let mut histogram = vec![0; len];
            assert_eq!(
                compute_histogram(&image, Channel::Red, &mut histogram, bins),
                Err(ImageError::InvalidHistogramBins(bins))
            );
        }

        Ok(())
    }

    #[test]
    fn test_equalization_stretches_range() -> Result<(), ImageError> {
        let image = gray_image(2, &[10, 20, 30, 40])?;
        let output = HistogramEqualization::new().process(&image)?;

        let values: Vec<u8> = output.as_slice().iter().map(|p| p.r).collect();
        assert_eq!(values, vec![0, 85, 170, 255]);
        assert!(output.as_slice().iter().all(|p| p.r == p.g && p.g == p.b));

        Ok(())
    }

    #[test]
    fn test_equalization_repeated_values() -> Result<(), ImageError> {
        // cdf 2, 3, 4 over the occupied values 50, 60, 70
        let image = gray_image(2, &[50, 50, 60, 70])?;
        let output = HistogramEqualization::new().process(&image)?;

        let values: Vec<u8> = output.as_slice().iter().map(|p| p.r).collect();
        assert_eq!(values, vec![0, 0, 128, 255]);

        Ok(())
    }

    #[test]
    fn test_equalization_channels_independent() -> Result<(), ImageError> {
        let image = Image::new(
            [2, 1].into(),
            vec![Pixel::rgba(0, 100, 9, 3), Pixel::rgba(255, 110, 9, 200)],
        )?;
        let output = HistogramEqualization::new().process(&image)?;

        assert_eq!(output.get_pixel(0, 0)?, Pixel::rgba(0, 0, 9, 3));
        assert_eq!(output.get_pixel(1, 0)?, Pixel::rgba(255, 255, 9, 200));

        Ok(())
    }

    #[test]
    fn test_equalization_flat_image_is_unchanged() -> Result<(), ImageError> {
        let image = Image::from_size_val([4, 4].into(), Pixel::rgba(90, 90, 90, 12));
        let output = HistogramEqualization::new().process(&image)?;
        assert_eq!(output, image);

        Ok(())
    }

    #[test]
    fn test_equalization_strategies_agree() -> Result<(), ImageError> {
        let values: Vec<u8> = (0..64).map(|i| ((i * 37) % 97) as u8).collect();
        let image = gray_image(8, &values)?;

        let serial = HistogramEqualization::new()
            .with_strategy(ExecutionStrategy::Serial)
            .process(&image)?;
        let parallel = HistogramEqualization::new()
            .with_strategy(ExecutionStrategy::Fixed(2))
            .process(&image)?;
        assert_eq!(serial, parallel);

        Ok(())
    }
}
