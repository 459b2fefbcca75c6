use retouch_image::{Image, ImageError, Pixel};

use super::convolution::{convolve_abs_skip_border, convolve_skip_border, mean_skip_border};
use super::kernels::{self, Kernel, KernelSize, SOBEL_X, SOBEL_Y};
use crate::core::clamp_u8;
use crate::parallel::{self, ExecutionStrategy};
use crate::processor::ImageProcessor;

/// Default sigma of the gaussian blur.
pub const DEFAULT_SIGMA: f64 = 1.0;

/// Blur an image by averaging every pixel with its neighborhood.
///
/// Neighbors outside the image are skipped and the average is taken over the
/// taps actually used. Output pixels are fully opaque.
///
/// # Examples
///
/// ```
/// use retouch_image::{Image, ImageSize, Pixel};
/// use retouch_imgproc::filter::MeanFilter;
/// use retouch_imgproc::ImageProcessor;
///
/// let white = Image::from_size_val(ImageSize { width: 3, height: 3 }, Pixel::rgb(255, 255, 255));
/// let blurred = MeanFilter::new(3).unwrap().process(&white).unwrap();
/// assert_eq!(blurred, white);
/// ```
#[derive(Debug, Clone)]
pub struct MeanFilter {
    kernel_size: KernelSize,
    strategy: ExecutionStrategy,
}

impl MeanFilter {
    /// Create a mean filter. An even `kernel_size` is promoted to the next odd value.
    ///
    /// # Errors
    ///
    /// A kernel size of zero is rejected.
    pub fn new(kernel_size: usize) -> Result<Self, ImageError> {
        Ok(Self {
            kernel_size: KernelSize::new(kernel_size)?,
            strategy: ExecutionStrategy::default(),
        })
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The effective, odd, kernel size.
    pub fn kernel_size(&self) -> usize {
        self.kernel_size.get()
    }
}

impl Default for MeanFilter {
    fn default() -> Self {
        Self {
            kernel_size: KernelSize::default(),
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl ImageProcessor for MeanFilter {
    fn name(&self) -> &'static str {
        "MeanFilter"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        mean_skip_border(image, self.kernel_size, self.strategy)
    }
}

/// Blur an image with a normalized gaussian kernel.
///
/// Neighbors outside the image are skipped without renormalizing the kernel,
/// which darkens the border of the output. Output pixels are fully opaque.
#[derive(Debug, Clone)]
pub struct GaussianFilter {
    kernel: Kernel,
    sigma: f64,
    strategy: ExecutionStrategy,
}

impl GaussianFilter {
    /// Create a gaussian filter. An even `kernel_size` is promoted to the next odd value.
    ///
    /// # Errors
    ///
    /// The kernel size must be non-zero and `sigma` finite and strictly positive.
    pub fn new(kernel_size: usize, sigma: f64) -> Result<Self, ImageError> {
        let kernel = kernels::gaussian_kernel_2d(KernelSize::new(kernel_size)?, sigma)?;
        Ok(Self {
            kernel,
            sigma,
            strategy: ExecutionStrategy::default(),
        })
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The effective, odd, kernel size.
    pub fn kernel_size(&self) -> usize {
        self.kernel.size().get()
    }

    /// The sigma of the kernel.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// The normalized kernel applied by the filter.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

impl ImageProcessor for GaussianFilter {
    fn name(&self) -> &'static str {
        "GaussianFilter"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        convolve_skip_border(image, &self.kernel, self.strategy)
    }
}

/// Detect edges with the 3x3 four-neighbor Laplacian.
///
/// Every color channel is convolved with the Laplacian and the magnitude of
/// the response is kept. Neighbors outside the image are skipped, so flat
/// regions touching the border respond too. Output pixels are fully opaque;
/// run [`crate::color::GrayScale`] first for a single edge map.
#[derive(Debug, Clone)]
pub struct LaplacianEdgeDetection {
    kernel: Kernel,
    strategy: ExecutionStrategy,
}

impl LaplacianEdgeDetection {
    /// Create a Laplacian edge detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for LaplacianEdgeDetection {
    fn default() -> Self {
        Self {
            kernel: kernels::laplacian_kernel_2d(),
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl ImageProcessor for LaplacianEdgeDetection {
    fn name(&self) -> &'static str {
        "LaplacianEdgeDetection"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        convolve_abs_skip_border(image, &self.kernel, self.strategy)
    }
}

/// Detect edges with the 3x3 Sobel operator.
///
/// The gradients are read from the grayscale image given at construction (its
/// red channel); the image passed to [`ImageProcessor::process`] only sets the
/// output size. Only interior pixels are written, with `r = g = b = a` set to
/// the gradient magnitude; the one pixel wide border keeps the default,
/// fully transparent, pixel.
#[derive(Debug, Clone)]
pub struct SobelEdgeDetection {
    gray: Image,
    strategy: ExecutionStrategy,
}

impl SobelEdgeDetection {
    /// Create an edge detector reading its gradients from `gray`.
    pub fn new(gray: Image) -> Self {
        Self {
            gray,
            strategy: ExecutionStrategy::default(),
        }
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The grayscale image the gradients are read from.
    pub fn gray(&self) -> &Image {
        &self.gray
    }

    /// Gradient magnitude at the interior pixel `(x, y)`.
    fn magnitude(&self, x: usize, y: usize) -> Result<u8, ImageError> {
        let (mut gx, mut gy) = (0i32, 0i32);
        for (ky, (row_x, row_y)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
            for kx in 0..3 {
                let v = self.gray.get_pixel(x + kx - 1, y + ky - 1)?.r as i32;
                gx += v * row_x[kx];
                gy += v * row_y[kx];
            }
        }
        Ok(clamp_u8(((gx * gx + gy * gy) as f64).sqrt()))
    }
}

impl ImageProcessor for SobelEdgeDetection {
    fn name(&self) -> &'static str {
        "SobelEdgeDetection"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        let (width, height) = (image.width(), image.height());
        let mut dst = Image::from_size(image.size());

        if width < 3 || height < 3 {
            return Ok(dst);
        }

        parallel::try_fill_rows(&mut dst, self.strategy, |y, row| {
            if y == 0 || y == height - 1 {
                return Ok(());
            }
            for (x, dst_pixel) in row.iter_mut().enumerate().take(width - 1).skip(1) {
                let m = self.magnitude(x, y)?;
                *dst_pixel = Pixel::gray(m, m);
            }
            Ok(())
        })?;

        Ok(dst)
    }
}
