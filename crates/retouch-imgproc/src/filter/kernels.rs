use retouch_image::ImageError;

/// The 3x3 Sobel kernel for the horizontal derivative, indexed `[row][col]`.
pub const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// The 3x3 Sobel kernel for the vertical derivative, indexed `[row][col]`.
pub const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// The 3x3 four-neighbor Laplacian kernel.
pub const LAPLACIAN: [[i32; 3]; 3] = [[0, 1, 0], [1, -4, 1], [0, 1, 0]];

/// Default kernel size of the blur filters.
pub const DEFAULT_KERNEL_SIZE: usize = 3;

/// The side length of a square kernel. Always odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelSize(usize);

impl KernelSize {
    /// Create a kernel size, promoting an even `size` to the next odd value.
    ///
    /// # Errors
    ///
    /// A size of zero is rejected, as is a size whose weight buffer would not
    /// be addressable.
    ///
    /// # Examples
    ///
    /// ```
    /// use retouch_imgproc::filter::kernels::KernelSize;
    ///
    /// assert_eq!(KernelSize::new(4).unwrap().get(), 5);
    /// assert_eq!(KernelSize::new(3).unwrap().get(), 3);
    /// ```
    pub fn new(size: usize) -> Result<Self, ImageError> {
        if size == 0 {
            return Err(ImageError::InvalidArgument(
                "kernel size must be > 0".to_string(),
            ));
        }
        let size = if size % 2 == 1 { size } else { size + 1 };
        size.checked_mul(size)
            .and_then(|n| n.checked_mul(std::mem::size_of::<f64>()))
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(|| ImageError::InvalidArgument(format!("kernel size {size} is too large")))?;
        Ok(Self(size))
    }

    /// The side length.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Distance from the center tap to the kernel border, `size / 2`.
    pub fn offset(&self) -> usize {
        self.0 / 2
    }
}

impl Default for KernelSize {
    fn default() -> Self {
        Self(DEFAULT_KERNEL_SIZE)
    }
}

/// A square weight matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: KernelSize,
    weights: Vec<f64>,
}

impl Kernel {
    /// The kernel size.
    pub fn size(&self) -> KernelSize {
        self.size
    }

    /// All weights, row-major.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at the signed offset `(kx, ky)` from the kernel center, or
    /// `None` if the offset lies outside the kernel.
    pub fn weight(&self, kx: isize, ky: isize) -> Option<f64> {
        let offset = self.size.offset() as isize;
        let range = -offset..=offset;
        if !range.contains(&kx) || !range.contains(&ky) {
            return None;
        }
        let row = (ky + offset) as usize;
        let col = (kx + offset) as usize;
        self.weights.get(row * self.size.get() + col).copied()
    }

    /// The weights of the kernel row at signed offset `ky`, or `None` outside the kernel.
    pub fn row(&self, ky: isize) -> Option<&[f64]> {
        let offset = self.size.offset() as isize;
        if !(-offset..=offset).contains(&ky) {
            return None;
        }
        let start = (ky + offset) as usize * self.size.get();
        self.weights.get(start..start + self.size.get())
    }

    /// Sum of all the weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Create a box blur kernel where every tap weighs `1 / size²`.
pub fn box_kernel_2d(size: KernelSize) -> Kernel {
    let n = size.get() * size.get();
    Kernel {
        size,
        weights: vec![1.0 / n as f64; n],
    }
}

/// Create the 3x3 four-neighbor Laplacian kernel.
pub fn laplacian_kernel_2d() -> Kernel {
    Kernel {
        size: KernelSize(3),
        weights: LAPLACIAN.iter().flatten().map(|&w| w as f64).collect(),
    }
}

/// Create a normalized gaussian blur kernel.
///
/// weight(x, y) = exp(-(x² + y²) / (2σ²)), divided by the sum of all weights.
/// The center weight is exactly 1 before normalization, so the kernel stays
/// finite when `2σ²` underflows to zero or overflows to infinity.
///
/// # Arguments
///
/// * `size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Errors
///
/// `sigma` must be finite and strictly positive.
pub fn gaussian_kernel_2d(size: KernelSize, sigma: f64) -> Result<Kernel, ImageError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ImageError::InvalidArgument(format!(
            "sigma must be a positive number, got {sigma}"
        )));
    }

    let offset = size.offset() as isize;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut weights = Vec::with_capacity(size.get() * size.get());

    // compute the kernel
    for y in -offset..=offset {
        for x in -offset..=offset {
            let w = if x == 0 && y == 0 {
                1.0
            } else {
                let (fx, fy) = (x as f64, y as f64);
                (-(fx * fx + fy * fy) / two_sigma_sq).exp()
            };
            weights.push(w);
        }
    }

    // normalize the kernel
    let norm = weights.iter().sum::<f64>();
    weights.iter_mut().for_each(|w| *w /= norm);

    log::trace!("gaussian kernel {}x{} sigma {sigma}: {weights:?}", size.get(), size.get());

    Ok(Kernel { size, weights })
}
