use std::ops::RangeInclusive;

use retouch_image::{Image, ImageError, Pixel};

use super::kernels::{Kernel, KernelSize};
use crate::core::clamp_u8;
use crate::parallel::{self, ExecutionStrategy};

/// Signed tap offsets around `center` that stay inside `[0, len)`.
///
/// Taps falling outside the image are skipped rather than padded.
fn taps(center: usize, offset: usize, len: usize) -> RangeInclusive<isize> {
    let lo = offset.min(center) as isize;
    let hi = offset.min(len - 1 - center) as isize;
    -lo..=hi
}

/// Convolve the color channels of `src` with `kernel`.
///
/// Out-of-bounds taps are skipped and the remaining weights are not
/// renormalized, so border pixels see a partial weight sum. The alpha channel
/// is not filtered; every output pixel is fully opaque.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The square kernel to apply.
/// * `strategy` - How rows are scheduled.
pub fn convolve_skip_border(
    src: &Image,
    kernel: &Kernel,
    strategy: ExecutionStrategy,
) -> Result<Image, ImageError> {
    convolve_with(src, kernel, strategy, clamp_u8)
}

/// Convolve like [`convolve_skip_border`] but keep the magnitude of the response.
///
/// Used by derivative kernels whose weights sum to zero, where negative
/// responses are as meaningful as positive ones.
pub fn convolve_abs_skip_border(
    src: &Image,
    kernel: &Kernel,
    strategy: ExecutionStrategy,
) -> Result<Image, ImageError> {
    convolve_with(src, kernel, strategy, |v| clamp_u8(v.abs()))
}

fn convolve_with<F>(
    src: &Image,
    kernel: &Kernel,
    strategy: ExecutionStrategy,
    finish: F,
) -> Result<Image, ImageError>
where
    F: Fn(f64) -> u8 + Send + Sync,
{
    let (width, height) = (src.width(), src.height());
    let offset = kernel.size().offset();
    let src_data = src.as_slice();

    let mut dst = Image::from_size(src.size());
    parallel::try_fill_rows(&mut dst, strategy, |y, row| {
        let rows = taps(y, offset, height);
        for (x, dst_pixel) in row.iter_mut().enumerate() {
            let mut sum = [0.0f64; 3];
            for ky in rows.clone() {
                let line = (y as isize + ky) as usize * width;
                let weights = kernel.row(ky).ok_or_else(|| {
                    ImageError::InvalidArgument(format!("kernel row {ky} out of range"))
                })?;
                for kx in taps(x, offset, width) {
                    let p = &src_data[line + (x as isize + kx) as usize];
                    let w = weights[(kx + offset as isize) as usize];
                    sum[0] += p.r as f64 * w;
                    sum[1] += p.g as f64 * w;
                    sum[2] += p.b as f64 * w;
                }
            }
            *dst_pixel = Pixel::rgb(finish(sum[0]), finish(sum[1]), finish(sum[2]));
        }
        Ok(())
    })?;

    Ok(dst)
}

/// Average the color channels of `src` over a square neighborhood.
///
/// Only in-bounds taps are averaged, so the divisor shrinks near the border.
/// The alpha channel is not filtered; every output pixel is fully opaque.
pub fn mean_skip_border(
    src: &Image,
    kernel_size: KernelSize,
    strategy: ExecutionStrategy,
) -> Result<Image, ImageError> {
    let (width, height) = (src.width(), src.height());
    let offset = kernel_size.offset();
    let src_data = src.as_slice();

    let mut dst = Image::from_size(src.size());
    parallel::try_fill_rows(&mut dst, strategy, |y, row| {
        let rows = taps(y, offset, height);
        for (x, dst_pixel) in row.iter_mut().enumerate() {
            let cols = taps(x, offset, width);
            let mut sum = [0u64; 3];
            let mut count = 0u64;
            for ky in rows.clone() {
                let line = (y as isize + ky) as usize * width;
                for kx in cols.clone() {
                    let p = &src_data[line + (x as isize + kx) as usize];
                    sum[0] += p.r as u64;
                    sum[1] += p.g as u64;
                    sum[2] += p.b as u64;
                    count += 1;
                }
            }
            let n = count as f64;
            *dst_pixel = Pixel::rgb(
                clamp_u8(sum[0] as f64 / n),
                clamp_u8(sum[1] as f64 / n),
                clamp_u8(sum[2] as f64 / n),
            );
        }
        Ok(())
    })?;

    Ok(dst)
}
