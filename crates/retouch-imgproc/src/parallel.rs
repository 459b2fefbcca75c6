use rayon::prelude::*;
use thiserror::Error;

use retouch_image::{Image, ImageError, Pixel};

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// Input and output sizes do not match.
    #[error("source and destination images must have the same size")]
    SizeMismatch,

    /// The strategy name could not be parsed.
    #[error("unknown execution strategy: {0}")]
    UnknownStrategy(String),
}

impl From<ParallelError> for ImageError {
    fn from(e: ParallelError) -> Self {
        ImageError::InvalidArgument(e.to_string())
    }
}

/// Controls how the per-row work of a processor is executed.
///
/// Every strategy produces byte-identical output since each output pixel only
/// depends on the input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl std::fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ExecutionStrategy::ParallelRows => write!(f, "rows"),
            ExecutionStrategy::Serial => write!(f, "serial"),
            ExecutionStrategy::Fixed(n) => write!(f, "fixed:{n}"),
        }
    }
}

impl std::str::FromStr for ExecutionStrategy {
    type Err = ParallelError;

    /// Parse `serial`, `rows` or `fixed:<threads>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serial" => Ok(ExecutionStrategy::Serial),
            "rows" => Ok(ExecutionStrategy::ParallelRows),
            _ => {
                let threads = s
                    .strip_prefix("fixed:")
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or_else(|| ParallelError::UnknownStrategy(s.to_string()))?;
                if threads == 0 {
                    return Err(ParallelError::InvalidThreadCount(threads));
                }
                Ok(ExecutionStrategy::Fixed(threads))
            }
        }
    }
}

/// Fill the rows of `dst` by calling `f` with the row index and the row pixels.
///
/// Rows are visited in parallel unless the strategy is [`ExecutionStrategy::Serial`].
/// The first error returned by `f` aborts the pass and is propagated.
pub fn try_fill_rows<F>(dst: &mut Image, strategy: ExecutionStrategy, f: F) -> Result<(), ImageError>
where
    F: Fn(usize, &mut [Pixel]) -> Result<(), ImageError> + Send + Sync,
{
    let width = dst.width();
    if width == 0 {
        return Ok(());
    }
    let data = dst.as_slice_mut();

    match strategy {
        ExecutionStrategy::Serial => data
            .chunks_mut(width)
            .enumerate()
            .try_for_each(|(y, row)| f(y, row)),
        ExecutionStrategy::ParallelRows => data
            .par_chunks_mut(width)
            .enumerate()
            .try_for_each(|(y, row)| f(y, row)),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                data.par_chunks_mut(width)
                    .enumerate()
                    .try_for_each(|(y, row)| f(y, row))
            })
        }
    }
}

/// Apply a function to each pixel of `src`, writing the result to the same
/// position of `dst`.
pub fn map_pixels<F>(
    src: &Image,
    dst: &mut Image,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ImageError>
where
    F: Fn(&Pixel) -> Pixel + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ParallelError::SizeMismatch.into());
    }

    let width = src.width();
    let src_data = src.as_slice();

    try_fill_rows(dst, strategy, |y, row| {
        let src_row = &src_data[y * width..(y + 1) * width];
        row.iter_mut()
            .zip(src_row.iter())
            .for_each(|(dst_pixel, src_pixel)| *dst_pixel = f(src_pixel));
        Ok(())
    })
}
