/// An error type for the image and filtering modules.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when an argument is not meaningful for the operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error when a pixel coordinate falls outside the image.
    #[error("Pixel index ({0}, {1}) is out of bounds for an image of size ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the number of histogram bins is not in `1..=256`.
    #[error("Invalid number of histogram bins: {0}")]
    InvalidHistogramBins(usize),
}
