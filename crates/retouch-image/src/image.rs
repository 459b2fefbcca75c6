use crate::error::ImageError;
use crate::pixel::Pixel;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use retouch_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size, saturating at `usize::MAX`.
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Number of pixels covered by the size, or `None` if it overflows `usize`.
    pub fn checked_area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Whether the size covers no pixel at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

fn too_large(size: ImageSize) -> ImageError {
    ImageError::InvalidArgument(format!("{size} overflows the addressable pixel count"))
}

/// Represents an RGBA raster with pixel data.
///
/// Pixels are stored row-major, so the pixel at `(x, y)` lives at offset
/// `y * width + x` of [`Image::as_slice`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    size: ImageSize,
    data: Vec<Pixel>,
}

impl Image {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image, row-major.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    /// A size whose pixel count overflows `usize` is an invalid argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use retouch_image::{Image, ImageSize, Pixel};
    ///
    /// let image = Image::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![Pixel::default(); 10 * 20],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.width(), 10);
    /// assert_eq!(image.height(), 20);
    /// ```
    pub fn new(size: ImageSize, data: Vec<Pixel>) -> Result<Self, ImageError> {
        let area = size.checked_area().ok_or_else(|| too_large(size))?;
        if data.len() != area {
            return Err(ImageError::InvalidChannelShape(data.len(), area));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with every pixel set to `val`.
    pub fn from_size_val(size: ImageSize, val: Pixel) -> Self {
        Self {
            size,
            data: vec![val; size.area()],
        }
    }

    /// Create a new image filled with the default, fully transparent, pixel.
    pub fn from_size(size: ImageSize) -> Self {
        Self::from_size_val(size, Pixel::default())
    }

    /// Create an image from interleaved RGBA bytes.
    ///
    /// # Errors
    ///
    /// The byte slice must hold exactly four bytes per pixel.
    pub fn from_rgba8(size: ImageSize, bytes: &[u8]) -> Result<Self, ImageError> {
        let expected = size
            .checked_area()
            .and_then(|area| area.checked_mul(4))
            .ok_or_else(|| too_large(size))?;
        if bytes.len() != expected {
            return Err(ImageError::InvalidChannelShape(bytes.len(), expected));
        }

        let data = bytes
            .chunks_exact(4)
            .map(|c| Pixel::rgba(c[0], c[1], c[2], c[3]))
            .collect();

        Ok(Self { size, data })
    }

    /// Flatten the image into interleaved RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|p| <[u8; 4]>::from(*p))
            .collect()
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Whether the image holds no pixel.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// The row-major pixel buffer.
    pub fn as_slice(&self) -> &[Pixel] {
        &self.data
    }

    /// The mutable row-major pixel buffer.
    pub fn as_slice_mut(&mut self) -> &mut [Pixel] {
        &mut self.data
    }

    /// The pixels of row `y`, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&[Pixel]> {
        if y >= self.height() {
            return None;
        }
        let start = y * self.width();
        Some(&self.data[start..start + self.width()])
    }

    /// Offset of `(x, y)` into the pixel buffer, if inside the image.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width() && y < self.height()).then(|| y * self.width() + x)
    }

    /// Borrow the pixel at `(x, y)`, or `None` if it is outside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<&Pixel> {
        self.index(x, y).map(|i| &self.data[i])
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] when `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<Pixel, ImageError> {
        self.get(x, y).copied().ok_or(ImageError::PixelIndexOutOfBounds(
            x,
            y,
            self.width(),
            self.height(),
        ))
    }

    /// Write the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] when `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) -> Result<(), ImageError> {
        let (width, height) = (self.width(), self.height());
        let i = self
            .index(x, y)
            .ok_or(ImageError::PixelIndexOutOfBounds(x, y, width, height))?;
        self.data[i] = pixel;
        Ok(())
    }
}
