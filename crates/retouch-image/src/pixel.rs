/// A pixel with four 8-bit channels.
///
/// The default pixel is fully transparent black, which is also what a freshly
/// allocated image is filled with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Pixel {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Pixel {
    /// Create a pixel from its four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque pixel from its color channels.
    ///
    /// # Examples
    ///
    /// ```
    /// use retouch_image::Pixel;
    ///
    /// let p = Pixel::rgb(1, 2, 3);
    /// assert_eq!(p.a, 255);
    /// ```
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a gray pixel with the same value on the color channels.
    pub const fn gray(value: u8, a: u8) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
            a,
        }
    }

    /// The color channels as an array in `[r, g, b]` order.
    pub const fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Apply `f` to the color channels, keeping alpha untouched.
    pub fn map_rgb(self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
            a: self.a,
        }
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(c: [u8; 4]) -> Self {
        Pixel::rgba(c[0], c[1], c[2], c[3])
    }
}

impl From<Pixel> for [u8; 4] {
    fn from(p: Pixel) -> Self {
        [p.r, p.g, p.b, p.a]
    }
}

#[cfg(test)]
mod tests {
    use super::Pixel;

    #[test]
    fn pixel_default_is_transparent_black() {
        assert_eq!(Pixel::default(), Pixel::rgba(0, 0, 0, 0));
    }

    #[test]
    fn pixel_map_rgb_keeps_alpha() {
        let p = Pixel::rgba(10, 20, 30, 40).map_rgb(|c| c / 10);
        assert_eq!(p, Pixel::rgba(1, 2, 3, 40));
    }

    #[test]
    fn pixel_array_conversion() {
        let p: Pixel = [1, 2, 3, 4].into();
        assert_eq!(p, Pixel::rgba(1, 2, 3, 4));
        let c: [u8; 4] = p.into();
        assert_eq!(c, [1, 2, 3, 4]);
    }
}
