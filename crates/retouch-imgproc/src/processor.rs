use std::time::Instant;

use retouch_image::{Image, ImageError};

/// The contract shared by every intensity transform and spatial filter.
///
/// Implementors provide [`ImageProcessor::apply`]; callers use
/// [`ImageProcessor::process`], which validates the input first. A processor
/// never mutates its input and always allocates a fresh output image.
///
/// # Examples
///
/// ```
/// use retouch_image::{Image, ImageSize, Pixel};
/// use retouch_imgproc::intensity::Negate;
/// use retouch_imgproc::ImageProcessor;
///
/// let image = Image::from_size_val(ImageSize { width: 1, height: 1 }, Pixel::rgba(10, 20, 30, 40));
/// let negated = Negate::new().process(&image).unwrap();
///
/// assert_eq!(negated.get_pixel(0, 0).unwrap(), Pixel::rgba(245, 235, 225, 40));
/// ```
pub trait ImageProcessor: Send + Sync {
    /// Human readable name of the processor.
    fn name(&self) -> &'static str;

    /// Compute the output image. The input is guaranteed to be non-empty.
    fn apply(&self, image: &Image) -> Result<Image, ImageError>;

    /// Run the processor on `image`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidArgument`] if the image holds no pixel, or
    /// any error raised by the processor itself.
    fn process(&self, image: &Image) -> Result<Image, ImageError> {
        if image.is_empty() {
            return Err(ImageError::InvalidArgument(format!(
                "{} cannot process an empty image ({})",
                self.name(),
                image.size()
            )));
        }

        log::debug!("{}: processing {}", self.name(), image.size());
        let start = Instant::now();
        let output = self.apply(image)?;
        log::debug!("{}: done in {:?}", self.name(), start.elapsed());

        Ok(output)
    }
}

impl<P: ImageProcessor + ?Sized> ImageProcessor for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        (**self).apply(image)
    }

    fn process(&self, image: &Image) -> Result<Image, ImageError> {
        (**self).process(image)
    }
}

/// A processor running a sequence of processors, feeding each output into
/// the next one.
///
/// An empty chain returns a copy of its input.
#[derive(Default)]
pub struct Chain {
    stages: Vec<Box<dyn ImageProcessor>>,
}

impl Chain {
    /// Create a chain from its stages, in execution order.
    pub fn new(stages: Vec<Box<dyn ImageProcessor>>) -> Self {
        Self { stages }
    }

    /// Append a stage to the chain.
    pub fn then(mut self, stage: impl ImageProcessor + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stage.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl ImageProcessor for Chain {
    fn name(&self) -> &'static str {
        "Chain"
    }

    fn apply(&self, image: &Image) -> Result<Image, ImageError> {
        let mut current = image.clone();
        for stage in &self.stages {
            current = stage.process(&current)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intensity::Negate;
    use retouch_image::Pixel;

    struct Fill(Pixel);

    impl ImageProcessor for Fill {
        fn name(&self) -> &'static str {
            "Fill"
        }

        fn apply(&self, image: &Image) -> Result<Image, ImageError> {
            Ok(Image::from_size_val(image.size(), self.0))
        }
    }

    #[test]
    fn test_process_rejects_empty_image() {
        let image = Image::from_size([0, 4].into());
        let res = Fill(Pixel::default()).process(&image);
        assert!(matches!(res, Err(ImageError::InvalidArgument(_))));
    }

    #[test]
    fn test_process_keeps_input() -> Result<(), ImageError> {
        let image = Image::from_size_val([2, 2].into(), Pixel::rgb(1, 2, 3));
        let output = Fill(Pixel::rgb(9, 9, 9)).process(&image)?;
        assert_eq!(image.get_pixel(0, 0)?, Pixel::rgb(1, 2, 3));
        assert_eq!(output.get_pixel(0, 0)?, Pixel::rgb(9, 9, 9));

        Ok(())
    }

    #[test]
    fn test_boxed_processor() -> Result<(), ImageError> {
        let boxed: Box<dyn ImageProcessor> = Box::new(Negate::new());
        assert_eq!(boxed.name(), "Negate");
        let image = Image::from_size_val([1, 1].into(), Pixel::rgb(0, 0, 0));
        assert_eq!(boxed.process(&image)?.get_pixel(0, 0)?, Pixel::rgb(255, 255, 255));

        Ok(())
    }

    #[test]
    fn test_chain() -> Result<(), ImageError> {
        let image = Image::from_size_val([3, 2].into(), Pixel::rgba(10, 20, 30, 40));

        let empty = Chain::default();
        assert!(empty.is_empty());
        assert_eq!(empty.process(&image)?, image);

        let chain = Chain::default().then(Negate::new()).then(Negate::new());
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.process(&image)?, image);

        let chain = Chain::new(vec![Box::new(Negate::new()), Box::new(Fill(Pixel::gray(7, 7)))]);
        assert_eq!(chain.process(&image)?.get_pixel(2, 1)?, Pixel::gray(7, 7));

        Ok(())
    }
}
