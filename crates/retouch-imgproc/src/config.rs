use serde::{Deserialize, Serialize};

use retouch_image::{Image, ImageError};

use crate::color::GrayScale;
use crate::filter::kernels::DEFAULT_KERNEL_SIZE;
use crate::filter::{
    GaussianFilter, LaplacianEdgeDetection, MeanFilter, SobelEdgeDetection, DEFAULT_SIGMA,
};
use crate::histogram::HistogramEqualization;
use crate::intensity::{GammaTransformation, LogarithmicTransformation, Negate, DEFAULT_GAMMA};
use crate::parallel::ExecutionStrategy;
use crate::processor::ImageProcessor;

/// Log multiplier used by the reference pipeline.
pub const PIPELINE_LOG_CONSTANT: f64 = 10.0;

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

fn default_log_constant() -> f64 {
    PIPELINE_LOG_CONSTANT
}

fn default_kernel_size() -> usize {
    DEFAULT_KERNEL_SIZE
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

/// Serializable description of a processor and its construction parameters.
///
/// Missing parameters fall back to the defaults of the reference pipeline.
///
/// # Examples
///
/// ```
/// use retouch_imgproc::config::ProcessorConfig;
///
/// let config = ProcessorConfig::from_json(r#"{"kind": "gaussian", "kernel_size": 5}"#).unwrap();
/// assert_eq!(config, ProcessorConfig::Gaussian { kernel_size: 5, sigma: 1.0 });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessorConfig {
    /// Color inversion.
    Negate,
    /// Power-law transform.
    Gamma {
        /// The exponent.
        #[serde(default = "default_gamma")]
        gamma: f64,
    },
    /// Logarithmic transform.
    Logarithmic {
        /// The multiplier of `ln(1 + c)`.
        #[serde(default = "default_log_constant")]
        constant: f64,
    },
    /// Luma conversion.
    #[serde(rename = "grayscale")]
    GrayScale,
    /// Neighborhood average.
    Mean {
        /// The kernel size, promoted to odd.
        #[serde(default = "default_kernel_size")]
        kernel_size: usize,
    },
    /// Gaussian blur.
    Gaussian {
        /// The kernel size, promoted to odd.
        #[serde(default = "default_kernel_size")]
        kernel_size: usize,
        /// The sigma of the gaussian.
        #[serde(default = "default_sigma")]
        sigma: f64,
    },
    /// Sobel edge magnitude, computed on the grayscale of the source image.
    Sobel,
    /// Per-channel histogram equalization.
    HistogramEqualization,
    /// Laplacian edge magnitude.
    Laplacian,
}

impl ProcessorConfig {
    /// Parse a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidArgument`] if the document is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, ImageError> {
        serde_json::from_str(json)
            .map_err(|e| ImageError::InvalidArgument(format!("invalid processor config: {e}")))
    }

    /// Build the configured processor.
    ///
    /// # Arguments
    ///
    /// * `source` - The image the processor is meant for. Only the Sobel
    ///   detector uses it, converting it to grayscale to read its gradients.
    /// * `strategy` - The execution strategy of the processor.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidArgument`] if a parameter is out of range.
    pub fn build(
        &self,
        source: &Image,
        strategy: ExecutionStrategy,
    ) -> Result<Box<dyn ImageProcessor>, ImageError> {
        let processor: Box<dyn ImageProcessor> = match *self {
            ProcessorConfig::Negate => Box::new(Negate::new().with_strategy(strategy)),
            ProcessorConfig::Gamma { gamma } => {
                Box::new(GammaTransformation::new(gamma)?.with_strategy(strategy))
            }
            ProcessorConfig::Logarithmic { constant } => {
                Box::new(LogarithmicTransformation::new(constant)?.with_strategy(strategy))
            }
            ProcessorConfig::GrayScale => Box::new(GrayScale::new().with_strategy(strategy)),
            ProcessorConfig::Mean { kernel_size } => {
                Box::new(MeanFilter::new(kernel_size)?.with_strategy(strategy))
            }
            ProcessorConfig::Gaussian { kernel_size, sigma } => {
                Box::new(GaussianFilter::new(kernel_size, sigma)?.with_strategy(strategy))
            }
            ProcessorConfig::Sobel => {
                let gray = GrayScale::new().with_strategy(strategy).process(source)?;
                Box::new(SobelEdgeDetection::new(gray).with_strategy(strategy))
            }
            ProcessorConfig::HistogramEqualization => {
                Box::new(HistogramEqualization::new().with_strategy(strategy))
            }
            ProcessorConfig::Laplacian => {
                Box::new(LaplacianEdgeDetection::new().with_strategy(strategy))
            }
        };

        log::debug!("built {} from {:?}", processor.name(), self);

        Ok(processor)
    }
}
