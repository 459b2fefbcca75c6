use argh::FromArgs;

use retouch::image::{Image, ImageSize, Pixel};
use retouch::imgproc::config::ProcessorConfig;
use retouch::imgproc::parallel::ExecutionStrategy;

#[derive(FromArgs)]
/// Run image processors over a synthetic gradient image and report the output statistics
struct Args {
    /// width of the generated image
    #[argh(option, default = "640")]
    width: usize,

    /// height of the generated image
    #[argh(option, default = "480")]
    height: usize,

    /// processor configuration as JSON, e.g. '{"kind": "gaussian", "kernel_size": 5}'.
    /// Runs the reference pipeline when omitted.
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// execution strategy: serial, rows or fixed:<threads>
    #[argh(option, short = 's', default = "ExecutionStrategy::ParallelRows")]
    strategy: ExecutionStrategy,
}

/// The processors of the reference program, with its default parameters.
fn reference_pipeline() -> Vec<ProcessorConfig> {
    let mut configs = vec![
        ProcessorConfig::Negate,
        ProcessorConfig::Gamma { gamma: 2.6 },
        ProcessorConfig::Logarithmic { constant: 10.0 },
        ProcessorConfig::GrayScale,
    ];
    for kernel_size in [3, 4, 5] {
        configs.push(ProcessorConfig::Mean { kernel_size });
        configs.push(ProcessorConfig::Gaussian {
            kernel_size,
            sigma: 1.0,
        });
    }
    configs.push(ProcessorConfig::Sobel);
    configs
}

/// A diagonal color gradient with a bright square in the middle.
fn synthetic_image(size: ImageSize) -> Image {
    let mut image = Image::from_size(size);
    let (w, h) = (size.width.max(1), size.height.max(1));
    for (i, pixel) in image.as_slice_mut().iter_mut().enumerate() {
        let (x, y) = (i % w, i / w);
        let inside = x > w / 3 && x < 2 * w / 3 && y > h / 3 && y < 2 * h / 3;
        *pixel = if inside {
            Pixel::rgb(240, 240, 240)
        } else {
            Pixel::rgb((x * 255 / w) as u8, (y * 255 / h) as u8, 64)
        };
    }
    image
}

fn channel_means(image: &Image) -> [f64; 4] {
    let mut sums = [0u64; 4];
    for p in image.as_slice() {
        sums[0] += p.r as u64;
        sums[1] += p.g as u64;
        sums[2] += p.b as u64;
        sums[3] += p.a as u64;
    }
    let n = image.as_slice().len().max(1) as f64;
    sums.map(|s| s as f64 / n)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let image = synthetic_image(ImageSize {
        width: args.width,
        height: args.height,
    });

    let configs = match &args.config {
        Some(json) => vec![ProcessorConfig::from_json(json)?],
        None => reference_pipeline(),
    };

    log::info!(
        "running {} processor(s) on {} with strategy {}",
        configs.len(),
        image.size(),
        args.strategy
    );

    for config in configs {
        let processor = config.build(&image, args.strategy)?;
        let output = processor.process(&image)?;
        let [r, g, b, a] = channel_means(&output);
        println!(
            "{:<28} {:?} -> mean r {:6.2} g {:6.2} b {:6.2} a {:6.2}",
            processor.name(),
            config,
            r,
            g,
            b,
            a
        );
    }

    Ok(())
}
