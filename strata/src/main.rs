use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use strata::{
    DirectoryLoader, FusionConfig, FusionProgress, LayerStack, ProgressCallback, Weighting,
    create_output_dir, fuse_with_progress, output_image_name, reference_image_name,
    save_diagnostics, save_rgb,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding LayerImage1.bmp .. LayerImageN.bmp
    input_dir: PathBuf,

    /// Number of layers (N)
    num_layers: usize,

    /// Width and height of every layer in pixels
    resolution: usize,

    /// Leading layers used for the median reference [default: min(20, N)]
    #[arg(long, value_name = "K")]
    reference_layers: Option<usize>,

    /// Threshold multiplier k in `mean + k * std_dev` [default: 0]
    #[arg(long, value_name = "k", allow_negative_numbers = true)]
    threshold_sigma: Option<f32>,

    /// Weighting of valid samples [default: uniform]
    #[arg(long, value_enum)]
    weighting: Option<WeightingArg>,

    /// YAML or JSON fusion config; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory [default: INPUT_DIR]
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write daily rolling log files into this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WeightingArg {
    Uniform,
    DistanceLinear,
}

impl From<WeightingArg> for Weighting {
    fn from(arg: WeightingArg) -> Self {
        match arg {
            WeightingArg::Uniform => Weighting::Uniform,
            WeightingArg::DistanceLinear => Weighting::DistanceLinear,
        }
    }
}

impl Args {
    fn fusion_config(&self) -> Result<FusionConfig> {
        let mut config = match &self.config {
            Some(path) => FusionConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => FusionConfig::default(),
        };

        if let Some(k) = self.reference_layers {
            config.reference_layers = Some(k);
        }
        if let Some(sigma) = self.threshold_sigma {
            config.threshold_sigma = sigma;
        }
        if let Some(weighting) = self.weighting {
            config.weighting = weighting.into();
        }

        Ok(config)
    }
}

fn log_progress(progress: FusionProgress) {
    tracing::debug!(
        stage = %progress.stage,
        current = progress.current,
        total = progress.total,
        "Progress"
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    common::log_setup::setup_logging(&args.log_level, args.log_dir.as_deref())
        .context("Failed to initialize logging")?;

    let config = args.fusion_config()?;
    let output_dir = args.output_dir.clone().unwrap_or_else(|| args.input_dir.clone());
    create_output_dir(&output_dir)?;

    let progress = ProgressCallback::new(Arc::new(log_progress));

    let loader = DirectoryLoader::new(&args.input_dir);
    let stack = LayerStack::load(&loader, args.num_layers, args.resolution, progress.clone())
        .with_context(|| format!("Failed to load layers from {}", args.input_dir.display()))?;

    let result = fuse_with_progress(&stack, &config, progress).context("Fusion failed")?;

    let reference_path = output_dir.join(reference_image_name(result.reference_layers));
    save_rgb(&result.reference, &reference_path)?;
    tracing::info!(path = %reference_path.display(), "Saved reference image");

    let output_path = output_dir.join(output_image_name(stack.len()));
    save_rgb(&result.output, &output_path)?;
    tracing::info!(path = %output_path.display(), "Saved averaged image");

    for path in save_diagnostics(&result.diagnostics, stack.len(), &output_dir)? {
        tracing::info!(path = %path.display(), "Saved diagnostic heatmap");
    }

    Ok(())
}
