//! Adaptive layer averaging.
//!
//! One pass over the image, in parallel row bands:
//! 1. Distance of every layer sample to the median reference pixel
//! 2. Adaptive threshold `mean + k * std_dev` marks samples valid or noise
//! 3. Valid samples are averaged (background shortcut for all-black pixels)
//!
//! The output image and both diagnostic maps are written by the same band.

pub(crate) mod average;
pub(crate) mod classify;
pub(crate) mod config;
pub(crate) mod diagnostics;
pub(crate) mod distance;
pub(crate) mod error;
pub(crate) mod progress;
pub(crate) mod reference;


use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use common::buffer2::Buffer2;
use common::parallel::rows_per_chunk;

use crate::layer_image::{Rgb, RgbImage};
use crate::layer_stack::LayerStack;

pub use average::{AveragedPixel, PixelAverager};
pub use classify::{NoiseClassifier, PixelStatistics};
pub use config::{DEFAULT_MAX_REFERENCE_LAYERS, FusionConfig, Weighting};
pub use diagnostics::DiagnosticMaps;
pub use distance::{MAX_DISTANCE, MAX_SQUARED_DISTANCE, distance, squared_distance};
pub use error::Error;
pub use progress::{FusionProgress, FusionStage, ProgressCallback};
pub use reference::build_reference;

use progress::report_progress;

/// Everything one fusion pass produces.
#[derive(Debug, Clone)]
pub struct FusionResult {
    /// Denoised composite.
    pub output: RgbImage,
    /// Median reference the samples were scored against.
    pub reference: RgbImage,
    pub diagnostics: DiagnosticMaps,
    /// Number of leading layers (K) that built the reference.
    pub reference_layers: usize,
}

/// Per-worker buffers sized to the layer count, reused across pixels.
struct PixelScratch {
    samples: Vec<[f32; 3]>,
    distances: Vec<f64>,
    valid: Vec<bool>,
}

impl PixelScratch {
    fn new(layer_count: usize) -> Self {
        Self {
            samples: vec![[0.0; 3]; layer_count],
            distances: vec![0.0; layer_count],
            valid: vec![false; layer_count],
        }
    }
}

/// Fuse a layer stack with the given configuration.
pub fn fuse(stack: &LayerStack, config: &FusionConfig) -> Result<FusionResult, Error> {
    fuse_with_progress(stack, config, ProgressCallback::default())
}

/// Fuse a layer stack, reporting `Reference` and `Fusing` progress per row band.
pub fn fuse_with_progress(
    stack: &LayerStack,
    config: &FusionConfig,
    progress: ProgressCallback,
) -> Result<FusionResult, Error> {
    let layer_count = stack.len();
    let reference_layers = config.validate(layer_count)?;

    let dims = stack.dimensions();
    tracing::info!(
        layer_count,
        reference_layers,
        threshold_sigma = config.threshold_sigma,
        weighting = ?config.weighting,
        %dims,
        "Starting adaptive layer averaging"
    );
    let start = Instant::now();

    let reference = reference::build_reference_with_progress(stack, reference_layers, &progress)?;

    let width = dims.width;
    let height = dims.height;
    let classifier = NoiseClassifier::new(config.threshold_sigma);
    let averager = PixelAverager::new(config.weighting);
    let layers = stack.layers();

    let mut output: RgbImage = Buffer2::new_default(width, height);
    let mut diagnostics = DiagnosticMaps::new(width, height);

    let rows = rows_per_chunk(height);
    let band_len = width * rows;
    let total_bands = height.div_ceil(rows);
    let completed = AtomicUsize::new(0);
    report_progress(&progress, 0, total_bands, FusionStage::Fusing);

    output
        .pixels_mut()
        .par_chunks_mut(band_len)
        .zip(diagnostics.num_valid_samples.pixels_mut().par_chunks_mut(band_len))
        .zip(diagnostics.mean_distance.pixels_mut().par_chunks_mut(band_len))
        .enumerate()
        .for_each_init(
            || PixelScratch::new(layer_count),
            |scratch, (band_idx, ((out_band, count_band), mean_band))| {
                let band_start = band_idx * band_len;
                let pixels = out_band
                    .iter_mut()
                    .zip(count_band.iter_mut())
                    .zip(mean_band.iter_mut());

                for (offset, ((out, count), mean)) in pixels.enumerate() {
                    let idx = band_start + offset;
                    let reference_px: Rgb = reference[idx];

                    for ((sample, d), layer) in scratch
                        .samples
                        .iter_mut()
                        .zip(scratch.distances.iter_mut())
                        .zip(layers)
                    {
                        *sample = layer.sample(idx);
                        *d = distance(*sample, reference_px);
                    }

                    let stats = classifier.classify(&scratch.distances, &mut scratch.valid);
                    let averaged =
                        averager.average(&scratch.samples, &scratch.valid, &scratch.distances);

                    *out = averaged.rgb;
                    *count = averaged.valid_count as u32;
                    *mean = stats.mean as f32;
                }

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                report_progress(&progress, done, total_bands, FusionStage::Fusing);
            },
        );

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Adaptive layer averaging complete"
    );

    Ok(FusionResult {
        output,
        reference,
        diagnostics,
        reference_layers,
    })
}
