//! Strata - adaptive layer image averaging.
//!
//! Fuses N co-registered captures of the same scene into one denoised composite:
//! - A reference image is built as the per-channel median of the first K layers
//! - Every layer sample is scored by its RGB distance to the reference
//! - Samples farther than an adaptive, per-pixel threshold are rejected as noise
//! - The surviving samples are averaged, with an all-black background shortcut
//!
//! Two diagnostic maps (valid-sample count and mean distance) fall out of the same pass.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use strata::{DirectoryLoader, FusionConfig, LayerStack, ProgressCallback, fuse, save_rgb};
//!
//! let loader = DirectoryLoader::new("IMAGE_DATA");
//! let stack = LayerStack::load(&loader, 10, 1000, ProgressCallback::default())?;
//! let result = fuse(&stack, &FusionConfig::default())?;
//!
//! save_rgb(&result.output, "IMAGE_DATA/averaged.png")?;
//! ```

pub(crate) mod export;
pub(crate) mod fusion;
pub(crate) mod layer_image;
pub(crate) mod layer_stack;
pub(crate) mod math;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude;

// ============================================================================
// Image types
// ============================================================================

pub use common::buffer2::Buffer2;
pub use layer_image::error::ImageLoadError;
pub use layer_image::{ImageDimensions, LayerImage, Rgb, RgbImage};

// ============================================================================
// Layer loading
// ============================================================================

pub use layer_stack::{DirectoryLoader, LayerLoader, LayerStack};

// ============================================================================
// Fusion
// ============================================================================

pub use fusion::{
    // Per-pixel building blocks
    AveragedPixel,
    // Configuration
    DEFAULT_MAX_REFERENCE_LAYERS,
    // Results and errors
    DiagnosticMaps,
    Error,
    FusionConfig,
    // Progress reporting
    FusionProgress,
    FusionResult,
    FusionStage,
    MAX_DISTANCE,
    MAX_SQUARED_DISTANCE,
    NoiseClassifier,
    PixelAverager,
    PixelStatistics,
    ProgressCallback,
    Weighting,
    // Main API
    build_reference,
    distance,
    fuse,
    fuse_with_progress,
    squared_distance,
};

// ============================================================================
// Export
// ============================================================================

pub use export::{
    MEAN_DISTANCE_FILE, NUM_VALID_SAMPLES_FILE, create_output_dir, output_image_name,
    reference_image_name, save_diagnostics, save_gray, save_rgb,
};
