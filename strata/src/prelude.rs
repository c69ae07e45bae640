//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strata::prelude::*;
//! ```

// Image types
pub use crate::{ImageDimensions, LayerImage, Rgb, RgbImage};

// Loading
pub use crate::{DirectoryLoader, LayerLoader, LayerStack};

// Fusion - main API
pub use crate::{
    DiagnosticMaps, FusionConfig, FusionProgress, FusionResult, FusionStage, ProgressCallback,
    Weighting, fuse, fuse_with_progress,
};

// Export
pub use crate::{save_diagnostics, save_rgb};
