//! Ordered collection of equally sized square layers.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use common::parallel::try_par_map_limited;

use crate::fusion::error::Error;
use crate::fusion::progress::{FusionStage, ProgressCallback, report_progress};
use crate::layer_image::error::ImageLoadError;
use crate::layer_image::io::load_layer;
use crate::layer_image::{ImageDimensions, LayerImage};

/// Layers decoded concurrently while loading a stack.
const MAX_CONCURRENT_LOADS: usize = 8;

/// Source of layer images, addressed by 1-based capture index.
pub trait LayerLoader: Sync {
    fn load(&self, index: usize) -> Result<LayerImage, ImageLoadError>;
}

impl<F> LayerLoader for F
where
    F: Fn(usize) -> Result<LayerImage, ImageLoadError> + Sync,
{
    fn load(&self, index: usize) -> Result<LayerImage, ImageLoadError> {
        self(index)
    }
}

/// Reads `LayerImage{index}.bmp` files from one directory.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
}

impl DirectoryLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of layer `index` (1-based).
    pub fn layer_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("LayerImage{index}.bmp"))
    }
}

impl LayerLoader for DirectoryLoader {
    fn load(&self, index: usize) -> Result<LayerImage, ImageLoadError> {
        load_layer(&self.layer_path(index))
    }
}

/// N co-registered layers in capture order. Index 0 is layer 1.
///
/// Invariants: at least one layer, every layer square, all layers the same size.
#[derive(Debug, Clone)]
pub struct LayerStack {
    layers: Vec<LayerImage>,
    dimensions: ImageDimensions,
}

impl LayerStack {
    /// Build a stack from already decoded layers.
    pub fn from_layers(layers: Vec<LayerImage>) -> Result<Self, Error> {
        let first = layers.first().ok_or(Error::NoLayers)?;
        let dimensions = first.dimensions();

        for (index, layer) in layers.iter().enumerate() {
            let dims = layer.dimensions();
            if dims.is_empty() {
                return Err(Error::ZeroResolution);
            }
            if !dims.is_square() {
                return Err(Error::NonSquareLayer {
                    index,
                    dimensions: dims,
                });
            }
            if dims != dimensions {
                return Err(Error::DimensionMismatch {
                    index,
                    expected: dimensions,
                    actual: dims,
                });
            }
        }

        Ok(Self { layers, dimensions })
    }

    /// Load layers `1..=layer_count` in parallel, requiring each to be
    /// `resolution x resolution`. Stops at the first failing layer.
    pub fn load(
        loader: &impl LayerLoader,
        layer_count: usize,
        resolution: usize,
        progress: ProgressCallback,
    ) -> Result<Self, Error> {
        if layer_count == 0 {
            return Err(Error::NoLayers);
        }
        if resolution == 0 {
            return Err(Error::ZeroResolution);
        }

        let expected = ImageDimensions::square(resolution);
        tracing::info!(layer_count, %expected, "Loading layer stack");

        report_progress(&progress, 0, layer_count, FusionStage::Loading);
        let loaded = AtomicUsize::new(0);

        let indices: Vec<usize> = (1..=layer_count).collect();
        let layers = try_par_map_limited(&indices, MAX_CONCURRENT_LOADS, |&index| {
            let layer = loader
                .load(index)
                .map_err(|source| Error::LayerLoad { index, source })?;

            let actual = layer.dimensions();
            if actual != expected {
                return Err(Error::DimensionMismatch {
                    index,
                    expected,
                    actual,
                });
            }

            let done = loaded.fetch_add(1, Ordering::Relaxed) + 1;
            report_progress(&progress, done, layer_count, FusionStage::Loading);
            tracing::debug!(index, "Loaded layer");
            Ok(layer)
        })?;

        tracing::info!("Loaded {} layers", layers.len());

        Ok(Self {
            layers,
            dimensions: expected,
        })
    }

    /// Number of layers (N).
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false for a constructed stack.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn dimensions(&self) -> ImageDimensions {
        self.dimensions
    }

    pub fn layers(&self) -> &[LayerImage] {
        &self.layers
    }

    /// Layer at 0-based position `idx`.
    pub fn layer(&self, idx: usize) -> &LayerImage {
        &self.layers[idx]
    }
}
