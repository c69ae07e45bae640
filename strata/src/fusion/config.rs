//! Fusion configuration.
//!
//! A single `FusionConfig` record carries every tunable of one fusion pass. The
//! layer count and resolution are properties of the loaded `LayerStack`, not of
//! the config, so one config can be reused across stacks.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// Upper bound on layers used for the reference image when none is configured.
pub const DEFAULT_MAX_REFERENCE_LAYERS: usize = 20;

/// How valid samples are weighted when averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weighting {
    /// Every valid sample counts equally.
    #[default]
    Uniform,
    /// Opt-in: weight each valid sample by `floor(N * (1 - d / d_max))`.
    ///
    /// Falls back to uniform weights when all valid samples weigh zero.
    DistanceLinear,
}

/// Configuration for adaptive layer averaging.
///
/// # Examples
///
/// ```ignore
/// use strata::{fuse, FusionConfig, Weighting};
///
/// // Reference behavior: K = min(20, N), threshold = mean distance
/// let result = fuse(&stack, &FusionConfig::default())?;
///
/// // Looser threshold: keep samples up to one sigma above the mean
/// let result = fuse(&stack, &FusionConfig::with_threshold_sigma(1.0))?;
///
/// // Custom configuration using struct update syntax
/// let config = FusionConfig {
///     reference_layers: Some(5),
///     weighting: Weighting::DistanceLinear,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Number of leading layers (K) used to build the median reference.
    /// `None` means `min(20, N)`.
    pub reference_layers: Option<usize>,
    /// Multiplier k in the per-pixel threshold `mean + k * std_dev`.
    pub threshold_sigma: f32,
    /// Weighting of valid samples in the average.
    pub weighting: Weighting,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            reference_layers: None,
            threshold_sigma: 0.0,
            weighting: Weighting::Uniform,
        }
    }
}

impl FusionConfig {
    // ========== Presets ==========

    /// Preset: default config with threshold `mean + sigma * std_dev`.
    pub fn with_threshold_sigma(sigma: f32) -> Self {
        Self {
            threshold_sigma: sigma,
            ..Default::default()
        }
    }

    /// Preset: default config with an explicit reference layer count.
    pub fn with_reference_layers(reference_layers: usize) -> Self {
        Self {
            reference_layers: Some(reference_layers),
            ..Default::default()
        }
    }

    // ========== Loading ==========

    /// Read a config from a `.yaml`/`.yml`/`.json` file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let format = common::FileFormat::from_file_name(&path.to_string_lossy())?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        common::deserialize(&text, format).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    // ========== Validation ==========

    /// Resolve K for a stack of `layer_count` layers.
    pub fn reference_layer_count(&self, layer_count: usize) -> Result<usize, Error> {
        if layer_count == 0 {
            return Err(Error::NoLayers);
        }
        let k = self
            .reference_layers
            .unwrap_or_else(|| layer_count.min(DEFAULT_MAX_REFERENCE_LAYERS));
        if k < 1 || k > layer_count {
            return Err(Error::InvalidReferenceLayers {
                requested: k,
                layer_count,
            });
        }
        Ok(k)
    }

    /// Validate against a stack of `layer_count` layers, returning the resolved K.
    pub fn validate(&self, layer_count: usize) -> Result<usize, Error> {
        if !self.threshold_sigma.is_finite() {
            return Err(Error::InvalidThresholdSigma(self.threshold_sigma));
        }
        self.reference_layer_count(layer_count)
    }
}
