//! Per-pixel diagnostic maps produced alongside the fused output.

use common::buffer2::Buffer2;

/// Number of valid samples and mean distance, one entry per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticMaps {
    /// Valid samples per pixel, in `0..=N` (N under the background shortcut).
    pub num_valid_samples: Buffer2<u32>,
    /// Mean distance of *all* N samples to the reference, unrounded.
    pub mean_distance: Buffer2<f32>,
}

impl DiagnosticMaps {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            num_valid_samples: Buffer2::new_default(width, height),
            mean_distance: Buffer2::new_default(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.num_valid_samples.width()
    }

    pub fn height(&self) -> usize {
        self.num_valid_samples.height()
    }

    /// Valid-sample counts scaled linearly from `[0, layer_count]` to `[0, 255]`.
    pub fn num_valid_heatmap(&self, layer_count: usize) -> Buffer2<u8> {
        let scale = if layer_count == 0 {
            0.0
        } else {
            255.0 / layer_count as f64
        };
        self.num_valid_samples
            .map(|&count| crate::math::round_to_u8(count as f64 * scale))
    }

    /// Mean distances scaled linearly from `[0, max]` to `[0, 255]`.
    ///
    /// All zero when the largest mean distance is zero.
    pub fn mean_distance_heatmap(&self) -> Buffer2<u8> {
        let max = self
            .mean_distance
            .iter()
            .copied()
            .fold(0.0f32, f32::max);
        if max <= 0.0 {
            return self.mean_distance.map(|_| 0);
        }
        let scale = 255.0 / max as f64;
        self.mean_distance
            .map(|&d| crate::math::round_to_u8(d as f64 * scale))
    }
}
