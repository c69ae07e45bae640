//! Averaging of the samples that survived noise classification.

use crate::fusion::config::Weighting;
use crate::fusion::distance::MAX_DISTANCE;
use crate::layer_image::Rgb;
use crate::math::round_to_u8;

/// Result of averaging one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AveragedPixel {
    pub rgb: Rgb,
    /// Samples that contributed (N under the background shortcut).
    pub valid_count: usize,
    /// The background shortcut fired.
    pub background: bool,
}

/// Combines valid samples into one output pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelAverager {
    weighting: Weighting,
}

impl PixelAverager {
    pub fn new(weighting: Weighting) -> Self {
        Self { weighting }
    }

    /// Average one pixel.
    ///
    /// `samples`, `valid` and `distances` hold one entry per layer, so their
    /// length is the total layer count N.
    ///
    /// The background shortcut compares the number of zero samples per channel
    /// *among the valid samples* against N. It therefore fires only when every
    /// layer is valid and black; a black pixel with any rejected layer is averaged.
    pub fn average(
        &self,
        samples: &[[f32; 3]],
        valid: &[bool],
        distances: &[f64],
    ) -> AveragedPixel {
        debug_assert_eq!(samples.len(), valid.len());
        debug_assert_eq!(samples.len(), distances.len());

        let layer_count = samples.len();

        let mut zero_counts = [0usize; 3];
        let mut sums = [0.0f64; 3];
        let mut valid_count = 0usize;
        for (sample, _) in samples.iter().zip(valid).filter(|(_, v)| **v) {
            valid_count += 1;
            for c in 0..3 {
                if sample[c] == 0.0 {
                    zero_counts[c] += 1;
                }
                sums[c] += sample[c] as f64;
            }
        }

        if zero_counts.iter().all(|&z| z == layer_count) {
            return AveragedPixel {
                rgb: [0, 0, 0],
                valid_count: layer_count,
                background: true,
            };
        }

        if valid_count == 0 {
            return AveragedPixel {
                rgb: [0, 0, 0],
                valid_count: 0,
                background: false,
            };
        }

        let rgb = match self.weighting {
            Weighting::Uniform => mean_rgb(sums, valid_count as f64),
            Weighting::DistanceLinear => {
                weighted_mean_rgb(samples, valid, distances, layer_count)
                    .unwrap_or_else(|| mean_rgb(sums, valid_count as f64))
            }
        };

        AveragedPixel {
            rgb,
            valid_count,
            background: false,
        }
    }
}

#[inline]
fn mean_rgb(sums: [f64; 3], count: f64) -> Rgb {
    sums.map(|s| round_to_u8(s / count))
}

/// Integer weight `floor(N * (1 - d / d_max))` for a sample at distance `d`.
#[inline]
pub(crate) fn distance_weight(distance: f64, layer_count: usize) -> u32 {
    let w = layer_count as f64 * (1.0 - distance / MAX_DISTANCE);
    w.max(0.0) as u32
}

/// Weighted mean of valid samples, or `None` if their total weight is zero.
fn weighted_mean_rgb(
    samples: &[[f32; 3]],
    valid: &[bool],
    distances: &[f64],
    layer_count: usize,
) -> Option<Rgb> {
    let mut sums = [0.0f64; 3];
    let mut total_weight = 0u64;

    let valid_samples = samples
        .iter()
        .zip(valid)
        .zip(distances)
        .filter(|((_, v), _)| **v);

    for ((sample, _), &d) in valid_samples {
        let w = distance_weight(d, layer_count);
        total_weight += w as u64;
        for c in 0..3 {
            sums[c] += w as f64 * sample[c] as f64;
        }
    }

    (total_weight > 0).then(|| mean_rgb(sums, total_weight as f64))
}
