//! Median reference image over the leading layers of a stack.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use common::buffer2::Buffer2;
use common::parallel::rows_per_chunk;

use crate::fusion::error::Error;
use crate::fusion::progress::{FusionStage, ProgressCallback, report_progress};
use crate::layer_image::RgbImage;
use crate::layer_stack::LayerStack;
use crate::math::median_f32_mut;

/// Per-pixel, per-channel median over layers `1..=k`.
///
/// Channels are independent, so a reference pixel need not equal any single
/// layer's pixel. Even `k` averages the two middle values; the result is
/// truncated to `u8` (`{10, 91}` gives 50).
pub fn build_reference(stack: &LayerStack, k: usize) -> Result<RgbImage, Error> {
    build_reference_with_progress(stack, k, &ProgressCallback::default())
}

pub(crate) fn build_reference_with_progress(
    stack: &LayerStack,
    k: usize,
    progress: &ProgressCallback,
) -> Result<RgbImage, Error> {
    let layer_count = stack.len();
    if k < 1 || k > layer_count {
        return Err(Error::InvalidReferenceLayers {
            requested: k,
            layer_count,
        });
    }

    let dims = stack.dimensions();
    let width = dims.width;
    let height = dims.height;
    let layers = &stack.layers()[..k];

    let mut reference: RgbImage = Buffer2::new_default(width, height);

    let rows = rows_per_chunk(height);
    let total_bands = height.div_ceil(rows);
    let completed = AtomicUsize::new(0);
    report_progress(progress, 0, total_bands, FusionStage::Reference);

    reference
        .pixels_mut()
        .par_chunks_mut(width * rows)
        .enumerate()
        .for_each_init(
            || vec![0.0f32; k],
            |values, (band_idx, band)| {
                let band_start = band_idx * rows * width;
                for (offset, out) in band.iter_mut().enumerate() {
                    let idx = band_start + offset;
                    for (c, channel_out) in out.iter_mut().enumerate() {
                        for (value, layer) in values.iter_mut().zip(layers) {
                            *value = layer.channel(c)[idx];
                        }
                        *channel_out = median_f32_mut(values) as u8;
                    }
                }

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                report_progress(progress, done, total_bands, FusionStage::Reference);
            },
        );

    tracing::debug!(reference_layers = k, %dims, "Built median reference");

    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{stack_from_pixels, uniform_layer};

    #[test]
    fn test_odd_count_median() {
        let stack = LayerStack::from_layers(vec![
            uniform_layer(2, [10, 10, 10]),
            uniform_layer(2, [50, 50, 50]),
            uniform_layer(2, [90, 90, 90]),
        ])
        .unwrap();
        let reference = build_reference(&stack, 3).unwrap();
        assert!(reference.iter().all(|&p| p == [50, 50, 50]));
    }

    #[test]
    fn test_even_count_averages_middle_values() {
        let stack = LayerStack::from_layers(vec![
            uniform_layer(1, [10, 10, 10]),
            uniform_layer(1, [90, 91, 0]),
        ])
        .unwrap();
        let reference = build_reference(&stack, 2).unwrap();
        // 50, 50.5 -> 50, 5
        assert_eq!(reference[(0, 0)], [50, 50, 5]);
    }

    #[test]
    fn test_channels_are_independent() {
        let stack = LayerStack::from_layers(vec![
            uniform_layer(1, [0, 200, 30]),
            uniform_layer(1, [100, 0, 20]),
            uniform_layer(1, [50, 100, 10]),
        ])
        .unwrap();
        let reference = build_reference(&stack, 3).unwrap();
        assert_eq!(reference[(0, 0)], [50, 100, 20]);
    }

    #[test]
    fn test_only_leading_layers_used() {
        let stack = LayerStack::from_layers(vec![
            uniform_layer(2, [10, 20, 30]),
            uniform_layer(2, [10, 20, 30]),
            uniform_layer(2, [255, 255, 255]),
            uniform_layer(2, [255, 255, 255]),
            uniform_layer(2, [255, 255, 255]),
        ])
        .unwrap();
        let reference = build_reference(&stack, 2).unwrap();
        assert!(reference.iter().all(|&p| p == [10, 20, 30]));
    }

    #[test]
    fn test_per_pixel_median() {
        let stack = stack_from_pixels(
            2,
            &[
                &[[1, 1, 1], [9, 9, 9], [5, 5, 5], [0, 0, 0]],
                &[[2, 2, 2], [8, 8, 8], [5, 5, 5], [255, 255, 255]],
                &[[3, 3, 3], [7, 7, 7], [5, 5, 5], [128, 128, 128]],
            ],
        );
        let reference = build_reference(&stack, 3).unwrap();
        assert_eq!(
            reference.pixels(),
            &[[2, 2, 2], [8, 8, 8], [5, 5, 5], [128, 128, 128]]
        );
    }

    #[test]
    fn test_invalid_k_rejected() {
        let stack = LayerStack::from_layers(vec![uniform_layer(2, [1, 2, 3]); 3]).unwrap();
        assert!(matches!(
            build_reference(&stack, 0),
            Err(Error::InvalidReferenceLayers { requested: 0, .. })
        ));
        assert!(matches!(
            build_reference(&stack, 4),
            Err(Error::InvalidReferenceLayers {
                requested: 4,
                layer_count: 3
            })
        ));
    }

    #[test]
    fn test_stack_not_mutated() {
        let layers = vec![
            uniform_layer(3, [90, 0, 0]),
            uniform_layer(3, [10, 0, 0]),
            uniform_layer(3, [50, 0, 0]),
        ];
        let stack = LayerStack::from_layers(layers.clone()).unwrap();
        build_reference(&stack, 3).unwrap();
        assert_eq!(stack.layers(), layers.as_slice());
    }

    #[test]
    fn test_large_image_covers_every_band() {
        let size = 67;
        let stack = LayerStack::from_layers(vec![
            uniform_layer(size, [4, 4, 4]),
            uniform_layer(size, [6, 6, 6]),
            uniform_layer(size, [200, 200, 200]),
        ])
        .unwrap();
        let reference = build_reference(&stack, 3).unwrap();
        assert_eq!(reference.len(), size * size);
        assert!(reference.iter().all(|&p| p == [6, 6, 6]));
    }
}
