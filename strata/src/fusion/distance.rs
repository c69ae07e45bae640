//! Euclidean RGB distance between a layer sample and the reference pixel.

use crate::layer_image::Rgb;

/// Largest possible squared distance for 8-bit channels: 3 * 255^2.
pub const MAX_SQUARED_DISTANCE: u32 = 3 * 255 * 255;

/// Largest possible distance for 8-bit channels: sqrt(195075).
pub const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

/// Squared RGB distance, exact in `u32`.
///
/// `sample` holds integral 0..=255 values widened to `f32`.
#[inline]
pub fn squared_distance(sample: [f32; 3], reference: Rgb) -> u32 {
    sample
        .iter()
        .zip(reference)
        .map(|(&s, r)| {
            let d = s as i32 - r as i32;
            (d * d) as u32
        })
        .sum()
}

/// RGB distance `sqrt(squared_distance)`.
#[inline]
pub fn distance(sample: [f32; 3], reference: Rgb) -> f64 {
    (squared_distance(sample, reference) as f64).sqrt()
}
