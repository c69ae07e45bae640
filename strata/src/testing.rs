//! Testing utilities for strata.

#![allow(dead_code)]

use crate::layer_image::{LayerImage, Rgb};
use crate::layer_stack::LayerStack;

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Square layer of side `size` filled with one color.
pub fn uniform_layer(size: usize, rgb: Rgb) -> LayerImage {
    LayerImage::from_pixels(size, size, &vec![rgb; size * size])
}

/// Square layer of side `size` from row-major pixels.
pub fn layer_from_pixels(size: usize, pixels: &[Rgb]) -> LayerImage {
    LayerImage::from_pixels(size, size, pixels)
}

/// Stack of square layers of side `size`, one pixel slice per layer.
pub fn stack_from_pixels(size: usize, layers: &[&[Rgb]]) -> LayerStack {
    let layers = layers
        .iter()
        .map(|pixels| layer_from_pixels(size, pixels))
        .collect();
    LayerStack::from_layers(layers).expect("test layers must form a valid stack")
}
