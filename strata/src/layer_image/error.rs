use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when decoding a layer image from disk.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to load image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
