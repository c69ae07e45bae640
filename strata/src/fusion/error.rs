//! Error types for loading and fusing layer stacks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::layer_image::ImageDimensions;
use crate::layer_image::error::ImageLoadError;

/// Errors that can occur while building, fusing or exporting a layer stack.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No layers provided for fusion")]
    NoLayers,

    #[error("Resolution must be positive")]
    ZeroResolution,

    #[error("Layer {index} is not square: {dimensions}")]
    NonSquareLayer {
        index: usize,
        dimensions: ImageDimensions,
    },

    #[error("Dimension mismatch for layer {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        index: usize,
        expected: ImageDimensions,
        actual: ImageDimensions,
    },

    #[error("Reference layer count {requested} is outside 1..={layer_count}")]
    InvalidReferenceLayers { requested: usize, layer_count: usize },

    #[error("Threshold sigma must be finite, got {0}")]
    InvalidThresholdSigma(f32),

    #[error("Failed to load layer {index}: {source}")]
    LayerLoad {
        index: usize,
        #[source]
        source: ImageLoadError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to create output directory '{path}': {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unsupported config file: {0}")]
    ConfigFormat(#[from] common::FileExtensionError),

    #[error("Failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: common::SerdeFormatError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_layers_error_message() {
        let err = Error::NoLayers;
        assert_eq!(err.to_string(), "No layers provided for fusion");
    }

    #[test]
    fn test_dimension_mismatch_error_message() {
        let err = Error::DimensionMismatch {
            index: 5,
            expected: ImageDimensions::square(100),
            actual: ImageDimensions::new(200, 100),
        };
        let msg = err.to_string();
        assert!(msg.contains("layer 5"));
        assert!(msg.contains("100x100"));
        assert!(msg.contains("200x100"));
    }

    #[test]
    fn test_invalid_reference_layers_message() {
        let err = Error::InvalidReferenceLayers {
            requested: 7,
            layer_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Reference layer count 7 is outside 1..=3"
        );
    }

    #[test]
    fn test_layer_load_error_source_chain() {
        use std::error::Error as StdError;

        let err = Error::LayerLoad {
            index: 2,
            source: ImageLoadError::Image {
                path: PathBuf::from("/data/LayerImage2.bmp"),
                source: image::ImageError::IoError(io::Error::new(
                    io::ErrorKind::NotFound,
                    "underlying error",
                )),
            },
        };
        assert!(err.to_string().contains("layer 2"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_read_error_message() {
        let err = Error::ConfigRead {
            path: PathBuf::from("/etc/strata.yaml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(err.to_string().contains("/etc/strata.yaml"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_error_is_debug() {
        let err = Error::ZeroResolution;
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("ZeroResolution"));
    }
}
