//! Writing fused images and diagnostic heatmaps to disk.

use std::path::{Path, PathBuf};

use common::buffer2::Buffer2;

use crate::fusion::diagnostics::DiagnosticMaps;
use crate::fusion::error::Error;
use crate::layer_image::RgbImage;

/// File name of the valid-sample count heatmap.
pub const NUM_VALID_SAMPLES_FILE: &str = "num_valid_samples.png";

/// File name of the mean distance heatmap.
pub const MEAN_DISTANCE_FILE: &str = "mean_color_distance.png";

/// `Reference_Image_{k}.png`
pub fn reference_image_name(reference_layers: usize) -> String {
    format!("Reference_Image_{reference_layers}.png")
}

/// `adaptive_layer_averaged_image_{n}.png`
pub fn output_image_name(layer_count: usize) -> String {
    format!("adaptive_layer_averaged_image_{layer_count}.png")
}

/// Create `dir` and any missing parents.
pub fn create_output_dir(dir: impl AsRef<Path>) -> Result<(), Error> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| Error::CreateOutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Save an RGB image. The format follows the file extension.
pub fn save_rgb(img: &RgbImage, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let buffer = image::RgbImage::from_fn(img.width() as u32, img.height() as u32, |x, y| {
        image::Rgb(img[(x as usize, y as usize)])
    });
    buffer.save(path).map_err(|source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}

/// Save an 8-bit grayscale image. The format follows the file extension.
pub fn save_gray(img: &Buffer2<u8>, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let buffer = image::GrayImage::from_fn(img.width() as u32, img.height() as u32, |x, y| {
        image::Luma([img[(x as usize, y as usize)]])
    });
    buffer.save(path).map_err(|source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}

/// Write both diagnostic heatmaps into `dir`, returning the written paths.
///
/// Valid counts are scaled from `[0, layer_count]`, mean distances from
/// `[0, max]`, both to `[0, 255]`.
pub fn save_diagnostics(
    maps: &DiagnosticMaps,
    layer_count: usize,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, Error> {
    let dir = dir.as_ref();

    let num_valid_path = dir.join(NUM_VALID_SAMPLES_FILE);
    save_gray(&maps.num_valid_heatmap(layer_count), &num_valid_path)?;

    let mean_distance_path = dir.join(MEAN_DISTANCE_FILE);
    save_gray(&maps.mean_distance_heatmap(), &mean_distance_path)?;

    tracing::debug!(dir = %dir.display(), "Saved diagnostic heatmaps");

    Ok(vec![num_valid_path, mean_distance_path])
}
