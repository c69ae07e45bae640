use std::path::Path;

use super::LayerImage;
use super::error::ImageLoadError;

/// Decode any format `image` understands and convert it to an RGB layer.
///
/// Alpha is dropped and grayscale is expanded; channel order on disk (e.g. BMP's
/// BGR) is handled by the decoder.
pub(crate) fn load_layer(path: &Path) -> Result<LayerImage, ImageLoadError> {
    let img = image::open(path).map_err(|source| ImageLoadError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = img.to_rgb8();
    Ok(LayerImage::from_rgb8(
        rgb.width() as usize,
        rgb.height() as usize,
        rgb.as_raw(),
    ))
}
