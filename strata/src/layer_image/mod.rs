pub(crate) mod error;
pub(crate) mod io;

use common::buffer2::Buffer2;

/// 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Interleaved 8-bit RGB image, used for both the reference and the fused output.
pub type RgbImage = Buffer2<Rgb>;

/// Image dimensions: width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageDimensions {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
}

impl ImageDimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Square dimensions with side `resolution`.
    pub fn square(resolution: usize) -> Self {
        Self {
            width: resolution,
            height: resolution,
        }
    }

    /// Total number of pixels (width * height).
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One capture of the scene, stored as planar R, G, B channels.
///
/// Samples are decoded 8-bit values widened to `f32`, so sums and squared
/// differences across many layers never overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerImage {
    dimensions: ImageDimensions,
    channels: [Buffer2<f32>; 3],
}

impl LayerImage {
    /// Build a layer from three equally sized planes.
    pub fn from_planes(r: Buffer2<f32>, g: Buffer2<f32>, b: Buffer2<f32>) -> Self {
        let dimensions = ImageDimensions::new(r.width(), r.height());
        for plane in [&g, &b] {
            assert!(
                plane.width() == dimensions.width && plane.height() == dimensions.height,
                "Channel planes must share dimensions: {} vs {}x{}",
                dimensions,
                plane.width(),
                plane.height()
            );
        }
        Self {
            dimensions,
            channels: [r, g, b],
        }
    }

    /// Split interleaved RGB8 bytes into planes.
    pub fn from_rgb8(width: usize, height: usize, data: &[u8]) -> Self {
        assert_eq!(
            data.len(),
            width * height * 3,
            "RGB8 data length must equal width * height * 3"
        );
        let plane = |channel: usize| {
            Buffer2::new(
                width,
                height,
                data.iter()
                    .skip(channel)
                    .step_by(3)
                    .map(|&v| v as f32)
                    .collect(),
            )
        };
        Self::from_planes(plane(0), plane(1), plane(2))
    }

    /// Build a layer from row-major RGB pixels.
    pub fn from_pixels(width: usize, height: usize, pixels: &[Rgb]) -> Self {
        let data: Vec<u8> = pixels.iter().flatten().copied().collect();
        Self::from_rgb8(width, height, &data)
    }

    pub fn dimensions(&self) -> ImageDimensions {
        self.dimensions
    }

    /// Plane for channel 0 (R), 1 (G) or 2 (B).
    #[inline]
    pub fn channel(&self, channel: usize) -> &Buffer2<f32> {
        &self.channels[channel]
    }

    /// RGB sample at flat pixel index `idx`.
    #[inline]
    pub fn sample(&self, idx: usize) -> [f32; 3] {
        [
            self.channels[0][idx],
            self.channels[1][idx],
            self.channels[2][idx],
        ]
    }
}
