/// Grayscale height fields and their decoding from images
use std::fs;
use std::path::Path;

use image::DynamicImage;

use crate::error::DecodeError;

/// Rec. 709 luma weights applied to 8-bit RGB channels
pub const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Convert an 8-bit RGB pixel to a luminance value in [0, 1]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (LUMA_WEIGHTS[0] * r as f32 + LUMA_WEIGHTS[1] * g as f32 + LUMA_WEIGHTS[2] * b as f32) / 255.0
}

/// Normalized height samples on a regular grid, stored row-major.
///
/// Sample `(row, col)` lives at `row * width + col`. The field is replaced
/// wholesale whenever a new image is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl HeightField {
    pub fn new(width: usize, height: usize, samples: Vec<f32>) -> Result<Self, DecodeError> {
        if width.checked_mul(height) != Some(samples.len()) {
            return Err(DecodeError::SampleCount {
                width,
                height,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a field by evaluating `f(row, col)` for every sample
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut samples = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                samples.push(f(row, col));
            }
        }

        Self {
            width,
            height,
            samples,
        }
    }

    /// Convert every pixel of a decoded image to its luminance. Alpha is ignored.
    pub fn from_image(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let samples = rgb
            .pixels()
            .map(|p| luminance(p.0[0], p.0[1], p.0[2]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            samples,
        }
    }

    /// Decode an in-memory image (any format the `image` crate was built with)
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let img = image::load_from_memory(bytes)?;
        let field = Self::from_image(&img);
        tracing::debug!("decoded heightmap: {} x {}", field.width, field.height);
        Ok(field)
    }

    /// Read and decode an image file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let field = Self::decode(&bytes)?;
        tracing::info!(
            "loaded image {}: {} x {}",
            path.display(),
            field.width,
            field.height
        );
        Ok(field)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Height at grid position `(row, col)`
    pub fn sample(&self, row: usize, col: usize) -> f32 {
        self.samples[row * self.width + col]
    }

    /// Number of quad cells spanned by the grid; zero when either side is below 2
    pub fn cell_count(&self) -> usize {
        self.width.saturating_sub(1) * self.height.saturating_sub(1)
    }
}
