use crate::transforms::Transform;
use anyhow::{ensure, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbImage};
use rand::rngs::StdRng;
use rand::Rng;

// ============================================================================
// Resize
// ============================================================================

/// Resizes an image to exactly the specified dimensions.
///
/// # Filter Types
/// - `Nearest`: Nearest neighbour, fastest
/// - `Triangle`: Bilinear filter, good all-round default
/// - `CatmullRom`: Bicubic sharpening
/// - `Gaussian`: Blurring/smoothing
/// - `Lanczos3`: Lanczos with window 3, highest quality re-sampling but slowest.
#[derive(Debug)]
pub struct Resize {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl Resize {
    /// Creates a new Resize transform.
    pub fn new(width: u32, height: u32, filter: FilterType) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "Image dimensions must be positive after resizing (got {}x{})",
            width,
            height
        );
        Ok(Self {
            width,
            height,
            filter,
        })
    }
}

impl Transform<DynamicImage, DynamicImage> for Resize {
    fn apply(&self, img: DynamicImage, _rng: &mut StdRng) -> Result<DynamicImage> {
        if img.dimensions() == (self.width, self.height) {
            return Ok(img);
        }
        Ok(img.resize_exact(self.width, self.height, self.filter))
    }
}

// ============================================================================
// PadAndRandomCrop
// ============================================================================

/// Zero-pads an image by `border` pixels on every side, then crops a random
/// window back to the target size.
///
/// The crop offsets are drawn uniformly from `0..=2*border` per axis, so the
/// original content shifts by up to `border` pixels in any direction and the
/// uncovered margin stays black.
#[derive(Debug)]
pub struct PadAndRandomCrop {
    border: u32,
    width: u32,
    height: u32,
}

impl PadAndRandomCrop {
    /// Creates a new pad-and-crop transform with the given border and crop size.
    pub fn new(border: u32, width: u32, height: u32) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "Crop dimensions must be positive (got {}x{})",
            width,
            height
        );
        Ok(Self {
            border,
            width,
            height,
        })
    }
}

impl Transform<DynamicImage, DynamicImage> for PadAndRandomCrop {
    fn apply(&self, img: DynamicImage, rng: &mut StdRng) -> Result<DynamicImage> {
        let rgb = img.into_rgb8();
        let (width, height) = rgb.dimensions();
        let padded_width = width + 2 * self.border;
        let padded_height = height + 2 * self.border;
        ensure!(
            padded_width >= self.width && padded_height >= self.height,
            "Cannot crop {}x{} from a padded image of {}x{}",
            self.width,
            self.height,
            padded_width,
            padded_height
        );

        // New pixels default to zero, which is the padding value.
        let mut padded = RgbImage::new(padded_width, padded_height);
        imageops::replace(&mut padded, &rgb, i64::from(self.border), i64::from(self.border));

        let x = rng.random_range(0..=padded_width - self.width);
        let y = rng.random_range(0..=padded_height - self.height);
        let cropped = imageops::crop_imm(&padded, x, y, self.width, self.height).to_image();
        Ok(DynamicImage::ImageRgb8(cropped))
    }
}
