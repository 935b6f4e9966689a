use crate::transforms::Transform;
use anyhow::{ensure, Result};
use image::DynamicImage;
use rand::rngs::StdRng;
use rand::Rng;

// ============================================================================
// RandomHorizontalFlip
// ============================================================================

/// Randomly flips images horizontally during training.
///
/// # Example
/// ```ignore
/// let flip = RandomHorizontalFlip::new(0.5)?; // 50% flip chance
/// let augmented = flip.apply(image, &mut rng)?;
/// ```
#[derive(Debug)]
pub struct RandomHorizontalFlip {
    p: f64,
}

impl RandomHorizontalFlip {
    pub fn new(p: f64) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&p),
            "Probability must be in [0.0, 1.0] range (got {})",
            p
        );
        Ok(Self { p })
    }
}

impl Transform<DynamicImage, DynamicImage> for RandomHorizontalFlip {
    fn apply(&self, img: DynamicImage, rng: &mut StdRng) -> Result<DynamicImage> {
        Ok(if rng.random_bool(self.p) {
            img.fliph()
        } else {
            img
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use rand::SeedableRng;

    /// A 2x1 image with left = red, right = blue.
    fn two_pixel_image() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn always_flips_at_probability_one() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let flip = RandomHorizontalFlip::new(1.0)?;
        let flipped = flip.apply(two_pixel_image(), &mut rng)?;
        assert_eq!(flipped.into_rgb8().into_raw(), vec![0, 0, 255, 255, 0, 0]);
        Ok(())
    }

    #[test]
    fn never_flips_at_probability_zero() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let flip = RandomHorizontalFlip::new(0.0)?;
        let original = two_pixel_image();
        let result = flip.apply(original.clone(), &mut rng)?;
        assert_eq!(
            original.into_rgb8().into_raw(),
            result.into_rgb8().into_raw()
        );
        Ok(())
    }

    #[test]
    fn rejects_probability_out_of_range() {
        assert!(RandomHorizontalFlip::new(-0.1).is_err());
        assert!(RandomHorizontalFlip::new(1.5).is_err());
    }
}
