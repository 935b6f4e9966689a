use crate::transforms::Transform;
use anyhow::{ensure, Context, Result};
use image::{DynamicImage, GenericImageView};
use rand::rngs::StdRng;
use tch::{Kind, Tensor};

// ============================================================================
// ToTensor
// ============================================================================

/// Converts an image to a channel-first f32 tensor in [0.0, 1.0] range.
///
/// The raster's interleaved RGB bytes are re-ordered into three contiguous
/// channel planes, so the output shape is `[3, H, W]`. Non-RGB inputs are
/// converted to RGB first.
#[derive(Debug)]
pub struct ToTensor;

impl Transform<DynamicImage, Tensor> for ToTensor {
    fn apply(&self, img: DynamicImage, _rng: &mut StdRng) -> Result<Tensor> {
        let (width, height) = img.dimensions();
        ensure!(
            width > 0 && height > 0,
            "Image dimensions must be positive (got {}x{})",
            width,
            height
        );

        let rgb = img.into_rgb8();
        let plane = (width * height) as usize;
        let mut channel_first = vec![0u8; 3 * plane];
        for (i, pixel) in rgb.as_raw().chunks_exact(3).enumerate() {
            channel_first[i] = pixel[0];
            channel_first[plane + i] = pixel[1];
            channel_first[2 * plane + i] = pixel[2];
        }

        // Scale to [0,1] range
        Tensor::from_slice(&channel_first)
            .reshape(&[3, height as i64, width as i64])
            .to_kind(Kind::Float)
            .f_div_scalar(255.0)
            .context("Failed to scale tensor values")
    }
}
