pub mod augmentation;
pub mod conversion;
pub mod core;
pub mod geometric;
pub mod photometric;

pub use augmentation::RandomHorizontalFlip;
pub use conversion::ToTensor;
pub use core::{Chain, Transform};
pub use geometric::{PadAndRandomCrop, Resize};
pub use photometric::Normalize;

/// ===========================================================================
use crate::archive::{IMAGE_HEIGHT, IMAGE_WIDTH};
use anyhow::Result;
use image::imageops::FilterType;
use image::DynamicImage;
use tch::Tensor;

/// Padding border for the random crop in the training pipeline.
const CROP_BORDER: u32 = 4;
/// Horizontal flip probability in the training pipeline.
const FLIP_PROBABILITY: f64 = 0.5;

/// The training augmentation pipeline:
/// resize → pad-and-random-crop → random horizontal flip → tensor → normalize.
pub type TrainPipeline = Chain<
    Chain<
        Chain<Chain<Resize, PadAndRandomCrop, DynamicImage>, RandomHorizontalFlip, DynamicImage>,
        ToTensor,
        DynamicImage,
    >,
    Normalize,
    Tensor,
>;

/// The evaluation pipeline: resize → tensor → normalize. Fully deterministic;
/// the rng stream passed to it is never consumed.
pub type EvalPipeline = Chain<Chain<Resize, ToTensor, DynamicImage>, Normalize, Tensor>;

/// Builds one training pipeline instance.
///
/// The weak and strong views of a training batch each use their own instance
/// of this same configuration; their outputs differ only through the random
/// draws made at application time.
pub fn train_pipeline() -> Result<TrainPipeline> {
    Ok(
        Resize::new(IMAGE_WIDTH, IMAGE_HEIGHT, FilterType::Triangle)?
            .then(PadAndRandomCrop::new(CROP_BORDER, IMAGE_WIDTH, IMAGE_HEIGHT)?)
            .then(RandomHorizontalFlip::new(FLIP_PROBABILITY)?)
            .then(ToTensor)
            .then(Normalize::cifar10()),
    )
}

/// Builds the deterministic evaluation pipeline.
pub fn eval_pipeline() -> Result<EvalPipeline> {
    Ok(Resize::new(IMAGE_WIDTH, IMAGE_HEIGHT, FilterType::Triangle)?
        .then(ToTensor)
        .then(Normalize::cifar10()))
}
