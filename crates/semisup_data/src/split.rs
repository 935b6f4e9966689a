//! Label-stratified partitioning of the training archive.

use crate::archive::{self, RawDataset, NUM_CLASSES};
use crate::pool::Pool;
use anyhow::{ensure, Result};
use image::RgbImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// The two pools produced by [`stratified_split`].
#[derive(Debug, Clone)]
pub struct SplitPools {
    /// Small supervised subset: `label_budget` samples, evenly spread over classes.
    pub labeled: Pool,
    /// Everything else, used without its labels during training.
    pub unlabeled: Pool,
}

/// Partitions the raw training archive into a labeled and an unlabeled pool.
///
/// For each class in order `0..NUM_CLASSES`, the indices carrying that label
/// are shuffled with the caller's `rng`, the first `label_budget / NUM_CLASSES`
/// go to the labeled pool and the remainder to the unlabeled pool. Per-class
/// shuffle order is preserved within each side, and classes are concatenated
/// in class order. Selected rows are decoded from their flat channel-first
/// layout into channel-last rasters.
///
/// If a class holds fewer samples than its quota, the labeled side takes the
/// whole class and the unlabeled side receives nothing for it; this is not an
/// error. With the balanced archive this never triggers.
pub fn stratified_split(
    raw: &RawDataset,
    label_budget: usize,
    rng: &mut StdRng,
) -> Result<SplitPools> {
    ensure!(!raw.is_empty(), "Training archive holds no samples");
    ensure!(
        label_budget > 0 && label_budget % NUM_CLASSES == 0,
        "Label budget {} must be a positive multiple of {}",
        label_budget,
        NUM_CLASSES
    );
    let per_class = label_budget / NUM_CLASSES;

    let mut labeled_images: Vec<RgbImage> = Vec::with_capacity(label_budget);
    let mut labeled_labels: Vec<i64> = Vec::with_capacity(label_budget);
    let mut unlabeled_images: Vec<RgbImage> = Vec::with_capacity(raw.len().saturating_sub(label_budget));
    let mut unlabeled_labels: Vec<i64> = Vec::new();

    for class in 0..NUM_CLASSES as i64 {
        let mut class_indices: Vec<usize> =
            (0..raw.len()).filter(|&i| raw.label(i) == class).collect();
        class_indices.shuffle(rng);

        let take = per_class.min(class_indices.len());
        for &index in &class_indices[..take] {
            labeled_images.push(archive::decode_image(raw.row(index))?);
            labeled_labels.push(class);
        }
        for &index in &class_indices[take..] {
            unlabeled_images.push(archive::decode_image(raw.row(index))?);
            unlabeled_labels.push(class);
        }
    }

    Ok(SplitPools {
        labeled: Pool::new(labeled_images, labeled_labels)?,
        unlabeled: Pool::new(unlabeled_images, unlabeled_labels)?,
    })
}
