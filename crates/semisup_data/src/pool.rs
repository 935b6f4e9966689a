//! Immutable sample pools backing the samplers.

use anyhow::{ensure, Result};
use image::RgbImage;
use std::sync::Arc;

/// An ordered, immutable collection of decoded images and their labels.
///
/// A pool is built once at load time and never mutated afterwards. Storage is
/// atomically reference-counted (`Arc<[_]>`), so cloning a pool only bumps the
/// counters and the same decoded images can back several consumers without
/// copying.
#[derive(Debug, Clone)]
pub struct Pool {
    images: Arc<[RgbImage]>,
    labels: Arc<[i64]>,
}

impl Pool {
    /// Creates a pool from parallel image and label sequences.
    ///
    /// Fails fast if the two sequences differ in length; downstream code
    /// relies on index `i` addressing both the image and its label.
    pub fn new(images: Vec<RgbImage>, labels: Vec<i64>) -> Result<Self> {
        ensure!(
            images.len() == labels.len(),
            "Pool has {} images but {} labels",
            images.len(),
            labels.len()
        );
        Ok(Self {
            images: images.into(),
            labels: labels.into(),
        })
    }

    /// Number of samples in the pool.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Checks if the pool holds no samples.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the image at `index`.
    pub fn image(&self, index: usize) -> &RgbImage {
        &self.images[index]
    }

    /// Returns the label at `index`.
    pub fn label(&self, index: usize) -> i64 {
        self.labels[index]
    }

    /// All labels, in pool order.
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Iterates over `(image, label)` pairs in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (&RgbImage, i64)> {
        self.images.iter().zip(self.labels.iter().copied())
    }
}
