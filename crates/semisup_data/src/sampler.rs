//! Cyclic batch sampling over a fixed pool.

use crate::batch::{stack_views, TrainBatch};
use crate::pool::Pool;
use crate::transforms::Transform;
use anyhow::{ensure, Result};
use image::DynamicImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tch::Tensor;

/// Produces fixed-size training batches from a pool, forever.
///
/// The sampler walks a shuffled permutation of the pool indices with a
/// cursor. When the cursor reaches the end of the permutation it reshuffles
/// in place and starts over, so [`fetch_batch`](Self::fetch_batch) never
/// signals exhaustion; the training loop owns its own iteration limit. Within
/// one permutation no index repeats, and a single fetch may span the tail of
/// one permutation and the head of the next.
///
/// Every drawn sample is pushed through two independently configured
/// augmentation pipelines (the weak and strong views); labels are taken
/// verbatim. All randomness (the shuffles and every pipeline draw) comes
/// from the sampler's own generator, seeded at construction.
///
/// # Thread safety
/// `fetch_batch` mutates the cursor, the permutation, and the rng through
/// `&mut self`, so a single sampler cannot be shared between threads without
/// external serialization. Two samplers share no mutable state and may be
/// driven from separate threads independently; the type is `Send`.
pub struct CyclicBatchSampler<P> {
    pool: Pool,
    batch_size: usize,
    weak: P,
    strong: P,
    permutation: Vec<usize>,
    cursor: usize,
    rng: StdRng,
}

impl<P> CyclicBatchSampler<P>
where
    P: Transform<DynamicImage, Tensor>,
{
    /// Creates a sampler over `pool` with its initial permutation shuffled.
    pub fn new(pool: Pool, batch_size: usize, weak: P, strong: P, seed: u64) -> Result<Self> {
        ensure!(!pool.is_empty(), "Cannot sample from an empty pool");
        ensure!(
            batch_size > 0,
            "batch_size must be > 0, but got batch_size={}",
            batch_size
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let mut permutation: Vec<usize> = (0..pool.len()).collect();
        permutation.shuffle(&mut rng);

        Ok(Self {
            pool,
            batch_size,
            weak,
            strong,
            permutation,
            cursor: 0,
            rng,
        })
    }

    /// Number of samples in the backing pool.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Number of samples per batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Draws the next `batch_size` pool indices, reshuffling on exhaustion.
    fn draw_indices(&mut self) -> Vec<usize> {
        let mut drawn = Vec::with_capacity(self.batch_size);
        for _ in 0..self.batch_size {
            drawn.push(self.permutation[self.cursor]);
            self.cursor += 1;
            if self.cursor >= self.permutation.len() {
                self.permutation.shuffle(&mut self.rng);
                self.cursor = 0;
            }
        }
        drawn
    }

    /// Produces the next training batch.
    ///
    /// Returns `(weak views, strong views, labels)` stacked in draw order.
    /// The weak pipeline runs over the whole batch before the strong one.
    pub fn fetch_batch(&mut self) -> Result<TrainBatch> {
        let drawn = self.draw_indices();

        let mut weak_views = Vec::with_capacity(drawn.len());
        for &index in &drawn {
            let image = DynamicImage::ImageRgb8(self.pool.image(index).clone());
            weak_views.push(self.weak.apply(image, &mut self.rng)?);
        }

        let mut strong_views = Vec::with_capacity(drawn.len());
        for &index in &drawn {
            let image = DynamicImage::ImageRgb8(self.pool.image(index).clone());
            strong_views.push(self.strong.apply(image, &mut self.rng)?);
        }

        let labels: Vec<i64> = drawn.iter().map(|&index| self.pool.label(index)).collect();

        Ok(TrainBatch {
            weak: stack_views(&weak_views)?,
            strong: stack_views(&strong_views)?,
            labels: Tensor::from_slice(&labels),
        })
    }
}
