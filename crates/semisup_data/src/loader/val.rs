//! Finite, sequential validation loader.

use crate::batch::{stack_views, EvalBatch};
use crate::pool::Pool;
use crate::transforms::{EvalPipeline, Transform};
use anyhow::{anyhow, ensure, Result};
use crossbeam_channel::RecvTimeoutError;
use image::DynamicImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tch::Tensor;

use super::workers::WorkerPool;

/// Maximum time to wait for one transformed sample from the workers.
const BATCH_TIMEOUT: Duration = Duration::from_secs(30);
/// How often idle workers check for the shutdown signal.
const WORKER_POLL: Duration = Duration::from_millis(100);

/// A worker task: slot within the current batch, index into the pool.
type ValTask = (usize, usize);
/// A worker result: slot within the current batch, transformed image.
type ValOutput = (usize, Result<Tensor>);

/// Serves the test pool as finite, in-order batches through the deterministic
/// evaluation pipeline.
///
/// Unlike the training samplers there is no shuffling and no cycling: one
/// pass over [`iter`](Self::iter) enumerates every sample exactly once, the
/// final partial batch included. With `num_workers > 0` the per-sample
/// transform work fans out over a persistent worker pool; batch contents and
/// order are identical either way because the pipeline is deterministic and
/// results are reassembled by slot.
pub struct ValLoader {
    pool: Pool,
    batch_size: usize,
    pin_memory: bool,
    pipeline: Arc<EvalPipeline>,
    workers: Option<WorkerPool<ValTask, ValOutput>>,
}

impl ValLoader {
    /// Creates a validation loader over `pool`.
    pub fn new(
        pool: Pool,
        batch_size: usize,
        pipeline: EvalPipeline,
        num_workers: usize,
        pin_memory: bool,
    ) -> Result<Self> {
        ensure!(!pool.is_empty(), "Validation pool holds no samples");
        ensure!(
            batch_size > 0,
            "batch_size must be > 0, but got batch_size={}",
            batch_size
        );

        let pipeline = Arc::new(pipeline);
        let workers = if num_workers > 0 {
            let worker_pool = pool.clone();
            let worker_pipeline = pipeline.clone();
            Some(WorkerPool::new(
                num_workers,
                batch_size,
                move |task_rx, output_tx, shutdown| {
                    // The evaluation pipeline never consumes the stream, so a
                    // fixed per-thread generator keeps workers interchangeable.
                    let mut rng = StdRng::seed_from_u64(0);
                    while !shutdown.load(Ordering::Relaxed) {
                        match task_rx.recv_timeout(WORKER_POLL) {
                            Ok((slot, index)) => {
                                let image =
                                    DynamicImage::ImageRgb8(worker_pool.image(index).clone());
                                let result = worker_pipeline.apply(image, &mut rng);
                                if output_tx.send((slot, result)).is_err() {
                                    break;
                                }
                            }
                            Err(RecvTimeoutError::Timeout) => continue,
                            Err(RecvTimeoutError::Disconnected) => break,
                        }
                    }
                },
            )?)
        } else {
            None
        };

        Ok(Self {
            pool,
            batch_size,
            pin_memory,
            pipeline,
            workers,
        })
    }

    /// Number of samples served per full pass.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Number of batches in one pass, the final partial batch included.
    pub fn num_batches(&self) -> usize {
        self.pool.len().div_ceil(self.batch_size)
    }

    /// Whether batches from this loader should be pinned in host memory when
    /// the consumer transfers them to an accelerator.
    pub fn pin_memory(&self) -> bool {
        self.pin_memory
    }

    /// Iterates over one full pass of validation batches, in pool order.
    pub fn iter(&self) -> ValIter<'_> {
        ValIter {
            loader: self,
            next_index: 0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Transforms the samples at `indices` into per-sample tensors, in order.
    fn transform_range(&self, indices: &[usize], rng: &mut StdRng) -> Result<Vec<Tensor>> {
        match &self.workers {
            Some(workers) => {
                for (slot, &index) in indices.iter().enumerate() {
                    workers.submit((slot, index))?;
                }
                let mut slots: Vec<Option<Tensor>> = indices.iter().map(|_| None).collect();
                for _ in 0..indices.len() {
                    let (slot, result) = workers.recv_timeout(BATCH_TIMEOUT)?;
                    slots[slot] = Some(result?);
                }
                slots
                    .into_iter()
                    .map(|view| view.ok_or_else(|| anyhow!("Worker skipped a batch slot")))
                    .collect()
            }
            None => indices
                .iter()
                .map(|&index| {
                    let image = DynamicImage::ImageRgb8(self.pool.image(index).clone());
                    self.pipeline.apply(image, rng)
                })
                .collect(),
        }
    }
}

/// Iterator over one pass of validation batches.
pub struct ValIter<'a> {
    loader: &'a ValLoader,
    next_index: usize,
    rng: StdRng,
}

impl Iterator for ValIter<'_> {
    type Item = Result<EvalBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.loader.pool.len() {
            return None;
        }
        let start = self.next_index;
        let end = (start + self.loader.batch_size).min(self.loader.pool.len());
        self.next_index = end;

        let indices: Vec<usize> = (start..end).collect();
        Some(self.build_batch(&indices))
    }
}

impl ValIter<'_> {
    fn build_batch(&mut self, indices: &[usize]) -> Result<EvalBatch> {
        let views = self.loader.transform_range(indices, &mut self.rng)?;
        let labels: Vec<i64> = indices
            .iter()
            .map(|&index| self.loader.pool.label(index))
            .collect();

        Ok(EvalBatch {
            images: stack_views(&views)?,
            labels: Tensor::from_slice(&labels),
        })
    }
}
