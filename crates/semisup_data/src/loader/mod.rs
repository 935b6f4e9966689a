//! Loader front end: wires the archive, the split, and the samplers together.
//!
//! ```text
//!                  ┌──────────────┐
//!                  │   archive    │  five training batch files + one test file
//!                  └──────┬───────┘
//!                         │ flat channel-first rows
//!            ┌────────────┴────────────┐
//!            ↓                         ↓
//!   ┌─────────────────┐       ┌─────────────────┐
//!   │ stratified split │       │   test pool     │
//!   └───┬─────────┬───┘       └────────┬────────┘
//!       ↓         ↓                    ↓
//!  labeled pool  unlabeled pool    ValLoader (finite, sequential,
//!       ↓         ↓                 deterministic pipeline)
//!  CyclicBatchSampler x2
//!  (never-ending weak/strong batches)
//! ```
//!
//! # Example Usage
//! ```ignore
//! let config = LoaderConfig::builder()
//!     .batch_size(64)
//!     .mu(7)
//!     .label_budget(250)
//!     .data_root("dataset")
//!     .seed(42)
//!     .build();
//!
//! let (mut labeled, mut unlabeled) = train_loaders(&config)?;
//! for _step in 0..total_steps {
//!     let sup = labeled.fetch_batch()?;
//!     let unsup = unlabeled.fetch_batch()?;
//!     // feed sup/unsup to the training step
//! }
//!
//! for batch in val_loader(&config)?.iter() {
//!     let batch = batch?;
//!     // evaluate on batch.images / batch.labels
//! }
//! ```

mod config;
mod val;
mod workers;

pub use config::{LoaderConfig, LoaderConfigBuilder};
pub use val::{ValIter, ValLoader};

use crate::archive;
use crate::pool::Pool;
use crate::sampler::CyclicBatchSampler;
use crate::split::stratified_split;
use crate::transforms::{eval_pipeline, train_pipeline, TrainPipeline};
use anyhow::{ensure, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The sampler type served for both training pools.
pub type TrainLoader = CyclicBatchSampler<TrainPipeline>;

/// Builds the labeled and unlabeled training samplers.
///
/// Loads the training archive from `config.data_root`, stratified-splits it
/// with `config.label_budget`, and wraps each side in a cyclic sampler: the
/// labeled one serving `batch_size` samples per fetch, the unlabeled one
/// `batch_size * mu`. The split and the two samplers get distinct seeds
/// derived from the base seed, so the pair is reproducible from a single
/// configured value while drawing independent streams.
pub fn train_loaders(config: &LoaderConfig) -> Result<(TrainLoader, TrainLoader)> {
    ensure!(
        config.batch_size > 0,
        "batch_size must be > 0, but got batch_size={}",
        config.batch_size
    );
    ensure!(config.mu > 0, "mu must be > 0, but got mu={}", config.mu);

    let raw = archive::load_train(&config.data_root)
        .context("Failed to load the training archive")?;

    let base_seed = runtime_seed(config);
    let mut split_rng = StdRng::seed_from_u64(base_seed);
    let pools = stratified_split(&raw, config.label_budget, &mut split_rng)?;

    let labeled = CyclicBatchSampler::new(
        pools.labeled,
        config.batch_size,
        train_pipeline()?,
        train_pipeline()?,
        base_seed.wrapping_add(1),
    )?;
    let unlabeled = CyclicBatchSampler::new(
        pools.unlabeled,
        config.batch_size * config.mu,
        train_pipeline()?,
        train_pipeline()?,
        base_seed.wrapping_add(2),
    )?;
    Ok((labeled, unlabeled))
}

/// Builds the validation loader over the test batch.
pub fn val_loader(config: &LoaderConfig) -> Result<ValLoader> {
    let raw = archive::load_test(&config.data_root).context("Failed to load the test archive")?;

    let mut images = Vec::with_capacity(raw.len());
    for index in 0..raw.len() {
        images.push(archive::decode_image(raw.row(index))?);
    }
    let pool = Pool::new(images, raw.labels().to_vec())?;

    ValLoader::new(
        pool,
        config.batch_size,
        eval_pipeline()?,
        config.num_workers,
        config.pin_memory,
    )
}

/// The effective base seed: the configured one, or a fresh draw from entropy.
fn runtime_seed(config: &LoaderConfig) -> u64 {
    config.seed.unwrap_or_else(|| rand::rng().random())
}
