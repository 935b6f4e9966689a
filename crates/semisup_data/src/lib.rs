//! Data preparation for semi-supervised image classification on CIFAR-10.
//!
//! The crate loads the binary CIFAR-10 archive, splits the training set into
//! a small labeled pool and a large unlabeled pool (stratified per class),
//! and serves never-ending training batches with paired weak/strong
//! augmentation views plus a finite, deterministic validation loader.

pub mod archive;
pub mod batch;
pub mod loader;
pub mod pool;
pub mod sampler;
pub mod split;
pub mod transforms;

pub use batch::{EvalBatch, TrainBatch};
pub use loader::{train_loaders, val_loader, LoaderConfig, TrainLoader, ValLoader};
pub use pool::Pool;
pub use sampler::CyclicBatchSampler;
pub use split::{stratified_split, SplitPools};
