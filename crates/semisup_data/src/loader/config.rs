//! Configuration for the loader front end.
//!
//! The `LoaderConfig` struct stores the parameters that control how the
//! archive is split and served.
//!
//! Example:
//! ```ignore
//! let config = LoaderConfig::builder()
//!     .batch_size(64)
//!     .mu(7)
//!     .label_budget(250)
//!     .data_root("dataset")
//!     .seed(42)
//!     .build();
//! ```

use std::path::PathBuf;

/// Configuration for [`train_loaders`](crate::loader::train_loaders) and
/// [`val_loader`](crate::loader::val_loader).
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Samples per labeled training batch; also the validation batch size.
    pub batch_size: usize,
    /// Unlabeled batch multiplier: the unlabeled sampler serves
    /// `batch_size * mu` samples per batch.
    pub mu: usize,
    /// Total number of labeled samples to keep. Must be a positive multiple
    /// of the class count.
    pub label_budget: usize,
    /// Dataset root directory holding the archive sub-directory.
    pub data_root: PathBuf,
    /// Base seed for splitting and sampling. `None` draws a fresh seed from
    /// entropy, trading reproducibility for varied shuffles.
    pub seed: Option<u64>,
    /// Number of parallel workers for the validation loader
    /// (0 = single-threaded). Training samplers are always single-threaded.
    pub num_workers: usize,
    /// Advertises that validation batches should be pinned in host memory
    /// when the consumer transfers them to an accelerator. Exposed through
    /// [`ValLoader::pin_memory`](crate::loader::ValLoader::pin_memory).
    pub pin_memory: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            mu: 7,
            label_budget: 250,
            data_root: PathBuf::from("dataset"),
            seed: None,
            num_workers: 0,
            pin_memory: false,
        }
    }
}

impl LoaderConfig {
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::default()
    }
}

/// Builder for LoaderConfig with method chaining
#[derive(Default)]
pub struct LoaderConfigBuilder {
    config: LoaderConfig,
}

impl LoaderConfigBuilder {
    /// Set the labeled batch size (must be > 0).
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the unlabeled batch multiplier (must be > 0).
    pub fn mu(mut self, mu: usize) -> Self {
        self.config.mu = mu;
        self
    }

    /// Set the labeled sample budget.
    pub fn label_budget(mut self, budget: usize) -> Self {
        self.config.label_budget = budget;
        self
    }

    /// Set the dataset root directory.
    pub fn data_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.data_root = root.into();
        self
    }

    /// Set the base seed for reproducible splits and batch sequences.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the number of validation loader workers.
    pub fn num_workers(mut self, workers: usize) -> Self {
        self.config.num_workers = workers;
        self
    }

    /// Enable pinned host memory for validation batches.
    pub fn pin_memory(mut self, pin: bool) -> Self {
        self.config.pin_memory = pin;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> LoaderConfig {
        self.config
    }
}
