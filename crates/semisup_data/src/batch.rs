//! Batched tensor containers produced by the loaders.

use anyhow::{bail, ensure, Result};
use tch::{Device, Tensor};

/// A training batch: two augmented views of the same drawn samples plus their
/// labels, each stacked along dim 0 in draw order.
///
/// - `weak`, `strong`: `[batch_size, 3, 32, 32]` float tensors
/// - `labels`: `[batch_size]` int64 tensor
#[derive(Debug)]
pub struct TrainBatch {
    pub weak: Tensor,
    pub strong: Tensor,
    pub labels: Tensor,
}

impl TrainBatch {
    /// Number of samples in the batch.
    pub fn batch_size(&self) -> i64 {
        self.labels.size()[0]
    }

    /// Transfers all tensors to the target device (CPU/GPU).
    pub fn to_device(&self, device: Device) -> Self {
        Self {
            weak: self.weak.to_device(device),
            strong: self.strong.to_device(device),
            labels: self.labels.to_device(device),
        }
    }
}

/// An evaluation batch: images in input order plus their labels.
#[derive(Debug)]
pub struct EvalBatch {
    pub images: Tensor,
    pub labels: Tensor,
}

impl EvalBatch {
    /// Number of samples in the batch.
    pub fn batch_size(&self) -> i64 {
        self.labels.size()[0]
    }

    /// Transfers all tensors to the target device (CPU/GPU).
    pub fn to_device(&self, device: Device) -> Self {
        Self {
            images: self.images.to_device(device),
            labels: self.labels.to_device(device),
        }
    }
}

/// Stacks per-sample image tensors along a new leading batch dimension.
///
/// All tensors must share the same shape; a mismatch means an upstream
/// pipeline produced an inconsistent view and is an error, not a panic.
pub fn stack_views(views: &[Tensor]) -> Result<Tensor> {
    if views.is_empty() {
        bail!("Cannot stack an empty list of views");
    }

    let reference_shape = views[0].size();
    for (i, view) in views.iter().enumerate() {
        ensure!(
            view.size() == reference_shape,
            "Shape mismatch in view {}: expected {:?}, got {:?}",
            i,
            reference_shape,
            view.size()
        );
    }
    Ok(Tensor::stack(views, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::Kind;

    #[test]
    fn stacks_views_in_order() -> Result<()> {
        let views = vec![
            Tensor::from_slice(&[1i64, 2]).reshape(&[1, 2]),
            Tensor::from_slice(&[3i64, 4]).reshape(&[1, 2]),
        ];
        let stacked = stack_views(&views)?;
        assert_eq!(stacked.size(), &[2, 1, 2]);
        assert_eq!(stacked.int64_value(&[1, 0, 1]), 4);
        Ok(())
    }

    #[test]
    fn rejects_empty_and_mismatched_views() {
        assert!(stack_views(&[]).is_err());

        let views = vec![
            Tensor::zeros(&[2], (Kind::Float, Device::Cpu)),
            Tensor::zeros(&[3], (Kind::Float, Device::Cpu)),
        ];
        assert!(stack_views(&views).is_err());
    }

    #[test]
    fn batch_size_comes_from_labels() {
        let batch = TrainBatch {
            weak: Tensor::zeros(&[4, 3, 32, 32], (Kind::Float, Device::Cpu)),
            strong: Tensor::zeros(&[4, 3, 32, 32], (Kind::Float, Device::Cpu)),
            labels: Tensor::zeros(&[4], (Kind::Int64, Device::Cpu)),
        };
        assert_eq!(batch.batch_size(), 4);
    }

    #[test]
    fn to_device_keeps_shapes() {
        let batch = EvalBatch {
            images: Tensor::zeros(&[2, 3, 32, 32], (Kind::Float, Device::Cpu)),
            labels: Tensor::zeros(&[2], (Kind::Int64, Device::Cpu)),
        };
        let moved = batch.to_device(Device::Cpu);
        assert_eq!(moved.images.size(), &[2, 3, 32, 32]);
        assert_eq!(moved.labels.size(), &[2]);
    }
}
