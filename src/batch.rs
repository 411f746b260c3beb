//! Typed per-batch containers for predictions and targets.

use std::collections::HashMap;

use burn::tensor::{backend::Backend, Tensor};

/// One mini-batch of named head tensors, plus the optional slots the
/// auxiliary KL term reads from.
///
/// Head outputs are rank-2 `[batch, features]` tensors keyed by the same
/// strings as the loss registry. The `kl` and `images` slots are part of the
/// declared schema rather than free-form keys: `kl` carries the latent
/// divergence of a variational model, `images` carries the raw input batch
/// whose first dimension defines the batch size the KL term is normalized by.
///
/// Batches are supplied fresh on every evaluation and never retained.
#[derive(Debug, Clone)]
pub struct EvalBatch<B: Backend> {
    heads: HashMap<String, Tensor<B, 2>>,
    kl: Option<Tensor<B, 1>>,
    images: Option<Tensor<B, 4>>,
}

impl<B: Backend> EvalBatch<B> {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self {
            heads: HashMap::new(),
            kl: None,
            images: None,
        }
    }

    /// Attach a head tensor under `key`, replacing any previous entry.
    pub fn with_head(mut self, key: impl Into<String>, tensor: Tensor<B, 2>) -> Self {
        self.heads.insert(key.into(), tensor);
        self
    }

    /// Attach the latent KL divergence term.
    pub fn with_kl(mut self, kl: Tensor<B, 1>) -> Self {
        self.kl = Some(kl);
        self
    }

    /// Attach the raw input batch, `[batch, channels, height, width]`.
    pub fn with_images(mut self, images: Tensor<B, 4>) -> Self {
        self.images = Some(images);
        self
    }

    /// Head tensor registered under `key`, if any.
    pub fn head(&self, key: &str) -> Option<&Tensor<B, 2>> {
        self.heads.get(key)
    }

    pub fn kl(&self) -> Option<&Tensor<B, 1>> {
        self.kl.as_ref()
    }

    pub fn images(&self) -> Option<&Tensor<B, 4>> {
        self.images.as_ref()
    }
}

impl<B: Backend> Default for EvalBatch<B> {
    fn default() -> Self {
        Self::new()
    }
}
