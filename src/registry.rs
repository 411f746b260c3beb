//! Loss function capability and the insertion-ordered registry.

use core::fmt;

use burn::tensor::{backend::Backend, Tensor};

/// A loss signal over one model head.
///
/// Implementations map a `[batch, features]` prediction/target pair to a
/// rank-1 loss tensor, either reduced to a single element or left
/// elementwise. No further contract is enforced; shape compatibility is the
/// implementation's own concern.
pub trait LossFunction<B: Backend> {
    fn forward(&self, predicted: Tensor<B, 2>, actual: Tensor<B, 2>) -> Tensor<B, 1>;
}

/// Adapter admitting plain closures into the registry.
struct FnLoss<F>(F);

impl<B: Backend, F> LossFunction<B> for FnLoss<F>
where
    F: Fn(Tensor<B, 2>, Tensor<B, 2>) -> Tensor<B, 1>,
{
    fn forward(&self, predicted: Tensor<B, 2>, actual: Tensor<B, 2>) -> Tensor<B, 1> {
        (self.0)(predicted, actual)
    }
}

/// Immutable, insertion-ordered mapping from head key to loss function.
///
/// Keys are caller-defined and must match the keys of both batches passed at
/// evaluation time. Registering an existing key replaces the function but
/// keeps its original position, so evaluation order stays stable.
pub struct LossRegistry<B: Backend> {
    entries: Vec<(String, Box<dyn LossFunction<B>>)>,
}

impl<B: Backend> LossRegistry<B> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `loss` under `key`.
    pub fn register(mut self, key: impl Into<String>, loss: impl LossFunction<B> + 'static) -> Self {
        let key = key.into();
        let boxed: Box<dyn LossFunction<B>> = Box::new(loss);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = boxed,
            None => self.entries.push((key, boxed)),
        }
        self
    }

    /// Register a closure under `key`.
    pub fn register_fn(
        self,
        key: impl Into<String>,
        f: impl Fn(Tensor<B, 2>, Tensor<B, 2>) -> Tensor<B, 1> + 'static,
    ) -> Self {
        self.register(key, FnLoss(f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys in evaluation order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn LossFunction<B>)> {
        self.entries.iter().map(|(k, f)| (k.as_str(), f.as_ref()))
    }
}

impl<B: Backend> Default for LossRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> fmt::Debug for LossRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LossRegistry")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
