//! Tracked multi-task loss aggregation for the Burn deep learning framework.
//!
//! This crate combines the independently configured, named loss signals of a
//! multi-head model into one scalar training loss. Each evaluation reports
//! the per-head terms to an optional metric sink, and an annealed KL
//! regularization term is folded in when the prediction batch carries one,
//! as used when training variational architectures.
//!
//! ## Components
//!
//! - **[`LossRegistry`]**: insertion-ordered mapping from head key to an
//!   opaque [`LossFunction`] (closures welcome via `register_fn`).
//! - **[`EvalBatch`]**: typed per-batch container for head tensors plus the
//!   optional `kl` / `images` slots.
//! - **[`BalancedLossEvaluator`]**: sums the registered losses, emits
//!   step-labeled [`MetricSample`]s, and mean-reduces to a scalar.
//! - **[`KlAnnealSchedule`]**: linear warmup weight for the KL term.
//! - **[`MetricSink`]** / **[`InMemorySink`]**: tracking boundary and a local
//!   implementation that keeps the recorded series inspectable.
//!
//! ## Usage
//!
//! ```
//! use balanced_loss::{BalancedLossEvaluator, EvalBatch, LossRegistry, MseHeadLoss};
//! use burn::{backend::NdArray, tensor::Tensor};
//!
//! type B = NdArray<f32>;
//!
//! # fn main() -> Result<(), balanced_loss::BalancedLossError> {
//! let device = Default::default();
//! let registry = LossRegistry::<B>::new().register("actions", MseHeadLoss::new());
//! let mut evaluator = BalancedLossEvaluator::new(registry, "train")?;
//!
//! let predicted = EvalBatch::new()
//!     .with_head("actions", Tensor::<B, 2>::from_floats([[0.5, 0.0]], &device));
//! let actual = EvalBatch::new()
//!     .with_head("actions", Tensor::<B, 2>::from_floats([[1.0, 0.0]], &device));
//!
//! let _loss = evaluator.evaluate(&predicted, &actual, 0)?;
//! # Ok(())
//! # }
//! ```

mod batch;
mod error;
mod evaluator;
mod losses;
mod registry;
mod schedule;
mod sink;

pub use batch::EvalBatch;
pub use error::{BalancedLossError, BalancedLossResult};
pub use evaluator::BalancedLossEvaluator;
pub use losses::{MaeHeadLoss, MaeHeadLossConfig, MseHeadLoss, MseHeadLossConfig};
pub use registry::{LossFunction, LossRegistry};
pub use schedule::{KlAnnealSchedule, KlAnnealScheduleConfig};
pub use sink::{InMemorySink, MetricSample, MetricSink, SinkError};
