use thiserror::Error;

use crate::sink::SinkError;

/// The error type for balanced loss evaluation.
///
/// Key mismatches between the registry and the supplied batches indicate a
/// caller or configuration fault and are never recovered locally.
#[derive(Debug, Error)]
pub enum BalancedLossError {
    /// Error for when an evaluator is constructed without any registered loss function.
    #[error("loss registry is empty - at least one registered loss function is required")]
    EmptyRegistry,

    /// Error for when a registered head has no entry in the prediction batch.
    #[error("prediction batch is missing registered head '{key}'")]
    MissingPrediction {
        /// The registry key with no matching prediction.
        key: String,
    },

    /// Error for when a registered head has no entry in the target batch.
    #[error("target batch is missing registered head '{key}'")]
    MissingTarget {
        /// The registry key with no matching target.
        key: String,
    },

    /// Error for when a KL term is supplied without the images tensor that
    /// defines the batch size it is normalized by.
    #[error("prediction batch carries a KL term but no images tensor to derive the batch size")]
    MissingImages,

    /// Error raised by the metric sink while submitting samples.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// A specialized `Result` type for balanced loss operations.
pub type BalancedLossResult<T> = Result<T, BalancedLossError>;
