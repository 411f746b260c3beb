//! Head-loss adapters over Burn's built-in criteria.
//!
//! Thin [`LossFunction`] implementations for the criteria most commonly
//! registered per head. Anything else can enter the registry as a closure or
//! a custom [`LossFunction`] implementation.

use burn::{
    config::Config,
    nn::loss::{MseLoss, Reduction},
    tensor::{backend::Backend, Tensor},
};

use crate::registry::LossFunction;

/// Configuration for creating an [MSE head loss](MseHeadLoss).
#[derive(Config, Debug)]
pub struct MseHeadLossConfig {
    /// Weight factor for the loss. Default: 1.0
    #[config(default = 1.0)]
    pub weight: f64,
}

impl MseHeadLossConfig {
    /// Initialize an [MSE head loss](MseHeadLoss).
    pub fn init(&self) -> MseHeadLoss {
        self.assertions();
        MseHeadLoss {
            weight: self.weight,
        }
    }

    fn assertions(&self) {
        assert!(
            self.weight > 0.0,
            "Weight for MseHeadLoss must be positive, got {}",
            self.weight
        );
    }
}

/// Mean squared error over one head, reduced to a single element.
#[derive(Clone, Debug)]
pub struct MseHeadLoss {
    /// Weight factor applied to the reduced loss.
    pub weight: f64,
}

impl MseHeadLoss {
    /// Create a new MSE head loss with default configuration.
    pub fn new() -> Self {
        MseHeadLossConfig::new().init()
    }
}

impl Default for MseHeadLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> LossFunction<B> for MseHeadLoss {
    fn forward(&self, predicted: Tensor<B, 2>, actual: Tensor<B, 2>) -> Tensor<B, 1> {
        MseLoss::new()
            .forward(predicted, actual, Reduction::Mean)
            .mul_scalar(self.weight)
    }
}

/// Configuration for creating an [MAE head loss](MaeHeadLoss).
#[derive(Config, Debug)]
pub struct MaeHeadLossConfig {
    /// Weight factor for the loss. Default: 1.0
    #[config(default = 1.0)]
    pub weight: f64,
}

impl MaeHeadLossConfig {
    /// Initialize an [MAE head loss](MaeHeadLoss).
    pub fn init(&self) -> MaeHeadLoss {
        self.assertions();
        MaeHeadLoss {
            weight: self.weight,
        }
    }

    fn assertions(&self) {
        assert!(
            self.weight > 0.0,
            "Weight for MaeHeadLoss must be positive, got {}",
            self.weight
        );
    }
}

/// Mean absolute error over one head, reduced to a single element.
#[derive(Clone, Debug)]
pub struct MaeHeadLoss {
    /// Weight factor applied to the reduced loss.
    pub weight: f64,
}

impl MaeHeadLoss {
    /// Create a new MAE head loss with default configuration.
    pub fn new() -> Self {
        MaeHeadLossConfig::new().init()
    }
}

impl Default for MaeHeadLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> LossFunction<B> for MaeHeadLoss {
    fn forward(&self, predicted: Tensor<B, 2>, actual: Tensor<B, 2>) -> Tensor<B, 1> {
        (predicted - actual).abs().mean().mul_scalar(self.weight)
    }
}

#[cfg(test)]
mod tests {
    use burn::tensor::cast::ToElement;

    use super::*;
    use crate::tests::TestBackend;

    #[test]
    fn mse_head_loss_matches_mean_squared_error() {
        let device = Default::default();
        let loss = MseHeadLoss::new();

        let pred = Tensor::<TestBackend, 2>::from_floats([[1.0], [2.0], [3.0]], &device);
        let act = Tensor::<TestBackend, 2>::from_floats([[1.0], [2.0], [4.0]], &device);

        // Squared errors (0, 0, 1), mean 1/3.
        let value = LossFunction::<TestBackend>::forward(&loss, pred, act)
            .into_scalar()
            .to_f64();
        assert!((value - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn mae_head_loss_matches_mean_absolute_error() {
        let device = Default::default();
        let loss = MaeHeadLoss::new();

        let pred = Tensor::<TestBackend, 2>::from_floats([[2.0, 3.0], [4.0, 5.0]], &device);
        let act = Tensor::<TestBackend, 2>::from_floats([[1.0, 1.0], [1.0, 1.0]], &device);

        // |1| + |2| + |3| + |4| = 10, mean 2.5.
        let value = LossFunction::<TestBackend>::forward(&loss, pred, act)
            .into_scalar()
            .to_f64();
        assert!((value - 2.5).abs() < 1e-6);
    }

    #[test]
    fn head_loss_weight_scales_result() {
        let device = Default::default();
        let loss = MseHeadLossConfig::new().with_weight(3.0).init();

        let pred = Tensor::<TestBackend, 2>::from_floats([[2.0]], &device);
        let act = Tensor::<TestBackend, 2>::from_floats([[1.0]], &device);

        let value = LossFunction::<TestBackend>::forward(&loss, pred, act)
            .into_scalar()
            .to_f64();
        assert!((value - 3.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic = "Weight for MaeHeadLoss must be positive"]
    fn mae_head_loss_config_negative_weight_panics() {
        let _loss = MaeHeadLossConfig::new().with_weight(-1.0).init();
    }
}
