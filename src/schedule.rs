//! Annealing schedule for the KL regularization weight.

use burn::config::Config;

/// Configuration for creating a [KL annealing schedule](KlAnnealSchedule).
#[derive(Config, Debug)]
pub struct KlAnnealScheduleConfig {
    /// Number of epochs over which the weight ramps from 0 to 1. Default: 25
    #[config(default = 25)]
    pub warmup_epochs: i64,
}

impl KlAnnealScheduleConfig {
    /// Initialize a [KL annealing schedule](KlAnnealSchedule).
    pub fn init(&self) -> KlAnnealSchedule {
        self.assertions();
        KlAnnealSchedule {
            warmup_epochs: self.warmup_epochs,
        }
    }

    fn assertions(&self) {
        assert!(
            self.warmup_epochs > 0,
            "Warmup epochs for KlAnnealSchedule must be positive, got {}",
            self.warmup_epochs
        );
    }
}

/// Linear warmup schedule for the auxiliary KL term.
///
/// The weight ramps linearly from 0 at epoch 0 to 1 at `warmup_epochs` and
/// saturates there. Negative epochs map to a weight of 0.
#[derive(Clone, Debug)]
pub struct KlAnnealSchedule {
    warmup_epochs: i64,
}

impl Default for KlAnnealSchedule {
    fn default() -> Self {
        KlAnnealScheduleConfig::new().init()
    }
}

impl KlAnnealSchedule {
    /// Annealing weight in `[0, 1]` for the given training epoch.
    pub fn weight(&self, epoch: i64) -> f64 {
        if epoch < 0 {
            return 0.0;
        }
        (epoch as f64 / self.warmup_epochs as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kl_anneal_weight_is_zero_for_negative_epochs() {
        let schedule = KlAnnealSchedule::default();
        assert_eq!(schedule.weight(-1), 0.0);
        assert_eq!(schedule.weight(-100), 0.0);
    }

    #[test]
    fn kl_anneal_weight_ramps_linearly_during_warmup() {
        let schedule = KlAnnealSchedule::default();
        assert_eq!(schedule.weight(0), 0.0);
        assert!((schedule.weight(5) - 0.2).abs() < 1e-12);
        assert!((schedule.weight(10) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn kl_anneal_weight_saturates_at_one_after_warmup() {
        let schedule = KlAnnealSchedule::default();
        assert_eq!(schedule.weight(25), 1.0);
        assert_eq!(schedule.weight(26), 1.0);
        assert_eq!(schedule.weight(10_000), 1.0);
    }

    #[test]
    fn kl_anneal_custom_warmup_changes_slope() {
        let schedule = KlAnnealScheduleConfig::new().with_warmup_epochs(10).init();
        assert!((schedule.weight(5) - 0.5).abs() < 1e-12);
        assert_eq!(schedule.weight(10), 1.0);
    }

    #[test]
    #[should_panic = "Warmup epochs for KlAnnealSchedule must be positive"]
    fn kl_anneal_config_zero_warmup_panics() {
        let _schedule = KlAnnealScheduleConfig::new().with_warmup_epochs(0).init();
    }
}
