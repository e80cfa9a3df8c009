use std::path::Path;

use serde::{Deserialize, Serialize};

use super::LrSchedule;
use crate::{
    RecErr, Result,
    initialization::{InitDistribution, ParamInit},
};

/// The hyperparameters of a training run.
///
/// Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Latent dimension.
    pub k: usize,
    /// Base learning rate.
    pub eta: f32,
    /// L2 regularization strength.
    pub lambda: f32,
    /// Maximum amount of epochs.
    pub epochs: usize,
    /// Training stops once the loss changes less than this between two epochs.
    pub tolerance: f64,
    pub init_scale: f32,
    pub init: InitDistribution,
    /// `None` seeds from the operating system.
    pub seed: Option<u64>,
    pub schedule: LrSchedule,
    /// A loss above this bound is treated as divergence.
    pub divergence_threshold: f64,
    /// Amount of blocks for parallel stratified epochs, `None` runs sequentially.
    pub blocks: Option<usize>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            k: 20,
            eta: 0.015,
            lambda: 0.1,
            epochs: 40,
            tolerance: 1e-6,
            init_scale: 0.1,
            init: InitDistribution::Uniform,
            seed: None,
            schedule: LrSchedule::Constant,
            divergence_threshold: 1e12,
            blocks: None,
        }
    }
}

impl TrainerConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn param_init(&self) -> ParamInit {
        ParamInit {
            distribution: self.init,
            scale: self.init_scale,
        }
    }

    /// Checks every option is within its valid range.
    ///
    /// # Errors
    /// A `RecErr::Config` naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(RecErr::Config(msg)) };

        if self.k == 0 {
            return invalid("k must be greater than zero".into());
        }

        if self.epochs == 0 {
            return invalid("epochs must be greater than zero".into());
        }

        if !self.eta.is_finite() || self.eta <= 0. {
            return invalid(format!("eta must be finite and positive, got {}", self.eta));
        }

        if !self.lambda.is_finite() || self.lambda < 0. {
            return invalid(format!(
                "lambda must be finite and non negative, got {}",
                self.lambda
            ));
        }

        if !self.tolerance.is_finite() || self.tolerance < 0. {
            return invalid(format!(
                "tolerance must be finite and non negative, got {}",
                self.tolerance
            ));
        }

        if !self.init_scale.is_finite() || self.init_scale < 0. {
            return invalid(format!(
                "init_scale must be finite and non negative, got {}",
                self.init_scale
            ));
        }

        if !self.divergence_threshold.is_finite() || self.divergence_threshold <= 0. {
            return invalid(format!(
                "divergence_threshold must be finite and positive, got {}",
                self.divergence_threshold
            ));
        }

        if self.blocks == Some(0) {
            return invalid("blocks must be greater than zero".into());
        }

        self.schedule.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TrainerConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_options_are_config_errors() {
        let cases = [
            TrainerConfig { k: 0, ..Default::default() },
            TrainerConfig { epochs: 0, ..Default::default() },
            TrainerConfig { eta: 0., ..Default::default() },
            TrainerConfig { eta: -0.1, ..Default::default() },
            TrainerConfig { eta: f32::INFINITY, ..Default::default() },
            TrainerConfig { lambda: -1., ..Default::default() },
            TrainerConfig { tolerance: f64::NAN, ..Default::default() },
            TrainerConfig { init_scale: -0.5, ..Default::default() },
            TrainerConfig { divergence_threshold: 0., ..Default::default() },
            TrainerConfig { blocks: Some(0), ..Default::default() },
            TrainerConfig {
                schedule: LrSchedule::Exponential { gamma: 2. },
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(RecErr::Config(_))),
                "accepted {config:?}"
            );
        }
    }

    #[test]
    fn partial_json_takes_defaults() {
        let config = TrainerConfig::from_json_str(
            r#"{ "k": 8, "eta": 0.05, "seed": 7, "init": "normal", "blocks": 4 }"#,
        )
        .unwrap();

        assert_eq!(config.k, 8);
        assert_eq!(config.eta, 0.05);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.blocks, Some(4));
        assert_eq!(config.param_init(), ParamInit::normal(0.1));
        assert_eq!(config.epochs, TrainerConfig::default().epochs);
    }

    #[test]
    fn invalid_json_values_are_rejected() {
        let err = TrainerConfig::from_json_str(r#"{ "k": 0 }"#).unwrap_err();
        assert!(matches!(err, RecErr::Config(_)));

        let err = TrainerConfig::from_json_str(r#"{ "k": -3 }"#).unwrap_err();
        assert!(matches!(err, RecErr::Json(_)));
    }
}
