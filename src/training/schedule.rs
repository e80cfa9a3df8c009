use serde::{Deserialize, Serialize};

use crate::{RecErr, Result};

/// How the learning rate evolves across epochs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LrSchedule {
    /// `eta` on every epoch.
    #[default]
    Constant,
    /// `eta / (1 + decay * epoch)`.
    InverseDecay { decay: f32 },
    /// `eta * gamma^epoch`.
    Exponential { gamma: f32 },
}

impl LrSchedule {
    /// Returns the learning rate for a 0-based `epoch`.
    ///
    /// # Arguments
    /// * `eta` - The base learning rate.
    /// * `epoch` - The amount of epochs already run.
    pub fn learning_rate(&self, eta: f32, epoch: usize) -> f32 {
        match *self {
            LrSchedule::Constant => eta,
            LrSchedule::InverseDecay { decay } => eta / (1. + decay * epoch as f32),
            LrSchedule::Exponential { gamma } => eta * gamma.powi(epoch as i32),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            LrSchedule::Constant => Ok(()),
            LrSchedule::InverseDecay { decay } if decay.is_finite() && decay >= 0. => Ok(()),
            LrSchedule::InverseDecay { decay } => Err(RecErr::Config(format!(
                "inverse decay must be finite and non negative, got {decay}"
            ))),
            LrSchedule::Exponential { gamma } if gamma > 0. && gamma <= 1. => Ok(()),
            LrSchedule::Exponential { gamma } => Err(RecErr::Config(format!(
                "exponential gamma must be in (0, 1], got {gamma}"
            ))),
        }
    }
}
