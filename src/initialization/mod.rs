mod constant;
mod param_gen;
mod random;

pub use constant::ConstParamGen;
pub use param_gen::ParamGen;
pub use random::RandParamGen;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{RecErr, Result};

/// The distribution the initial latent factors are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitDistribution {
    /// Uniform over `[-scale, scale)`.
    #[default]
    Uniform,
    /// Normal with mean 0 and standard deviation `scale`.
    Normal,
}

/// How to initialize the latent factors of a new model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamInit {
    pub distribution: InitDistribution,
    pub scale: f32,
}

impl ParamInit {
    pub fn uniform(scale: f32) -> Self {
        Self {
            distribution: InitDistribution::Uniform,
            scale,
        }
    }

    pub fn normal(scale: f32) -> Self {
        Self {
            distribution: InitDistribution::Normal,
            scale,
        }
    }

    /// Every latent factor starts at zero.
    pub fn zeros() -> Self {
        Self::uniform(0.)
    }

    /// Resolves this init into a parameter generator.
    ///
    /// A zero scale always yields a constant generator, regardless of the distribution.
    ///
    /// # Errors
    /// `RecErr::Config` if the scale is negative or not finite.
    pub fn generator<'r, R: Rng>(&self, rng: &'r mut R) -> Result<Box<dyn ParamGen + 'r>> {
        let scale = self.scale;

        if !scale.is_finite() || scale < 0. {
            return Err(RecErr::Config(format!(
                "init scale must be finite and non negative, got {scale}"
            )));
        }

        if scale == 0. {
            return Ok(Box::new(ConstParamGen::new(0.)));
        }

        let param_gen: Box<dyn ParamGen + 'r> = match self.distribution {
            InitDistribution::Uniform => Box::new(RandParamGen::symmetric(rng, scale)?),
            InitDistribution::Normal => Box::new(RandParamGen::normal(rng, 0., scale)?),
        };

        Ok(param_gen)
    }
}

impl Default for ParamInit {
    fn default() -> Self {
        Self::uniform(0.1)
    }
}
