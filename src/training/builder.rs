use super::{LrSchedule, Trainer, TrainerConfig};
use crate::{Result, initialization::InitDistribution};

/// Builds new `Trainer`s one option at a time.
///
/// Unset options keep the values of `TrainerConfig::default`, everything is validated
/// once on `build`.
#[derive(Debug, Clone, Default)]
pub struct TrainerBuilder {
    config: TrainerConfig,
}

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latent_dim(mut self, k: usize) -> Self {
        self.config.k = k;
        self
    }

    pub fn eta(mut self, eta: f32) -> Self {
        self.config.eta = eta;
        self
    }

    pub fn lambda(mut self, lambda: f32) -> Self {
        self.config.lambda = lambda;
        self
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.config.epochs = epochs;
        self
    }

    /// Sets the minimum loss change between epochs, `0` disables early stopping.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    pub fn init_scale(mut self, scale: f32) -> Self {
        self.config.init_scale = scale;
        self
    }

    pub fn init_distribution(mut self, distribution: InitDistribution) -> Self {
        self.config.init = distribution;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn schedule(mut self, schedule: LrSchedule) -> Self {
        self.config.schedule = schedule;
        self
    }

    pub fn divergence_threshold(mut self, threshold: f64) -> Self {
        self.config.divergence_threshold = threshold;
        self
    }

    /// Splits every epoch into `blocks * blocks` independent tasks run on the rayon pool.
    pub fn blocks(mut self, blocks: usize) -> Self {
        self.config.blocks = Some(blocks);
        self
    }

    /// Builds the `Trainer`.
    ///
    /// # Errors
    /// `RecErr::Config` if any option is out of range.
    pub fn build(self) -> Result<Trainer> {
        Trainer::new(self.config)
    }
}

impl From<TrainerConfig> for TrainerBuilder {
    fn from(config: TrainerConfig) -> Self {
        Self { config }
    }
}
