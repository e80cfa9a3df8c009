use rand::{Rng, seq::SliceRandom};

use super::sgd::{Observation, Step};
use crate::model::FactorModel;

/// One full sweep of stochastic gradient steps over the observed ratings.
pub(crate) trait Pass {
    /// Runs an epoch, mutating the model's parameters in place.
    ///
    /// # Arguments
    /// * `model` - The model being trained.
    /// * `lr` - The learning rate for this epoch.
    /// * `lambda` - The regularization strength.
    /// * `rng` - Drives the order in which ratings are visited.
    fn run_epoch<R: Rng>(&mut self, model: &mut FactorModel, lr: f32, lambda: f32, rng: &mut R);
}

/// Visits every rating once per epoch, in a freshly shuffled order, on the calling thread.
pub(crate) struct SequentialPass {
    observations: Vec<Observation>,
}

impl SequentialPass {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }
}

impl Pass for SequentialPass {
    fn run_epoch<R: Rng>(&mut self, model: &mut FactorModel, lr: f32, lambda: f32, rng: &mut R) {
        self.observations.shuffle(rng);

        let step = Step {
            mu: model.mu,
            lr,
            lambda,
        };

        for &Observation { s, c, r } in &self.observations {
            step.apply(
                r,
                model.p.row_mut(s),
                model.q.row_mut(c),
                &mut model.bu[s],
                &mut model.bi[c],
            );
        }
    }
}
