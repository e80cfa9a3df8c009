use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};

use super::{
    EpochStats, StopReason, TrainerBuilder, TrainerConfig, TrainingReport,
    pass::{Pass, SequentialPass},
    sgd::{self, Observation},
    stratified::StratifiedPass,
};
use crate::{RecErr, Result, model::FactorModel, ratings::RatingStore};

/// Offsets the configured seed for the shuffling stream, so it doesn't replay the
/// initialization stream.
const SHUFFLE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Fits `FactorModel`s to observed ratings with stochastic gradient descent.
///
/// The trainer only holds the validated configuration; the model is owned by the caller
/// and mutated in place through `fit`.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// Creates a new `Trainer`.
    ///
    /// # Errors
    /// `RecErr::Config` if any option is out of range.
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::new()
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Creates a new untrained model for every entity registered in `store`.
    pub fn initialize(&self, store: &RatingStore) -> Result<FactorModel> {
        let mut rng = self.generate_rng(0);
        FactorModel::initialize(store, self.config.k, self.config.param_init(), &mut rng)
    }

    /// Initializes a new model and fits it to `store`.
    pub fn train(&self, store: &RatingStore) -> Result<(FactorModel, TrainingReport)> {
        let mut model = self.initialize(store)?;
        let report = self.fit(&mut model, store)?;
        Ok((model, report))
    }

    /// Fits `model` to the ratings of `store`, continuing from its current parameters.
    ///
    /// # Errors
    /// * `RecErr::EmptyDataset` if there are no ratings.
    /// * `RecErr::UnknownEntity` if a rating references an id the model has no slot for.
    /// * `RecErr::Divergence` if the loss becomes non finite or crosses the configured
    ///   threshold. The model is restored to the state it had before this call.
    pub fn fit(&self, model: &mut FactorModel, store: &RatingStore) -> Result<TrainingReport> {
        if store.is_empty() {
            return Err(RecErr::EmptyDataset);
        }

        let observations = sgd::resolve(model, store)?;
        let mut rng = self.generate_rng(SHUFFLE_STREAM);
        let snapshot = model.clone();

        let (ns, nc) = (model.num_students(), model.num_courses());
        let blocks = self.config.blocks.unwrap_or(1).min(ns).min(nc).max(1);

        info!(
            ratings = observations.len(),
            students = ns,
            courses = nc,
            k = model.k(),
            blocks = blocks;
            "starting training"
        );

        let result = if blocks > 1 {
            let pass = StratifiedPass::new(&observations, ns, nc, blocks);
            self.run(model, pass, &observations, &mut rng)
        } else {
            let pass = SequentialPass::new(observations.clone());
            self.run(model, pass, &observations, &mut rng)
        };

        if let Err(RecErr::Divergence { epoch, loss }) = &result {
            warn!(epoch = *epoch, loss = *loss; "training diverged, restoring the previous model");
            *model = snapshot;
        }

        result
    }

    fn run<P: Pass>(
        &self,
        model: &mut FactorModel,
        mut pass: P,
        observations: &[Observation],
        rng: &mut StdRng,
    ) -> Result<TrainingReport> {
        let cfg = &self.config;
        let mut epochs = Vec::with_capacity(cfg.epochs);
        let mut prev_loss: Option<f64> = None;
        let mut stop = StopReason::MaxEpochs;

        for epoch in 1..=cfg.epochs {
            let lr = cfg.schedule.learning_rate(cfg.eta, epoch - 1);
            pass.run_epoch(model, lr, cfg.lambda, rng);

            let (loss, rmse) = sgd::objective(model, observations, cfg.lambda);
            if !loss.is_finite() || loss > cfg.divergence_threshold {
                return Err(RecErr::Divergence { epoch, loss });
            }

            model.epochs_trained += 1;
            epochs.push(EpochStats::new(epoch, lr, loss, rmse));
            debug!(epoch = epoch, lr = lr, loss = loss, rmse = rmse; "epoch finished");

            if prev_loss.is_some_and(|prev| (prev - loss).abs() < cfg.tolerance) {
                stop = StopReason::Converged;
                break;
            }
            prev_loss = Some(loss);
        }

        let report = TrainingReport::new(epochs, stop);
        info!(
            epochs = report.epochs().len(),
            loss = report.final_loss().unwrap_or_default(),
            rmse = report.final_rmse().unwrap_or_default();
            "training finished: {stop:?}"
        );

        Ok(report)
    }

    fn generate_rng(&self, stream: u64) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ stream),
            None => StdRng::from_os_rng(),
        }
    }
}

impl TryFrom<TrainerConfig> for Trainer {
    type Error = RecErr;

    fn try_from(value: TrainerConfig) -> Result<Self> {
        Self::new(value)
    }
}
