/// Statistics of a single training epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochStats {
    epoch: usize,
    learning_rate: f32,
    loss: f64,
    rmse: f64,
}

impl EpochStats {
    /// Creates a new `EpochStats`.
    ///
    /// # Arguments
    /// * `epoch` - The 1-based number of the epoch within its run.
    /// * `learning_rate` - The learning rate used throughout the epoch.
    /// * `loss` - The regularized squared error after the epoch.
    /// * `rmse` - The root mean squared error over the observed ratings after the epoch.
    pub fn new(epoch: usize, learning_rate: f32, loss: f64, rmse: f64) -> Self {
        Self {
            epoch,
            learning_rate,
            loss,
            rmse,
        }
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn loss(&self) -> f64 {
        self.loss
    }

    pub fn rmse(&self) -> f64 {
        self.rmse
    }
}

/// Why a training run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The loss improvement fell below the tolerance.
    Converged,
    /// The maximum amount of epochs was reached.
    MaxEpochs,
}

/// The outcome of a successful training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    epochs: Vec<EpochStats>,
    stop: StopReason,
}

impl TrainingReport {
    pub fn new(epochs: Vec<EpochStats>, stop: StopReason) -> Self {
        Self { epochs, stop }
    }

    pub fn epochs(&self) -> &[EpochStats] {
        &self.epochs
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop
    }

    pub fn converged(&self) -> bool {
        self.stop == StopReason::Converged
    }

    /// Returns the loss of every epoch, in order.
    pub fn losses(&self) -> Vec<f64> {
        self.epochs.iter().map(EpochStats::loss).collect()
    }

    pub fn final_loss(&self) -> Option<f64> {
        self.epochs.last().map(EpochStats::loss)
    }

    pub fn final_rmse(&self) -> Option<f64> {
        self.epochs.last().map(EpochStats::rmse)
    }
}
