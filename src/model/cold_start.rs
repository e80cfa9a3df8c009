use serde::{Deserialize, Serialize};

/// What to do when a prediction involves a student or course the model has no slot for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColdStartPolicy {
    /// Fail with `RecErr::UnknownEntity`.
    #[default]
    Reject,
    /// The unknown side contributes a zero bias and a zero latent vector, so the
    /// prediction falls back to the global mean plus whatever bias is known.
    GlobalMean,
}
