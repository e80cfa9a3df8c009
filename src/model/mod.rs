mod cold_start;
mod factor_model;
mod persistence;

pub use cold_start::ColdStartPolicy;
pub use factor_model::{FactorModel, ModelState};
