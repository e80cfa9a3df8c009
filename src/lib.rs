pub mod catalog;
pub mod error;
pub mod ids;
pub mod initialization;
pub mod model;
pub mod ratings;
pub mod recommend;
pub mod training;

pub use error::{RecErr, Result};
pub use ids::{CourseId, StudentId};
pub use model::{ColdStartPolicy, FactorModel, ModelState};
pub use ratings::{RatingScale, RatingStore};
pub use recommend::{Recommendation, Recommender};
pub use training::{Trainer, TrainerBuilder, TrainerConfig, TrainingReport};
