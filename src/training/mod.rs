mod builder;
mod config;
mod pass;
mod report;
mod schedule;
mod sgd;
mod stratified;
mod trainer;

pub use builder::TrainerBuilder;
pub use config::TrainerConfig;
pub use report::{EpochStats, StopReason, TrainingReport};
pub use schedule::LrSchedule;
pub use trainer::Trainer;
