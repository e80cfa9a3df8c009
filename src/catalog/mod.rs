mod entities;
mod university;

pub use entities::{Course, Student};
pub use university::University;
