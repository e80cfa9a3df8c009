mod loader;
mod scale;
mod store;

pub use loader::{load_ratings, read_ratings};
pub use scale::RatingScale;
pub use store::RatingStore;
