use serde::{Deserialize, Serialize};

use crate::{RecErr, Result};

/// The inclusive range every rating must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    min: f32,
    max: f32,
}

impl RatingScale {
    /// Creates a new `RatingScale`.
    ///
    /// # Arguments
    /// * `min` - The lowest valid rating.
    /// * `max` - The highest valid rating.
    ///
    /// # Returns
    /// A `RecErr::Config` if the bounds are not finite or `min >= max`.
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(RecErr::Config(format!(
                "rating scale bounds must be finite with min < max, got [{min}, {max}]"
            )));
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Checks that `value` is a valid rating for this scale.
    ///
    /// # Returns
    /// The same value or a `RecErr::InvalidRating`.
    pub fn validate(&self, value: f32) -> Result<f32> {
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(RecErr::InvalidRating {
                value,
                min: self.min,
                max: self.max,
            });
        }

        Ok(value)
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

impl Default for RatingScale {
    /// Courses are rated with integers from 1 to 10.
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 10.0,
        }
    }
}
