use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::ParamGen;
use crate::Result;

/// A parameter generator that follows a certain probabilistic distribution.
pub struct RandParamGen<'r, R: Rng, D: Distribution<f32>> {
    rng: &'r mut R,
    distribution: D,
}

impl<'r, R: Rng, D: Distribution<f32>> RandParamGen<'r, R, D> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `distribution` - The distribution to sample the random numbers from.
    pub fn new(rng: &'r mut R, distribution: D) -> Self {
        Self { rng, distribution }
    }
}

impl<'r, R: Rng> RandParamGen<'r, R, Uniform<f32>> {
    /// Creates a new `RandParamGen` with a uniform distribution over `[low, high)`.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high).
    pub fn uniform(rng: &'r mut R, low: f32, high: f32) -> Result<Self> {
        Ok(Self::new(rng, Uniform::new(low, high)?))
    }

    /// Creates a new `RandParamGen` with a uniform distribution over `[-scale, scale)`.
    pub fn symmetric(rng: &'r mut R, scale: f32) -> Result<Self> {
        Self::uniform(rng, -scale, scale)
    }
}

impl<'r, R: Rng> RandParamGen<'r, R, Normal<f32>> {
    /// Creates a new `RandParamGen` with a normal distribution.
    ///
    /// # Returns
    /// An error if `std_dev` is not finite (Nan or infinite).
    pub fn normal(rng: &'r mut R, mean: f32, std_dev: f32) -> Result<Self> {
        Ok(Self::new(rng, Normal::new(mean, std_dev)?))
    }
}

impl<R: Rng, D: Distribution<f32>> ParamGen for RandParamGen<'_, R, D> {
    fn sample(&mut self, n: usize) -> Vec<f32> {
        (0..n)
            .map(|_| self.distribution.sample(&mut *self.rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn uniform_samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);

        let mut param_gen = RandParamGen::symmetric(&mut rng, 0.1).unwrap();
        let sample = param_gen.sample(100);

        assert_eq!(sample.len(), 100);
        assert!(sample.iter().all(|x| (-0.1..0.1).contains(x)));
    }

    #[test]
    fn invalid_ranges_fail() {
        let mut rng = StdRng::seed_from_u64(42);

        assert!(RandParamGen::uniform(&mut rng, 1., 1.).is_err());
        assert!(RandParamGen::normal(&mut rng, 0., f32::NAN).is_err());
    }

    #[test]
    fn same_seed_same_sample() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);

        let sa = RandParamGen::normal(&mut a, 0., 1.).unwrap().sample(8);
        let sb = RandParamGen::normal(&mut b, 0., 1.).unwrap().sample(8);

        assert_eq!(sa, sb);
    }
}
