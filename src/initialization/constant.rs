use super::ParamGen;

/// Generates the same value every time, used for zero initialized factors.
pub struct ConstParamGen {
    value: f32,
}

impl ConstParamGen {
    /// Creates a new `ConstParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `value` - The value to always generate.
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl ParamGen for ConstParamGen {
    fn sample(&mut self, n: usize) -> Vec<f32> {
        vec![self.value; n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_factors_for_a_new_model() {
        let mut param_gen = ConstParamGen::new(0.);

        assert!(param_gen.sample(0).is_empty());
        assert_eq!(param_gen.sample(6), [0.; 6]);
    }

    #[test]
    fn never_runs_out() {
        let mut param_gen = ConstParamGen::new(0.25);

        for n in [3, 40, 1] {
            assert!(param_gen.sample(n).iter().all(|&x| x == 0.25));
        }
    }
}
