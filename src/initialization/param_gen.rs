/// A `ParamGen` generates values for the initial state of the model's latent factors.
pub trait ParamGen {
    /// Samples exactly `n` parameters.
    ///
    /// # Arguments
    /// * `n` - The amount of samples to generate.
    fn sample(&mut self, n: usize) -> Vec<f32>;
}
