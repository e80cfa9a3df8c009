use ndarray::{ArrayViewMut1, Zip};

use crate::{
    RecErr, Result,
    model::FactorModel,
    ratings::RatingStore,
};

/// An observed rating resolved to the model's slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Observation {
    pub s: usize,
    pub c: usize,
    pub r: f32,
}

/// Resolves every rating of `store` to model slots.
///
/// # Errors
/// `RecErr::UnknownEntity` for the first rating whose student or course has no slot.
pub(crate) fn resolve(model: &FactorModel, store: &RatingStore) -> Result<Vec<Observation>> {
    store
        .iter()
        .map(|(student, course, r)| {
            let s = model
                .students
                .slot(student)
                .ok_or_else(|| RecErr::UnknownEntity(student.clone().into()))?;
            let c = model
                .courses
                .slot(course)
                .ok_or_else(|| RecErr::UnknownEntity(course.clone().into()))?;
            Ok(Observation { s, c, r })
        })
        .collect()
}

/// Hyperparameters of a single stochastic gradient step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Step {
    pub mu: f32,
    pub lr: f32,
    pub lambda: f32,
}

impl Step {
    /// Moves the parameters of one (student, course) pair against the gradient of the
    /// regularized squared error of rating `r`.
    ///
    /// Both latent vectors are updated from their pre-update values.
    ///
    /// # Returns
    /// The prediction error before the update.
    pub fn apply(
        &self,
        r: f32,
        pu: ArrayViewMut1<f32>,
        qi: ArrayViewMut1<f32>,
        bu: &mut f32,
        bi: &mut f32,
    ) -> f32 {
        let Step { mu, lr, lambda } = *self;
        let e = r - (mu + *bu + *bi + pu.dot(&qi));

        *bu += lr * (e - lambda * *bu);
        *bi += lr * (e - lambda * *bi);

        Zip::from(pu).and(qi).for_each(|p, q| {
            let (p0, q0) = (*p, *q);
            *p += lr * (e * q0 - lambda * p0);
            *q += lr * (e * p0 - lambda * q0);
        });

        e
    }
}

/// Evaluates the training objective over the observed ratings.
///
/// The penalty counts every parameter once per evaluation, not once per observation it
/// appears in, so it is smaller than the objective the per-rating steps descend.
///
/// # Returns
/// The squared error plus `lambda` times the squared norm of every parameter, and the
/// root mean squared error of the predictions.
pub(crate) fn objective(model: &FactorModel, observations: &[Observation], lambda: f32) -> (f64, f64) {
    let squared_error: f64 = observations
        .iter()
        .map(|o| (o.r as f64 - model.score(o.s, o.c) as f64).powi(2))
        .sum();

    let penalty = squared_norm(model.p.iter())
        + squared_norm(model.q.iter())
        + squared_norm(model.bu.iter())
        + squared_norm(model.bi.iter());

    let loss = squared_error + lambda as f64 * penalty;
    let rmse = (squared_error / observations.len().max(1) as f64).sqrt();
    (loss, rmse)
}

fn squared_norm<'a>(xs: impl Iterator<Item = &'a f32>) -> f64 {
    xs.map(|&x| (x as f64).powi(2)).sum()
}
