use ndarray::{Array1, Array2, ArrayView1, Axis, aview1};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ColdStartPolicy;
use crate::{
    RecErr, Result,
    ids::{CourseId, IdIndex, StudentId},
    initialization::ParamInit,
    ratings::{RatingScale, RatingStore},
};

/// Whether a model has completed at least one training epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// Freshly initialized, predictions are defined but meaningless.
    Untrained,
    Trained,
}

/// A biased matrix factorization model of the rating matrix.
///
/// A rating is predicted as `mu + bu[s] + bi[c] + P[s] · Q[c]` where `P` and `Q` hold a
/// latent vector of dimension `k` per student and per course. Rows are indexed by the
/// stable slots of the student and course `IdIndex`es.
///
/// The `Trainer` mutates the parameters in place, the model is never copied per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorModel {
    pub(crate) k: usize,
    pub(crate) mu: f32,
    pub(crate) scale: RatingScale,
    pub(crate) students: IdIndex<StudentId>,
    pub(crate) courses: IdIndex<CourseId>,
    pub(crate) p: Array2<f32>,
    pub(crate) q: Array2<f32>,
    pub(crate) bu: Array1<f32>,
    pub(crate) bi: Array1<f32>,
    pub(crate) epochs_trained: usize,
}

impl FactorModel {
    /// Allocates the parameters for every student and course registered in `store`.
    ///
    /// Latent vectors are drawn from `init`, biases start at zero and `mu` is the mean
    /// of the observed ratings.
    ///
    /// # Arguments
    /// * `store` - The ratings, its registered entities get a slot in id order.
    /// * `k` - The latent dimension.
    /// * `init` - The latent factor initialization.
    /// * `rng` - A random number generator.
    ///
    /// # Errors
    /// * `RecErr::Config` if `k` is zero or the init scale is invalid.
    /// * `RecErr::EmptyDataset` if the store has no ratings.
    pub fn initialize<R: Rng>(
        store: &RatingStore,
        k: usize,
        init: ParamInit,
        rng: &mut R,
    ) -> Result<Self> {
        if k == 0 {
            return Err(RecErr::Config(
                "the latent dimension k must be greater than zero".into(),
            ));
        }

        let mu = store.mean().ok_or(RecErr::EmptyDataset)?;
        let students: IdIndex<StudentId> = store.students().cloned().collect();
        let courses: IdIndex<CourseId> = store.courses().cloned().collect();

        let mut param_gen = init.generator(rng)?;
        let p = Array2::from_shape_vec((students.len(), k), param_gen.sample(students.len() * k))?;
        let q = Array2::from_shape_vec((courses.len(), k), param_gen.sample(courses.len() * k))?;

        Ok(Self {
            k,
            mu,
            scale: store.scale(),
            bu: Array1::zeros(students.len()),
            bi: Array1::zeros(courses.len()),
            students,
            courses,
            p,
            q,
            epochs_trained: 0,
        })
    }

    /// Registers a student that arrived after initialization.
    ///
    /// The student starts with a zero latent vector and a zero bias. Registering a known
    /// student leaves the model untouched.
    ///
    /// # Returns
    /// The slot of the student.
    pub fn register_student(&mut self, student: StudentId) -> Result<usize> {
        let (slot, inserted) = self.students.insert(student);
        if inserted {
            self.p.push_row(Array1::zeros(self.k).view())?;
            self.bu.append(Axis(0), aview1(&[0.]))?;
        }
        Ok(slot)
    }

    /// Registers a course that arrived after initialization, see `register_student`.
    pub fn register_course(&mut self, course: CourseId) -> Result<usize> {
        let (slot, inserted) = self.courses.insert(course);
        if inserted {
            self.q.push_row(Array1::zeros(self.k).view())?;
            self.bi.append(Axis(0), aview1(&[0.]))?;
        }
        Ok(slot)
    }

    /// Predicts the rating `student` would give `course`.
    ///
    /// # Errors
    /// `RecErr::UnknownEntity` if either id has no slot in the model.
    pub fn predict(&self, student: &StudentId, course: &CourseId) -> Result<f32> {
        self.predict_with(student, course, ColdStartPolicy::Reject)
    }

    /// Predicts a rating, resolving unknown ids with the given cold start policy.
    pub fn predict_with(
        &self,
        student: &StudentId,
        course: &CourseId,
        policy: ColdStartPolicy,
    ) -> Result<f32> {
        let s = self.students.slot(student);
        let c = self.courses.slot(course);

        if let (Some(s), Some(c)) = (s, c) {
            return Ok(self.score(s, c));
        }

        match policy {
            ColdStartPolicy::Reject => {
                let entity = match s {
                    None => student.clone().into(),
                    Some(_) => course.clone().into(),
                };
                Err(RecErr::UnknownEntity(entity))
            }
            ColdStartPolicy::GlobalMean => {
                let bu = s.map_or(0., |s| self.bu[s]);
                let bi = c.map_or(0., |c| self.bi[c]);
                Ok(self.mu + bu + bi)
            }
        }
    }

    /// Predicts a rating clamped to the model's rating scale.
    pub fn predict_clamped(&self, student: &StudentId, course: &CourseId) -> Result<f32> {
        Ok(self.scale.clamp(self.predict(student, course)?))
    }

    /// The prediction for a pair of slots, no bounds checking beyond ndarray's.
    pub(crate) fn score(&self, s: usize, c: usize) -> f32 {
        self.mu + self.bu[s] + self.bi[c] + self.p.row(s).dot(&self.q.row(c))
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the global mean rating the model was initialized with.
    pub fn mean(&self) -> f32 {
        self.mu
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    pub fn epochs_trained(&self) -> usize {
        self.epochs_trained
    }

    pub fn state(&self) -> ModelState {
        match self.epochs_trained {
            0 => ModelState::Untrained,
            _ => ModelState::Trained,
        }
    }

    /// Iterates the known students in slot order.
    pub fn student_ids(&self) -> impl Iterator<Item = &StudentId> {
        self.students.iter()
    }

    /// Iterates the known courses in slot order.
    pub fn course_ids(&self) -> impl Iterator<Item = &CourseId> {
        self.courses.iter()
    }

    pub fn knows_student(&self, student: &StudentId) -> bool {
        self.students.contains(student)
    }

    pub fn knows_course(&self, course: &CourseId) -> bool {
        self.courses.contains(course)
    }

    pub fn num_students(&self) -> usize {
        self.students.len()
    }

    pub fn num_courses(&self) -> usize {
        self.courses.len()
    }

    pub fn student_factors(&self, student: &StudentId) -> Option<ArrayView1<'_, f32>> {
        self.students.slot(student).map(|s| self.p.row(s))
    }

    pub fn course_factors(&self, course: &CourseId) -> Option<ArrayView1<'_, f32>> {
        self.courses.slot(course).map(|c| self.q.row(c))
    }

    pub fn student_bias(&self, student: &StudentId) -> Option<f32> {
        self.students.slot(student).map(|s| self.bu[s])
    }

    pub fn course_bias(&self, course: &CourseId) -> Option<f32> {
        self.courses.slot(course).map(|c| self.bi[c])
    }

    /// Checks the invariants that tie the index sizes, `k` and the parameter shapes together.
    pub(crate) fn check_consistency(&self) -> Result<()> {
        let (ns, nc, k) = (self.students.len(), self.courses.len(), self.k);

        if k == 0 {
            return Err(RecErr::InvalidModel("k must be greater than zero".into()));
        }

        let shapes = [
            ("P", self.p.dim(), (ns, k)),
            ("Q", self.q.dim(), (nc, k)),
            ("bu", (self.bu.len(), 1), (ns, 1)),
            ("bi", (self.bi.len(), 1), (nc, 1)),
        ];

        for (name, got, expected) in shapes {
            if got != expected {
                return Err(RecErr::InvalidModel(format!(
                    "{name} has shape {got:?}, expected {expected:?}"
                )));
            }
        }

        if RatingScale::new(self.scale.min(), self.scale.max()).is_err() {
            return Err(RecErr::InvalidModel(format!(
                "invalid rating scale [{}, {}]",
                self.scale.min(),
                self.scale.max()
            )));
        }

        if !self.mu.is_finite() {
            return Err(RecErr::InvalidModel(format!("mean {} is not finite", self.mu)));
        }

        Ok(())
    }
}
