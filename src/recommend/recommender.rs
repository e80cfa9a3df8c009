use std::{borrow::Borrow, collections::BTreeSet};

use log::debug;

use crate::{
    RecErr, Result,
    ids::{CourseId, StudentId},
    model::{ColdStartPolicy, FactorModel},
    ratings::RatingStore,
};

/// A course suggested to a student along with its predicted rating.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub course: CourseId,
    pub score: f32,
}

impl Recommendation {
    /// Returns the probability the recommendation is right, `score / 20` within `[0, 1]`.
    pub fn correctness(&self) -> f32 {
        (self.score / 20.).clamp(0., 1.)
    }
}

/// Ranks the courses a student hasn't rated yet by their predicted rating.
///
/// Only holds shared references, any amount of recommenders may read the same model
/// concurrently.
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'a> {
    model: &'a FactorModel,
    store: &'a RatingStore,
    cold_start: ColdStartPolicy,
    clamp: bool,
}

impl<'a> Recommender<'a> {
    /// Creates a new `Recommender`.
    ///
    /// # Arguments
    /// * `model` - The trained (or untrained) model that scores the candidates.
    /// * `store` - The observed ratings, rated courses are never recommended.
    pub fn new(model: &'a FactorModel, store: &'a RatingStore) -> Self {
        Self {
            model,
            store,
            cold_start: ColdStartPolicy::default(),
            clamp: false,
        }
    }

    pub fn cold_start(mut self, policy: ColdStartPolicy) -> Self {
        self.cold_start = policy;
        self
    }

    /// Whether scores are clamped to the model's rating scale before ranking.
    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Recommends at most `top_n` courses out of `candidates` for `student`.
    ///
    /// Repeated candidates are considered once and courses the student already rated are
    /// skipped. The result is sorted by descending score, ties by ascending course id.
    ///
    /// # Errors
    /// `RecErr::UnknownEntity` if the student or a candidate course has no slot in the
    /// model and the cold start policy is `Reject`.
    pub fn recommend<I>(
        &self,
        student: &StudentId,
        candidates: I,
        top_n: usize,
    ) -> Result<Vec<Recommendation>>
    where
        I: IntoIterator,
        I::Item: Borrow<CourseId>,
    {
        if self.cold_start == ColdStartPolicy::Reject && !self.model.knows_student(student) {
            return Err(RecErr::UnknownEntity(student.clone().into()));
        }

        let candidates: BTreeSet<CourseId> = candidates
            .into_iter()
            .map(|course| course.borrow().clone())
            .filter(|course| !self.store.has_rated(student, course))
            .collect();

        let mut ranked = candidates
            .into_iter()
            .map(|course| {
                let score = self.score(student, &course)?;
                Ok(Recommendation { course, score })
            })
            .collect::<Result<Vec<_>>>()?;

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.course.cmp(&b.course))
        });
        ranked.truncate(top_n);

        debug!(student = student.as_str(), count = ranked.len(); "ranked recommendations");
        Ok(ranked)
    }

    /// Recommends at most `top_n` courses out of every course the model knows.
    pub fn recommend_all(&self, student: &StudentId, top_n: usize) -> Result<Vec<Recommendation>> {
        self.recommend(student, self.model.course_ids(), top_n)
    }

    fn score(&self, student: &StudentId, course: &CourseId) -> Result<f32> {
        let score = self.model.predict_with(student, course, self.cold_start)?;
        match self.clamp {
            true => Ok(self.model.scale().clamp(score)),
            false => Ok(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{initialization::ParamInit, ratings::RatingScale};

    fn store() -> RatingStore {
        let mut store = RatingStore::from_ratings(
            RatingScale::new(1., 5.).unwrap(),
            [("s1", "c1", 5.), ("s2", "c2", 3.), ("s2", "c3", 4.)],
        )
        .unwrap();
        store.register_course("c4");
        store
    }

    fn model(store: &RatingStore) -> FactorModel {
        let mut rng = StdRng::seed_from_u64(5);
        FactorModel::initialize(store, 2, ParamInit::zeros(), &mut rng).unwrap()
    }

    fn courses(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.course.as_str()).collect()
    }

    #[test]
    fn ties_are_broken_by_course_id() {
        let store = store();
        let model = model(&store);
        let recs = Recommender::new(&model, &store)
            .recommend_all(&"s1".into(), 10)
            .unwrap();

        assert_eq!(courses(&recs), ["c2", "c3", "c4"]);
        assert!(recs.iter().all(|r| r.score == model.mean()));
    }

    #[test]
    fn ranks_by_descending_score() {
        let store = store();
        let mut model = model(&store);
        model.bi[2] = 1.;
        model.bi[3] = 0.5;

        let recs = Recommender::new(&model, &store)
            .recommend_all(&"s1".into(), 10)
            .unwrap();

        assert_eq!(courses(&recs), ["c3", "c4", "c2"]);
    }

    #[test]
    fn rated_and_repeated_courses_are_skipped() {
        let store = store();
        let model = model(&store);
        let candidates = [CourseId::new("c3"), "c2".into(), "c3".into(), "c4".into()];

        let recs = Recommender::new(&model, &store)
            .recommend(&"s2".into(), &candidates, 10)
            .unwrap();

        assert_eq!(courses(&recs), ["c4"]);
    }

    #[test]
    fn top_n_caps_the_result() {
        let store = store();
        let model = model(&store);
        let recommender = Recommender::new(&model, &store);

        assert_eq!(recommender.recommend_all(&"s1".into(), 2).unwrap().len(), 2);
        assert!(recommender.recommend_all(&"s1".into(), 0).unwrap().is_empty());
    }

    #[test]
    fn unknown_student_depends_on_the_policy() {
        let store = store();
        let model = model(&store);
        let stranger = StudentId::new("s9");

        let err = Recommender::new(&model, &store)
            .recommend_all(&stranger, 3)
            .unwrap_err();
        assert!(matches!(err, RecErr::UnknownEntity(_)));

        let recs = Recommender::new(&model, &store)
            .cold_start(ColdStartPolicy::GlobalMean)
            .recommend_all(&stranger, 3)
            .unwrap();
        assert_eq!(courses(&recs), ["c1", "c2", "c3"]);
    }

    #[test]
    fn unknown_candidates_are_rejected() {
        let store = store();
        let model = model(&store);

        let err = Recommender::new(&model, &store)
            .recommend(&"s1".into(), [CourseId::new("c9")], 3)
            .unwrap_err();

        assert!(matches!(err, RecErr::UnknownEntity(_)));
    }

    #[test]
    fn correctness_is_a_bounded_fraction_of_the_score() {
        let rec = |score| Recommendation {
            course: "c1".into(),
            score,
        };

        assert_eq!(rec(9.).correctness(), 0.45);
        assert_eq!(rec(-3.).correctness(), 0.);
        assert_eq!(rec(25.).correctness(), 1.);
    }

    #[test]
    fn clamped_scores_stay_in_scale() {
        let store = store();
        let mut model = model(&store);
        model.bi.fill(10.);

        let recs = Recommender::new(&model, &store)
            .clamp(true)
            .recommend_all(&"s1".into(), 10)
            .unwrap();

        assert!(recs.iter().all(|r| r.score == 5.));
    }
}
