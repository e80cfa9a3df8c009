use std::collections::{BTreeMap, BTreeSet};

use super::RatingScale;
use crate::{
    RecErr, Result,
    ids::{CourseId, StudentId},
};

/// The sparse student × course rating matrix.
///
/// Besides the observed ratings it keeps the set of registered students and courses, an
/// entity can be registered without having any rating yet. Every iteration order is
/// deterministic: students by id, then courses by id.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    scale: RatingScale,
    ratings: BTreeMap<StudentId, BTreeMap<CourseId, f32>>,
    students: BTreeSet<StudentId>,
    courses: BTreeSet<CourseId>,
    len: usize,
    sum: f64,
}

impl RatingStore {
    /// Creates a new empty `RatingStore`.
    ///
    /// # Arguments
    /// * `scale` - The range every inserted rating has to fall in.
    pub fn new(scale: RatingScale) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    /// Builds a store from `(student, course, rating)` triples.
    ///
    /// # Errors
    /// Fails on the first invalid or repeated rating.
    pub fn from_ratings<I, S, C>(scale: RatingScale, ratings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, C, f32)>,
        S: Into<StudentId>,
        C: Into<CourseId>,
    {
        let mut store = Self::new(scale);
        for (student, course, value) in ratings {
            store.insert(student, course, value)?;
        }
        Ok(store)
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    /// Registers a student that may not have rated anything yet.
    ///
    /// # Returns
    /// Whether the student was newly registered.
    pub fn register_student(&mut self, student: impl Into<StudentId>) -> bool {
        self.students.insert(student.into())
    }

    /// Registers a course that may not have been rated yet.
    ///
    /// # Returns
    /// Whether the course was newly registered.
    pub fn register_course(&mut self, course: impl Into<CourseId>) -> bool {
        self.courses.insert(course.into())
    }

    /// Records a rating, registering both entities along the way.
    ///
    /// # Errors
    /// * `RecErr::InvalidRating` if the value is outside of the scale.
    /// * `RecErr::DuplicateRating` if the pair was already rated.
    pub fn insert(
        &mut self,
        student: impl Into<StudentId>,
        course: impl Into<CourseId>,
        value: f32,
    ) -> Result<()> {
        let (student, course) = (student.into(), course.into());
        let value = self.scale.validate(value)?;

        let row = self.ratings.entry(student.clone()).or_default();
        if row.contains_key(&course) {
            return Err(RecErr::DuplicateRating { student, course });
        }

        row.insert(course.clone(), value);
        self.students.insert(student);
        self.courses.insert(course);
        self.len += 1;
        self.sum += value as f64;
        Ok(())
    }

    pub fn get(&self, student: &StudentId, course: &CourseId) -> Option<f32> {
        self.ratings.get(student)?.get(course).copied()
    }

    pub fn has_rated(&self, student: &StudentId, course: &CourseId) -> bool {
        self.get(student, course).is_some()
    }

    /// Iterates the courses a student rated along with the ratings.
    pub fn rated_by<'a>(
        &'a self,
        student: &StudentId,
    ) -> impl Iterator<Item = (&'a CourseId, f32)> + 'a {
        self.ratings
            .get(student)
            .into_iter()
            .flat_map(|row| row.iter().map(|(course, &value)| (course, value)))
    }

    /// Iterates every observed rating.
    pub fn iter(&self) -> impl Iterator<Item = (&StudentId, &CourseId, f32)> {
        self.ratings.iter().flat_map(|(student, row)| {
            row.iter()
                .map(move |(course, &value)| (student, course, value))
        })
    }

    /// Iterates every registered student in id order.
    pub fn students(&self) -> impl Iterator<Item = &StudentId> {
        self.students.iter()
    }

    /// Iterates every registered course in id order.
    pub fn courses(&self) -> impl Iterator<Item = &CourseId> {
        self.courses.iter()
    }

    pub fn num_students(&self) -> usize {
        self.students.len()
    }

    pub fn num_courses(&self) -> usize {
        self.courses.len()
    }

    /// Returns the amount of observed ratings.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the mean of every observed rating, `None` for an empty store.
    pub fn mean(&self) -> Option<f32> {
        if self.len == 0 {
            return None;
        }

        Some((self.sum / self.len as f64) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RatingStore {
        RatingStore::from_ratings(
            RatingScale::default(),
            [("nr1", "ST104a", 9.), ("nr1", "MT1174", 8.), ("nr2", "MT1173", 7.)],
        )
        .unwrap()
    }

    #[test]
    fn insert_registers_both_sides() {
        let store = store();

        assert_eq!(store.len(), 3);
        assert_eq!(store.num_students(), 2);
        assert_eq!(store.num_courses(), 3);
        assert_eq!(store.get(&"nr1".into(), &"MT1174".into()), Some(8.));
        assert!(!store.has_rated(&"nr2".into(), &"ST104a".into()));
    }

    #[test]
    fn ratings_are_immutable() {
        let mut store = store();

        let err = store.insert("nr1", "ST104a", 2.).unwrap_err();
        assert!(matches!(err, RecErr::DuplicateRating { .. }));
        assert_eq!(store.get(&"nr1".into(), &"ST104a".into()), Some(9.));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn out_of_range_ratings_are_rejected() {
        let mut store = store();

        let err = store.insert("nr3", "ST104a", 11.).unwrap_err();
        assert!(matches!(err, RecErr::InvalidRating { .. }));
        assert_eq!(store.num_students(), 2);
    }

    #[test]
    fn mean_covers_observed_ratings_only() {
        let mut store = store();
        store.register_course("ST104b");

        assert_eq!(store.mean(), Some(8.));
        assert_eq!(store.num_courses(), 4);
        assert!(RatingStore::default().mean().is_none());
    }

    #[test]
    fn iteration_is_ordered_by_student_then_course() {
        let store = store();
        let pairs: Vec<_> = store
            .iter()
            .map(|(s, c, _)| (s.as_str(), c.as_str()))
            .collect();

        assert_eq!(
            pairs,
            [("nr1", "MT1174"), ("nr1", "ST104a"), ("nr2", "MT1173")]
        );
    }

    #[test]
    fn rated_by_lists_a_students_courses() {
        let store = store();
        let courses: Vec<_> = store.rated_by(&"nr1".into()).map(|(c, r)| (c.as_str(), r)).collect();

        assert_eq!(courses, [("MT1174", 8.), ("ST104a", 9.)]);
        assert_eq!(store.rated_by(&"nobody".into()).count(), 0);
    }
}
