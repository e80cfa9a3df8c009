use std::collections::BTreeMap;

use log::debug;

use super::{Course, Student};
use crate::{
    RecErr, Result,
    ids::{CourseId, Entity, StudentId},
    ratings::{RatingScale, RatingStore},
};

/// A university with its registered students, offered courses and enrollments.
///
/// Students can only rate courses they are enrolled in. The rating matrix the engine trains
/// on is rebuilt from the enrollments with `rating_store`.
#[derive(Debug, Clone)]
pub struct University {
    name: String,
    abbreviation: String,
    scale: RatingScale,
    students: BTreeMap<StudentId, Student>,
    courses: BTreeMap<CourseId, Course>,
    /// Every enrollment along with its rating, if any.
    enrollments: BTreeMap<(StudentId, CourseId), Option<f32>>,
}

impl University {
    /// Creates a new `University` rating courses on the default scale.
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self::with_scale(name, abbreviation, RatingScale::default())
    }

    pub fn with_scale(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        scale: RatingScale,
    ) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            scale,
            students: BTreeMap::new(),
            courses: BTreeMap::new(),
            enrollments: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    /// Registers a new student.
    ///
    /// # Errors
    /// `RecErr::DuplicateEntity` if the student id is taken.
    pub fn register_student(&mut self, student: Student) -> Result<&Student> {
        if self.students.contains_key(&student.id) {
            return Err(RecErr::DuplicateEntity(student.id.into()));
        }

        let id = student.id.clone();
        Ok(self.students.entry(id).or_insert(student))
    }

    /// Adds a course to the university's offer.
    ///
    /// # Errors
    /// `RecErr::DuplicateEntity` if the course id is taken.
    pub fn add_course(&mut self, course: Course) -> Result<&Course> {
        if self.courses.contains_key(&course.id) {
            return Err(RecErr::DuplicateEntity(course.id.into()));
        }

        let id = course.id.clone();
        Ok(self.courses.entry(id).or_insert(course))
    }

    pub fn find_student(&self, id: &StudentId) -> Option<&Student> {
        self.students.get(id)
    }

    pub fn find_course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.get(id)
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Enrolls a student in a course.
    ///
    /// # Returns
    /// Whether the enrollment is new, enrolling twice keeps the existing rating.
    ///
    /// # Errors
    /// `RecErr::UnknownEntity` if either side isn't registered here.
    pub fn enroll(&mut self, student: &StudentId, course: &CourseId) -> Result<bool> {
        self.check_registered(student, course)?;

        let key = (student.clone(), course.clone());
        if self.enrollments.contains_key(&key) {
            return Ok(false);
        }

        self.enrollments.insert(key, None);
        Ok(true)
    }

    /// Sets the rating a student gives to a course they are enrolled in, replacing any
    /// earlier rating of that enrollment.
    ///
    /// `RatingStore`s already built with `rating_store` are snapshots and keep the old
    /// rating, only stores built afterwards see the new one.
    ///
    /// # Errors
    /// * `RecErr::UnknownEntity` if either side isn't registered here.
    /// * `RecErr::NotEnrolled` if the student isn't enrolled in the course.
    /// * `RecErr::InvalidRating` if the rating is outside of the university's scale.
    pub fn rate_course(&mut self, student: &StudentId, course: &CourseId, rating: f32) -> Result<()> {
        self.check_registered(student, course)?;
        let rating = self.scale.validate(rating)?;

        let enrollment = self
            .enrollments
            .get_mut(&(student.clone(), course.clone()))
            .ok_or_else(|| RecErr::NotEnrolled {
                student: student.clone(),
                course: course.clone(),
            })?;

        *enrollment = Some(rating);
        Ok(())
    }

    /// Returns the rating of an enrollment, `None` if unrated or not enrolled.
    pub fn rating(&self, student: &StudentId, course: &CourseId) -> Option<f32> {
        self.enrollments
            .get(&(student.clone(), course.clone()))
            .copied()
            .flatten()
    }

    /// Iterates the courses a student is enrolled in along with their ratings.
    pub fn enrollments_of<'a>(
        &'a self,
        student: &'a StudentId,
    ) -> impl Iterator<Item = (&'a CourseId, Option<f32>)> + 'a {
        self.enrollments
            .iter()
            .filter(move |((s, _), _)| s == student)
            .map(|((_, c), &rating)| (c, rating))
    }

    /// Removes a student and all of its enrollments.
    ///
    /// # Errors
    /// `RecErr::UnknownEntity` if the student isn't registered here.
    pub fn delete_student(&mut self, id: &StudentId) -> Result<Student> {
        let student = self
            .students
            .remove(id)
            .ok_or_else(|| RecErr::UnknownEntity(id.clone().into()))?;

        self.enrollments.retain(|(s, _), _| s != id);
        Ok(student)
    }

    /// Removes a course and all of its enrollments.
    ///
    /// # Errors
    /// `RecErr::UnknownEntity` if the course isn't offered here.
    pub fn delete_course(&mut self, id: &CourseId) -> Result<Course> {
        let course = self
            .courses
            .remove(id)
            .ok_or_else(|| RecErr::UnknownEntity(id.clone().into()))?;

        self.enrollments.retain(|(_, c), _| c != id);
        Ok(course)
    }

    /// Builds the rating matrix of the university.
    ///
    /// Every registered student and course gets a row or column, rated enrollments become
    /// the observed ratings.
    pub fn rating_store(&self) -> Result<RatingStore> {
        let mut store = RatingStore::new(self.scale);

        for id in self.students.keys() {
            store.register_student(id.clone());
        }

        for id in self.courses.keys() {
            store.register_course(id.clone());
        }

        for ((student, course), rating) in &self.enrollments {
            if let Some(rating) = *rating {
                store.insert(student.clone(), course.clone(), rating)?;
            }
        }

        debug!(
            university = self.abbreviation.as_str(),
            students = store.num_students(),
            courses = store.num_courses(),
            ratings = store.len();
            "rebuilt the rating matrix"
        );

        Ok(store)
    }

    fn check_registered(&self, student: &StudentId, course: &CourseId) -> Result<()> {
        if !self.students.contains_key(student) {
            return Err(RecErr::UnknownEntity(Entity::Student(student.clone())));
        }

        if !self.courses.contains_key(course) {
            return Err(RecErr::UnknownEntity(Entity::Course(course.clone())));
        }

        Ok(())
    }
}
