use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, StudentId};

/// A student registered at a university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Academic terms already completed, may be non zero on arrival through accreditation.
    pub terms_completed: u32,
}

impl Student {
    pub fn new(id: impl Into<StudentId>, name: impl Into<String>, terms_completed: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            terms_completed,
        }
    }

    /// Returns the amount of whole academic years completed, two terms per year.
    pub fn years_completed(&self) -> u32 {
        self.terms_completed / 2
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) term: {}", self.name, self.id, self.terms_completed)
    }
}

/// A course offered at a university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub abbreviation: String,
    /// The semester during which the course is available.
    pub semester: u32,
    pub elective: bool,
}

impl Course {
    /// Creates a new elective `Course` abbreviated as its id.
    pub fn new(id: impl Into<CourseId>, name: impl Into<String>, semester: u32) -> Self {
        let id = id.into();
        Self {
            abbreviation: id.as_str().to_owned(),
            id,
            name: name.into(),
            semester,
            elective: true,
        }
    }

    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = abbreviation.into();
        self
    }

    /// Marks the course as compulsory.
    pub fn compulsory(mut self) -> Self {
        self.elective = false;
        self
    }
}

impl Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.abbreviation)
    }
}
