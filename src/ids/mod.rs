mod index;

pub use index::IdIndex;

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new id from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// The identity of a student, unique within a university (its student number).
    StudentId
);

entity_id!(
    /// The identity of a course, unique within a university (its course number).
    CourseId
);

/// Either side of the rating matrix, used to report which entity was missing or repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Student(StudentId),
    Course(CourseId),
}

impl Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Student(id) => write!(f, "student '{id}'"),
            Entity::Course(id) => write!(f, "course '{id}'"),
        }
    }
}

impl From<StudentId> for Entity {
    fn from(value: StudentId) -> Self {
        Entity::Student(value)
    }
}

impl From<CourseId> for Entity {
    fn from(value: CourseId) -> Self {
        Entity::Course(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_ids_order_lexicographically() {
        let mut ids = vec![CourseId::from("MT1174"), CourseId::from("MT1173"), "ST104a".into()];
        ids.sort();

        assert_eq!(ids, ["MT1173".into(), "MT1174".into(), CourseId::from("ST104a")]);
    }

    #[test]
    fn entity_display_names_the_side() {
        assert_eq!(Entity::from(StudentId::new("nr1")).to_string(), "student 'nr1'");
        assert_eq!(Entity::from(CourseId::new("ST104a")).to_string(), "course 'ST104a'");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&StudentId::new("nr2")).unwrap();
        assert_eq!(json, "\"nr2\"");
    }
}
