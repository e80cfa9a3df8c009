use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use ndarray::ShapeError;
use rand_distr::{NormalError, uniform::Error as UniformError};

use crate::ids::{CourseId, Entity, StudentId};

/// The result type used in the entire recommender crate.
pub type Result<T> = std::result::Result<T, RecErr>;

/// The recommender's error type.
#[derive(Debug)]
pub enum RecErr {
    /// Invalid hyperparameters or model configuration.
    Config(String),
    /// A prediction or registration referenced an entity the model or catalog doesn't know.
    UnknownEntity(Entity),
    /// The training loss stopped being finite or crossed the sanity bound.
    Divergence { epoch: usize, loss: f64 },
    /// There are no observed ratings to learn from.
    EmptyDataset,
    InvalidRating {
        value: f32,
        min: f32,
        max: f32,
    },
    DuplicateRating {
        student: StudentId,
        course: CourseId,
    },
    DuplicateEntity(Entity),
    NotEnrolled {
        student: StudentId,
        course: CourseId,
    },
    /// A deserialized model doesn't hold together.
    InvalidModel(String),
    Parse {
        line: usize,
        msg: String,
    },
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for RecErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecErr::Config(msg) => write!(f, "invalid config: {msg}"),
            RecErr::UnknownEntity(entity) => write!(f, "unknown {entity}"),
            RecErr::Divergence { epoch, loss } => write!(
                f,
                "training diverged at epoch {epoch} with loss {loss}, try a smaller learning rate"
            ),
            RecErr::EmptyDataset => f.write_str("there are no observed ratings to train on"),
            RecErr::InvalidRating { value, min, max } => {
                write!(f, "rating {value} is outside of the [{min}, {max}] range")
            }
            RecErr::DuplicateRating { student, course } => write!(
                f,
                "student '{student}' already rated course '{course}', ratings are immutable"
            ),
            RecErr::DuplicateEntity(entity) => write!(f, "{entity} is already registered"),
            RecErr::NotEnrolled { student, course } => {
                write!(f, "student '{student}' is not enrolled in course '{course}'")
            }
            RecErr::InvalidModel(msg) => write!(f, "invalid model: {msg}"),
            RecErr::Parse { line, msg } => write!(f, "parse error at line {line}: {msg}"),
            RecErr::Io(e) => write!(f, "io error: {e}"),
            RecErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for RecErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RecErr::Io(e) => Some(e),
            RecErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RecErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RecErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ShapeError> for RecErr {
    fn from(value: ShapeError) -> Self {
        Self::InvalidModel(value.to_string())
    }
}

impl From<NormalError> for RecErr {
    fn from(value: NormalError) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<UniformError> for RecErr {
    fn from(value: UniformError) -> Self {
        Self::Config(value.to_string())
    }
}
