use std::{fs::File, io::BufRead, io::BufReader, path::Path};

use super::{RatingScale, RatingStore};
use crate::{RecErr, Result};

/// Reads `student,course,rating` lines into a new `RatingStore`.
///
/// Blank lines and lines starting with `#` are skipped. Fields are trimmed.
///
/// # Arguments
/// * `reader` - The source of the lines.
/// * `scale` - The range every rating has to fall in.
///
/// # Errors
/// `RecErr::Parse` with the 1-based line number for malformed lines, and the store's
/// own errors (invalid or repeated ratings) wrapped the same way.
pub fn read_ratings<R: BufRead>(reader: R, scale: RatingScale) -> Result<RatingStore> {
    let mut store = RatingStore::new(scale);

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let n = i + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<_> = trimmed.split(',').map(str::trim).collect();
        let [student, course, rating] = fields[..] else {
            return Err(RecErr::Parse {
                line: n,
                msg: format!("expected 3 comma separated fields, got {}", fields.len()),
            });
        };

        if student.is_empty() || course.is_empty() {
            return Err(RecErr::Parse {
                line: n,
                msg: "student and course ids must not be empty".into(),
            });
        }

        let rating: f32 = rating.parse().map_err(|e| RecErr::Parse {
            line: n,
            msg: format!("invalid rating '{rating}': {e}"),
        })?;

        store
            .insert(student, course, rating)
            .map_err(|e| RecErr::Parse {
                line: n,
                msg: e.to_string(),
            })?;
    }

    Ok(store)
}

/// Opens `path` and reads it with [`read_ratings`].
pub fn load_ratings(path: impl AsRef<Path>, scale: RatingScale) -> Result<RatingStore> {
    let file = File::open(path)?;
    read_ratings(BufReader::new(file), scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ratings_skipping_comments() {
        let input = "# student,course,rating\n\nnr1, ST104a, 9\nnr2,MT1173,8.5\n";
        let store = read_ratings(input.as_bytes(), RatingScale::default()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&"nr2".into(), &"MT1173".into()), Some(8.5));
    }

    #[test]
    fn reports_the_offending_line() {
        let input = "nr1,ST104a,9\nnr2,MT1173\n";
        let err = read_ratings(input.as_bytes(), RatingScale::default()).unwrap_err();

        assert!(matches!(err, RecErr::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_non_numeric_ratings() {
        let err = read_ratings("nr1,ST104a,great".as_bytes(), RatingScale::default()).unwrap_err();
        assert!(matches!(err, RecErr::Parse { line: 1, .. }));
    }

    #[test]
    fn store_errors_keep_the_line_number() {
        let input = "nr1,ST104a,9\nnr1,ST104a,3\n";
        let err = read_ratings(input.as_bytes(), RatingScale::default()).unwrap_err();

        let RecErr::Parse { line, msg } = err else {
            panic!("expected a parse error");
        };
        assert_eq!(line, 2);
        assert!(msg.contains("already rated"));
    }
}
