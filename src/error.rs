//! Error taxonomy for the aggregation core.
//!
//! Computation failures are local and carry no partial state, so callers only
//! ever need to propagate them. I/O-facing layers wrap these in `anyhow`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    /// `total_marks <= 0`, negative marks, marks above the total, or a non-finite value.
    #[error("invalid marks: {marks_obtained} out of {total_marks}")]
    InvalidMarks { marks_obtained: f64, total_marks: f64 },

    /// A letter grade that has no entry in the grade point map.
    #[error("unknown letter grade '{letter_grade}' for subject '{subject}'")]
    UnknownGrade {
        subject: String,
        letter_grade: String,
    },

    #[error("invalid entry: {reason}")]
    InvalidEntry { reason: String },

    #[error("no student with id '{student_id}'")]
    UnknownStudent { student_id: String },
}

impl AggregateError {
    pub(crate) fn invalid_entry(reason: impl Into<String>) -> Self {
        AggregateError::InvalidEntry {
            reason: reason.into(),
        }
    }
}
