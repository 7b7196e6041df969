//! Providers of student records.
//!
//! The aggregator never reaches for global data; callers inject whichever
//! provider backs the report:
//!
//! - [`InMemorySource`]: records held in memory, including the demo roster.
//! - [`CsvSource`]: a directory of `students.csv`, `grades.csv` and `attendance.csv`.

mod files;
mod memory;

pub use files::CsvSource;
pub use memory::InMemorySource;

use anyhow::Result;

use crate::error::AggregateError;
use crate::records::{AttendanceEntry, GradeEntry, Student};

/// Looks students up by their institutional id (e.g. `STU2024001`).
pub trait StudentDirectory {
    fn find_student(&self, student_id: &str) -> Result<Option<Student>>;

    fn list_students(&self) -> Result<Vec<Student>>;

    /// Like [`find_student`](Self::find_student), but a missing student is
    /// an [`AggregateError::UnknownStudent`].
    fn require_student(&self, student_id: &str) -> Result<Student> {
        self.find_student(student_id)?.ok_or_else(|| {
            AggregateError::UnknownStudent {
                student_id: student_id.to_string(),
            }
            .into()
        })
    }
}

/// Supplies the recorded grades of one student.
pub trait GradeSource {
    fn grades_for(&self, student_id: &str) -> Result<Vec<GradeEntry>>;
}

/// Supplies the attendance history of one student.
pub trait AttendanceSource {
    fn attendance_for(&self, student_id: &str) -> Result<Vec<AttendanceEntry>>;
}
