//! Academic records consumed by the aggregator.
//!
//! Entries are validated once at construction and never mutated afterwards;
//! the fields are crate-private and exposed through accessors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AggregateError;

/// Lowest and highest semester a grade can be recorded against.
pub const SEMESTERS: std::ops::RangeInclusive<u8> = 1..=8;

/// Checks that `marks_obtained` out of `total_marks` is a meaningful score.
pub(crate) fn check_marks(marks_obtained: f64, total_marks: f64) -> Result<(), AggregateError> {
    let valid = marks_obtained.is_finite()
        && total_marks.is_finite()
        && total_marks > 0.0
        && marks_obtained >= 0.0
        && marks_obtained <= total_marks;

    if valid {
        Ok(())
    } else {
        Err(AggregateError::InvalidMarks {
            marks_obtained,
            total_marks,
        })
    }
}

/// One graded subject for one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeEntry {
    pub(crate) subject: String,
    pub(crate) marks_obtained: f64,
    pub(crate) total_marks: f64,
    pub(crate) letter_grade: String,
    pub(crate) semester: u8,
}

impl GradeEntry {
    /// Builds a validated entry.
    ///
    /// The letter grade is only trimmed here; whether it is known is decided
    /// at aggregation time by the active [`GradePolicy`](crate::analyzers::aggregate::GradePolicy).
    pub fn new(
        subject: &str,
        marks_obtained: f64,
        total_marks: f64,
        letter_grade: &str,
        semester: u8,
    ) -> Result<Self, AggregateError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(AggregateError::invalid_entry("subject must not be empty"));
        }
        check_marks(marks_obtained, total_marks)?;
        if !SEMESTERS.contains(&semester) {
            return Err(AggregateError::invalid_entry(format!(
                "semester {} for '{}' is outside {}..={}",
                semester,
                subject,
                SEMESTERS.start(),
                SEMESTERS.end()
            )));
        }

        Ok(Self {
            subject: subject.to_string(),
            marks_obtained,
            total_marks,
            letter_grade: letter_grade.trim().to_string(),
            semester,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn marks_obtained(&self) -> f64 {
        self.marks_obtained
    }

    pub fn total_marks(&self) -> f64 {
        self.total_marks
    }

    pub fn letter_grade(&self) -> &str {
        &self.letter_grade
    }

    pub fn semester(&self) -> u8 {
        self.semester
    }
}

/// Whether a student attended a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    /// Attendance credit in half-classes: present 2, late 1, absent 0.
    ///
    /// Kept integral so percentages can be rounded exactly.
    pub fn half_credits(self) -> u64 {
        match self {
            AttendanceStatus::Present => 2,
            AttendanceStatus::Late => 1,
            AttendanceStatus::Absent => 0,
        }
    }

    pub fn weight(self) -> f64 {
        self.half_credits() as f64 / 2.0
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            other => Err(AggregateError::invalid_entry(format!(
                "unknown attendance status '{other}'"
            ))),
        }
    }
}

/// One class session for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEntry {
    pub(crate) date: NaiveDate,
    pub(crate) subject: String,
    pub(crate) status: AttendanceStatus,
}

impl AttendanceEntry {
    pub fn new(
        date: NaiveDate,
        subject: &str,
        status: AttendanceStatus,
    ) -> Result<Self, AggregateError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(AggregateError::invalid_entry(format!(
                "attendance on {date} has an empty subject"
            )));
        }

        Ok(Self {
            date,
            subject: subject.to_string(),
            status,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn status(&self) -> AttendanceStatus {
        self.status
    }
}

/// Student profile as listed in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub course: String,
    pub semester: u8,
}
