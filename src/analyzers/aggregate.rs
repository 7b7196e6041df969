use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::analyzers::grade::{GradeBand, grade_points};
use crate::analyzers::types::{AggregateReport, SemesterSummary, SubjectResult};
use crate::analyzers::utility::{mean, round_to_tenth};
use crate::error::AggregateError;
use crate::records::{AttendanceEntry, GradeEntry, check_marks};
use crate::stats::AttendanceStats;

/// What to do with a letter grade missing from the grade point map.
///
/// Parsed case-insensitively, whether from a string or from config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum GradePolicy {
    /// Fail with [`AggregateError::UnknownGrade`].
    #[default]
    Strict,
    /// Score the entry as 0 points and log a warning.
    Lenient,
}

impl FromStr for GradePolicy {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(GradePolicy::Strict),
            "lenient" => Ok(GradePolicy::Lenient),
            other => Err(AggregateError::invalid_entry(format!(
                "unknown grade policy '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for GradePolicy {
    type Error = AggregateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

fn points_for(entry: &GradeEntry, policy: GradePolicy) -> Result<f64, AggregateError> {
    match (grade_points(entry.letter_grade()), policy) {
        (Some(points), _) => Ok(points),
        (None, GradePolicy::Lenient) => {
            warn!(
                subject = entry.subject(),
                letter_grade = entry.letter_grade(),
                "Unknown letter grade scored as 0"
            );
            Ok(0.0)
        }
        (None, GradePolicy::Strict) => Err(AggregateError::UnknownGrade {
            subject: entry.subject().to_string(),
            letter_grade: entry.letter_grade().to_string(),
        }),
    }
}

/// Unweighted mean of grade points using the strict policy.
///
/// Every subject counts once regardless of its total marks. An empty list
/// yields 0.
pub fn compute_cgpa(grades: &[GradeEntry]) -> Result<f64, AggregateError> {
    compute_cgpa_with(grades, GradePolicy::Strict)
}

pub fn compute_cgpa_with(
    grades: &[GradeEntry],
    policy: GradePolicy,
) -> Result<f64, AggregateError> {
    let points = grades
        .iter()
        .map(|g| points_for(g, policy))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(mean(&points))
}

/// Weighted attendance in whole percent (present 1, late 0.5, absent 0), rounded half up.
///
/// An empty list yields 0.
pub fn compute_overall_attendance(records: &[AttendanceEntry]) -> u8 {
    AttendanceStats::from_records(records).overall_percent()
}

/// `100 * marks_obtained / total_marks`, unrounded.
///
/// Round with [`round_to_tenth`] only when displaying the value.
pub fn compute_subject_percentage(
    marks_obtained: f64,
    total_marks: f64,
) -> Result<f64, AggregateError> {
    check_marks(marks_obtained, total_marks)?;
    Ok(100.0 * marks_obtained / total_marks)
}

/// CGPA and overall attendance together.
pub fn aggregate(
    grades: &[GradeEntry],
    attendance: &[AttendanceEntry],
    policy: GradePolicy,
) -> Result<AggregateReport, AggregateError> {
    let report = AggregateReport {
        cgpa: compute_cgpa_with(grades, policy)?,
        overall_attendance_percent: compute_overall_attendance(attendance),
    };

    debug!(
        grades = grades.len(),
        attendance = attendance.len(),
        cgpa = report.cgpa,
        overall_attendance_percent = report.overall_attendance_percent,
        "Aggregated academic record"
    );

    Ok(report)
}

pub fn subject_result(entry: &GradeEntry) -> Result<SubjectResult, AggregateError> {
    let percentage = compute_subject_percentage(entry.marks_obtained(), entry.total_marks())?;

    Ok(SubjectResult {
        subject: entry.subject().to_string(),
        semester: entry.semester(),
        marks_obtained: entry.marks_obtained(),
        total_marks: entry.total_marks(),
        percentage,
        display_percentage: round_to_tenth(percentage),
        letter_grade: entry.letter_grade().to_string(),
        band: GradeBand::of(entry.letter_grade()),
    })
}

/// Grade point average per semester, in semester order.
pub fn semester_summaries(
    grades: &[GradeEntry],
    policy: GradePolicy,
) -> Result<Vec<SemesterSummary>, AggregateError> {
    let mut by_semester: BTreeMap<u8, Vec<f64>> = BTreeMap::new();

    for g in grades {
        by_semester
            .entry(g.semester())
            .or_default()
            .push(points_for(g, policy)?);
    }

    Ok(by_semester
        .into_iter()
        .map(|(semester, points)| SemesterSummary {
            semester,
            subjects: points.len(),
            gpa: mean(&points),
        })
        .collect())
}
