use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::analyzers::aggregate::{aggregate, semester_summaries, subject_result};
use crate::analyzers::types::{AttendanceStanding, ProgressReport};
use crate::config::Settings;
use crate::sources::{AttendanceSource, GradeSource, StudentDirectory};
use crate::stats::AttendanceStats;

/// Loads one student's records from the given sources and builds their progress report.
///
/// Fails with [`UnknownStudent`](crate::error::AggregateError::UnknownStudent) if the
/// directory has no such student, and with
/// [`UnknownGrade`](crate::error::AggregateError::UnknownGrade) under the strict policy.
#[tracing::instrument(
    skip(directory, grades, attendance, settings),
    fields(policy = ?settings.grade_policy)
)]
pub fn build_progress_report<D, G, A>(
    student_id: &str,
    directory: &D,
    grades: &G,
    attendance: &A,
    settings: &Settings,
) -> Result<ProgressReport>
where
    D: StudentDirectory + ?Sized,
    G: GradeSource + ?Sized,
    A: AttendanceSource + ?Sized,
{
    let student = directory.require_student(student_id)?;

    let grade_entries = grades.grades_for(student_id)?;
    let mut attendance_entries = attendance.attendance_for(student_id)?;
    // newest first, as the attendance panel lists them
    attendance_entries.sort_by(|a, b| b.date().cmp(&a.date()));

    let summary = aggregate(&grade_entries, &attendance_entries, settings.grade_policy)?;
    let subjects = grade_entries
        .iter()
        .map(subject_result)
        .collect::<Result<Vec<_>, _>>()?;
    let semesters = semester_summaries(&grade_entries, settings.grade_policy)?;

    let stats = AttendanceStats::from_records(&attendance_entries);
    let has_records = !stats.is_empty();
    let threshold = settings.low_attendance_threshold;
    let percent = summary.overall_attendance_percent;
    let attendance_standing = AttendanceStanding::from_percent(percent, has_records, threshold);
    let low_attendance_warning = has_records && percent < threshold;

    info!(
        student_id,
        cgpa = summary.cgpa,
        attendance = summary.overall_attendance_percent,
        low_attendance_warning,
        "Progress report built"
    );

    Ok(ProgressReport {
        generated_at: Utc::now(),
        student,
        summary,
        subjects,
        semesters,
        attendance_standing,
        low_attendance_warning,
        subject_attendance: stats.subject_percents(),
        attendance: attendance_entries,
    })
}
