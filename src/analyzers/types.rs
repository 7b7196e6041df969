//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::grade::GradeBand;
use crate::records::{AttendanceEntry, Student};

/// CGPA and overall attendance for one student, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateReport {
    pub cgpa: f64,
    pub overall_attendance_percent: u8,
}

/// Result line for a single graded subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectResult {
    pub subject: String,
    pub semester: u8,
    pub marks_obtained: f64,
    pub total_marks: f64,
    /// Unrounded; use `display_percentage` for presentation.
    pub percentage: f64,
    pub display_percentage: f64,
    pub letter_grade: String,
    pub band: GradeBand,
}

/// Grade point average over the subjects of one semester.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterSummary {
    pub semester: u8,
    pub subjects: usize,
    pub gpa: f64,
}

/// How a student's overall attendance compares to the portal's thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStanding {
    Good,
    Warning,
    Critical,
    NoRecords,
}

/// Attendance below this percentage is critical, whatever the configured threshold.
pub const CRITICAL_BELOW: u8 = 60;

impl AttendanceStanding {
    /// | Percent                   | Standing |
    /// |---------------------------|----------|
    /// | >= `good_threshold`       | Good     |
    /// | >= [`CRITICAL_BELOW`]     | Warning  |
    /// | otherwise                 | Critical |
    ///
    /// `good_threshold` is the configured low-attendance threshold (75 by
    /// default). A threshold at or below 60 leaves no Warning band.
    pub fn from_percent(percent: u8, has_records: bool, good_threshold: u8) -> Self {
        match percent {
            _ if !has_records => AttendanceStanding::NoRecords,
            p if p >= good_threshold => AttendanceStanding::Good,
            p if p >= CRITICAL_BELOW => AttendanceStanding::Warning,
            _ => AttendanceStanding::Critical,
        }
    }
}

/// Everything the progress report panel shows for one student.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub generated_at: DateTime<Utc>,
    pub student: Student,
    pub summary: AggregateReport,
    pub subjects: Vec<SubjectResult>,
    pub semesters: Vec<SemesterSummary>,
    pub attendance_standing: AttendanceStanding,
    pub low_attendance_warning: bool,
    pub subject_attendance: BTreeMap<String, u8>,
    pub attendance: Vec<AttendanceEntry>,
}

/// Flat row appended to a CSV export, one per generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub generated_at: DateTime<Utc>,
    pub student_id: String,
    pub name: String,
    pub cgpa: f64,
    pub overall_attendance_percent: u8,
    pub attendance_standing: AttendanceStanding,
    pub subjects: usize,
}

impl From<&ProgressReport> for ReportRow {
    fn from(report: &ProgressReport) -> Self {
        ReportRow {
            generated_at: report.generated_at,
            student_id: report.student.student_id.clone(),
            name: report.student.name.clone(),
            cgpa: report.summary.cgpa,
            overall_attendance_percent: report.summary.overall_attendance_percent,
            attendance_standing: report.attendance_standing,
            subjects: report.subjects.len(),
        }
    }
}
