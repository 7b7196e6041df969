//! Output formatting and persistence for progress reports.
//!
//! Supports a plain-text summary, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::ProgressReport;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Serializes a value as pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Renders a report as the plain-text table shown by the CLI.
pub fn render_summary(report: &ProgressReport) -> String {
    let mut out = String::new();
    let s = &report.student;

    // writing into a String cannot fail
    let _ = writeln!(out, "{} ({})", s.name, s.student_id);
    let _ = writeln!(out, "{}, semester {}", s.course, s.semester);
    let _ = writeln!(out);
    let _ = writeln!(out, "CGPA:       {:.2}", report.summary.cgpa);
    let _ = writeln!(
        out,
        "Attendance: {}% ({:?})",
        report.summary.overall_attendance_percent, report.attendance_standing
    );
    if report.low_attendance_warning {
        let _ = writeln!(out, "Warning: attendance is below the required threshold.");
    }

    if !report.subjects.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<24} {:>3} {:>11} {:>7} {:>5}",
            "Subject", "Sem", "Marks", "Pct", "Grade"
        );
        for r in &report.subjects {
            let _ = writeln!(
                out,
                "{:<24} {:>3} {:>11} {:>6.1}% {:>5}",
                r.subject,
                r.semester,
                format!("{}/{}", r.marks_obtained, r.total_marks),
                r.display_percentage,
                r.letter_grade
            );
        }
    }

    if !report.semesters.is_empty() {
        let _ = writeln!(out);
        for sem in &report.semesters {
            let _ = writeln!(
                out,
                "Semester {}: GPA {:.2} over {} subject(s)",
                sem.semester, sem.gpa, sem.subjects
            );
        }
    }

    out
}

/// Appends a serializable record as a row to a CSV file.
///
/// Writes headers when the file is missing or empty, and terminates a
/// dangling last line before appending.
pub fn append_record(path: impl AsRef<Path>, record: &impl Serialize) -> Result<()> {
    let path = path.as_ref();

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    let len = file.metadata()?.len();
    debug!(path = %path.display(), len, "Appending CSV record");

    if len > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            file.write_all(b"\n")?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(len == 0) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::analyzer::build_progress_report;
    use crate::config::Settings;
    use crate::analyzers::types::ReportRow;
    use crate::sources::InMemorySource;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn demo_report() -> ProgressReport {
        let source = InMemorySource::demo().unwrap();
        let settings = Settings::default();
        build_progress_report("STU2024001", &source, &source, &source, &settings).unwrap()
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&demo_report());
    }

    #[test]
    fn test_to_json_contains_summary() {
        let json = to_json(&demo_report()).unwrap();
        assert!(json.contains("\"cgpa\""));
        assert!(json.contains("\"overall_attendance_percent\": 81"));
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary(&demo_report());
        assert!(text.contains("John Doe (STU2024001)"));
        assert!(text.contains("Attendance: 81%"));
        assert!(text.contains("Database Systems"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("academic_aggregator_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &ReportRow::from(&demo_report())).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("STU2024001"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("academic_aggregator_test_header.csv");
        let _ = fs::remove_file(&path);

        let row = ReportRow::from(&demo_report());
        append_record(&path, &row).unwrap();
        append_record(&path, &row).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("student_id")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
