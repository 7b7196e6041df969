use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{AttendanceSource, GradeSource, StudentDirectory};
use crate::output::append_record;
use crate::parser::{AttendanceRow, GradeRow, parse_attendance, parse_grades, parse_students};
use crate::records::{AttendanceEntry, GradeEntry, Student};

pub const STUDENTS_FILE: &str = "students";
pub const GRADES_FILE: &str = "grades";
pub const ATTENDANCE_FILE: &str = "attendance";

/// Records stored as CSV files in one directory.
///
/// Each of `students`, `grades` and `attendance` is read from `<name>.csv`,
/// falling back to `<name>.csv.gz`. A missing file holds no records.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, name: &str) -> Result<Option<(PathBuf, Vec<u8>)>> {
        for file_name in [format!("{name}.csv"), format!("{name}.csv.gz")] {
            let path = self.dir.join(file_name);
            if path.exists() {
                let bytes =
                    fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
                debug!(path = %path.display(), bytes = bytes.len(), "Loaded data file");
                return Ok(Some((path, bytes)));
            }
        }
        Ok(None)
    }

    fn grade_rows(&self) -> Result<Vec<GradeRow>> {
        match self.read(GRADES_FILE)? {
            Some((path, bytes)) => {
                parse_grades(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
            }
            None => Ok(Vec::new()),
        }
    }

    fn attendance_rows(&self) -> Result<Vec<AttendanceRow>> {
        match self.read(ATTENDANCE_FILE)? {
            Some((path, bytes)) => parse_attendance(&bytes)
                .with_context(|| format!("Failed to parse {}", path.display())),
            None => Ok(Vec::new()),
        }
    }

    /// Validates `row` and appends it to `grades.csv`.
    pub fn append_grade(&self, row: &GradeRow) -> Result<()> {
        row.to_entry()?;
        self.append(GRADES_FILE, row)
    }

    /// Validates `row` and appends it to `attendance.csv`.
    pub fn append_attendance(&self, row: &AttendanceRow) -> Result<()> {
        row.to_entry()?;
        self.append(ATTENDANCE_FILE, row)
    }

    fn append(&self, name: &str, row: &impl serde::Serialize) -> Result<()> {
        // appending to a compressed file would corrupt it
        let gz = self.dir.join(format!("{name}.csv.gz"));
        let plain = self.dir.join(format!("{name}.csv"));
        anyhow::ensure!(
            plain.exists() || !gz.exists(),
            "{} is compressed; cannot append records to it",
            gz.display()
        );

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        append_record(&plain, row)
    }
}

impl StudentDirectory for CsvSource {
    fn find_student(&self, student_id: &str) -> Result<Option<Student>> {
        Ok(self
            .list_students()?
            .into_iter()
            .find(|s| s.student_id == student_id))
    }

    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn list_students(&self) -> Result<Vec<Student>> {
        match self.read(STUDENTS_FILE)? {
            Some((path, bytes)) => parse_students(&bytes)
                .with_context(|| format!("Failed to parse {}", path.display())),
            None => Ok(Vec::new()),
        }
    }
}

impl GradeSource for CsvSource {
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn grades_for(&self, student_id: &str) -> Result<Vec<GradeEntry>> {
        self.grade_rows()?
            .iter()
            .filter(|r| r.student_id == student_id)
            .map(GradeRow::to_entry)
            .collect()
    }
}

impl AttendanceSource for CsvSource {
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn attendance_for(&self, student_id: &str) -> Result<Vec<AttendanceEntry>> {
        self.attendance_rows()?
            .iter()
            .filter(|r| r.student_id == student_id)
            .map(AttendanceRow::to_entry)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AggregateError;
    use crate::records::AttendanceStatus;
    use chrono::NaiveDate;
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = temp_dir("academic_aggregator_test_empty_dir");
        let source = CsvSource::new(&dir);

        assert!(source.list_students().unwrap().is_empty());
        assert!(source.grades_for("STU1").unwrap().is_empty());
        assert!(source.attendance_for("STU1").unwrap().is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_append_then_read_back() {
        let dir = temp_dir("academic_aggregator_test_append_dir");
        let source = CsvSource::new(&dir);

        for subject in ["Physics", "Chemistry"] {
            source
                .append_grade(&GradeRow {
                    student_id: "STU1".to_string(),
                    subject: subject.to_string(),
                    marks_obtained: 70.0,
                    total_marks: 100.0,
                    letter_grade: "B".to_string(),
                    semester: 1,
                })
                .unwrap();
        }
        source
            .append_attendance(&AttendanceRow {
                student_id: "STU2".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
                subject: "Physics".to_string(),
                status: AttendanceStatus::Late,
            })
            .unwrap();

        let grades = source.grades_for("STU1").unwrap();
        assert_eq!(grades.len(), 2);
        assert_eq!(grades[1].subject(), "Chemistry");
        assert!(source.grades_for("STU2").unwrap().is_empty());
        assert_eq!(source.attendance_for("STU2").unwrap()[0].status(), AttendanceStatus::Late);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_append_rejects_invalid_grade() {
        let dir = temp_dir("academic_aggregator_test_invalid_dir");
        let source = CsvSource::new(&dir);

        let result = source.append_grade(&GradeRow {
            student_id: "STU1".to_string(),
            subject: "Physics".to_string(),
            marks_obtained: 110.0,
            total_marks: 100.0,
            letter_grade: "A".to_string(),
            semester: 1,
        });

        assert!(result.is_err());
        assert!(!dir.join("grades.csv").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    fn physics_row(student_id: &str) -> GradeRow {
        GradeRow {
            student_id: student_id.to_string(),
            subject: "Physics".to_string(),
            marks_obtained: 70.0,
            total_marks: 100.0,
            letter_grade: "B".to_string(),
            semester: 1,
        }
    }

    #[test]
    fn test_append_to_empty_file_writes_header() {
        let dir = temp_dir("academic_aggregator_test_empty_file_dir");
        fs::write(dir.join("grades.csv"), "").unwrap();
        let source = CsvSource::new(&dir);

        source.append_grade(&physics_row("STU1")).unwrap();
        source.append_grade(&physics_row("STU1")).unwrap();

        let content = fs::read_to_string(dir.join("grades.csv")).unwrap();
        assert!(content.starts_with("student_id,"));
        assert_eq!(source.grades_for("STU1").unwrap().len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_append_after_unterminated_last_line() {
        let dir = temp_dir("academic_aggregator_test_no_newline_dir");
        fs::write(
            dir.join("grades.csv"),
            "student_id,subject,marks_obtained,total_marks,letter_grade,semester\n\
             STU1,Chemistry,80,100,A-,1",
        )
        .unwrap();
        let source = CsvSource::new(&dir);

        source.append_grade(&physics_row("STU1")).unwrap();

        let grades = source.grades_for("STU1").unwrap();
        assert_eq!(grades.len(), 2);
        assert_eq!(grades[0].subject(), "Chemistry");
        assert_eq!(grades[1].subject(), "Physics");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_require_student_from_roster() {
        let dir = temp_dir("academic_aggregator_test_roster_dir");
        fs::write(
            dir.join("students.csv"),
            "student_id,name,email,course,semester\nSTU1,Ada Byron,ada@demo.com,Mathematics,2\n",
        )
        .unwrap();
        let source = CsvSource::new(&dir);

        assert_eq!(source.require_student("STU1").unwrap().name, "Ada Byron");
        let err = source.require_student("STU2").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AggregateError>(),
            Some(AggregateError::UnknownStudent { .. })
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
