use anyhow::Result;
use chrono::NaiveDate;
use std::collections::HashMap;

use super::{AttendanceSource, GradeSource, StudentDirectory};
use crate::error::AggregateError;
use crate::records::{AttendanceEntry, AttendanceStatus, GradeEntry, Student};

/// Records held in memory, keyed by student id.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    students: Vec<Student>,
    grades: HashMap<String, Vec<GradeEntry>>,
    attendance: HashMap<String, Vec<AttendanceEntry>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a student, replacing any existing student with the same id.
    pub fn add_student(&mut self, student: Student) {
        self.students.retain(|s| s.student_id != student.student_id);
        self.students.push(student);
    }

    /// Appends a grade for a student already in the roster.
    pub fn record_grade(
        &mut self,
        student_id: &str,
        entry: GradeEntry,
    ) -> Result<(), AggregateError> {
        self.ensure_known(student_id)?;
        self.grades.entry(student_id.to_string()).or_default().push(entry);
        Ok(())
    }

    /// Appends an attendance entry for a student already in the roster.
    pub fn record_attendance(
        &mut self,
        student_id: &str,
        entry: AttendanceEntry,
    ) -> Result<(), AggregateError> {
        self.ensure_known(student_id)?;
        self.attendance
            .entry(student_id.to_string())
            .or_default()
            .push(entry);
        Ok(())
    }

    fn ensure_known(&self, student_id: &str) -> Result<(), AggregateError> {
        if self.students.iter().any(|s| s.student_id == student_id) {
            Ok(())
        } else {
            Err(AggregateError::UnknownStudent {
                student_id: student_id.to_string(),
            })
        }
    }

    /// The demo roster: three students, with a term of grades and attendance
    /// recorded for `STU2024001`.
    pub fn demo() -> Result<Self, AggregateError> {
        let mut source = Self::new();

        for (student_id, name, email, course, semester) in [
            ("STU2024001", "John Doe", "student@demo.com", "Computer Science", 3),
            ("STU2024002", "Jane Smith", "jane@demo.com", "Information Technology", 2),
            ("STU2024003", "Bob Johnson", "bob@demo.com", "Computer Science", 4),
        ] {
            source.add_student(Student {
                student_id: student_id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                course: course.to_string(),
                semester,
            });
        }

        for (subject, marks, letter, semester) in [
            ("Data Structures", 85.0, "A", 3),
            ("Algorithms", 78.0, "B+", 3),
            ("Database Systems", 92.0, "A+", 3),
            ("Web Development", 88.0, "A", 3),
            ("Operating Systems", 75.0, "B", 2),
            ("Computer Networks", 82.0, "A-", 2),
        ] {
            let entry = GradeEntry::new(subject, marks, 100.0, letter, semester)?;
            source.record_grade("STU2024001", entry)?;
        }

        use AttendanceStatus::*;
        for (day, subject, status) in [
            (23, "Data Structures", Present),
            (23, "Algorithms", Present),
            (22, "Database Systems", Present),
            (22, "Web Development", Late),
            (21, "Data Structures", Absent),
            (21, "Operating Systems", Present),
            (20, "Algorithms", Present),
            (20, "Database Systems", Present),
        ] {
            let date = NaiveDate::from_ymd_opt(2024, 10, day).ok_or_else(|| {
                AggregateError::invalid_entry(format!("no such date 2024-10-{day}"))
            })?;
            let entry = AttendanceEntry::new(date, subject, status)?;
            source.record_attendance("STU2024001", entry)?;
        }

        Ok(source)
    }
}

impl StudentDirectory for InMemorySource {
    fn find_student(&self, student_id: &str) -> Result<Option<Student>> {
        Ok(self
            .students
            .iter()
            .find(|s| s.student_id == student_id)
            .cloned())
    }

    fn list_students(&self) -> Result<Vec<Student>> {
        Ok(self.students.clone())
    }
}

impl GradeSource for InMemorySource {
    fn grades_for(&self, student_id: &str) -> Result<Vec<GradeEntry>> {
        Ok(self.grades.get(student_id).cloned().unwrap_or_default())
    }
}

impl AttendanceSource for InMemorySource {
    fn attendance_for(&self, student_id: &str) -> Result<Vec<AttendanceEntry>> {
        Ok(self.attendance.get(student_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_roster() {
        let source = InMemorySource::demo().unwrap();
        assert_eq!(source.list_students().unwrap().len(), 3);
        assert_eq!(source.grades_for("STU2024001").unwrap().len(), 6);
        assert_eq!(source.attendance_for("STU2024001").unwrap().len(), 8);
        assert!(source.grades_for("STU2024002").unwrap().is_empty());
    }

    #[test]
    fn test_find_student() {
        let source = InMemorySource::demo().unwrap();
        let student = source.find_student("STU2024002").unwrap().unwrap();
        assert_eq!(student.name, "Jane Smith");
        assert!(source.find_student("STU9999999").unwrap().is_none());
    }

    #[test]
    fn test_record_grade_requires_known_student() {
        let mut source = InMemorySource::new();
        let entry = GradeEntry::new("Physics", 50.0, 100.0, "C", 1).unwrap();
        assert!(matches!(
            source.record_grade("STU1", entry),
            Err(AggregateError::UnknownStudent { .. })
        ));
    }

    #[test]
    fn test_require_student() {
        let source = InMemorySource::demo().unwrap();
        assert_eq!(source.require_student("STU2024001").unwrap().name, "John Doe");

        let err = source.require_student("STU9999999").unwrap_err();
        assert_eq!(
            err.downcast_ref::<AggregateError>(),
            Some(&AggregateError::UnknownStudent {
                student_id: "STU9999999".to_string()
            })
        );
    }

    #[test]
    fn test_add_student_replaces_same_id() {
        let mut source = InMemorySource::demo().unwrap();
        let mut student = source.find_student("STU2024003").unwrap().unwrap();
        student.semester = 5;
        source.add_student(student);

        assert_eq!(source.list_students().unwrap().len(), 3);
        assert_eq!(source.find_student("STU2024003").unwrap().unwrap().semester, 5);
    }
}
