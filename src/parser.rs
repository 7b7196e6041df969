//! CSV decoding for student, grade and attendance files.
//!
//! Input may be plain CSV or gzip-compressed CSV; compression is detected
//! from the leading magic bytes. Every row is validated into a record, so a
//! decoded file never contains an invalid entry.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::records::{AttendanceEntry, AttendanceStatus, GradeEntry, Student};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A `grades.csv` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRow {
    pub student_id: String,
    pub subject: String,
    pub marks_obtained: f64,
    pub total_marks: f64,
    pub letter_grade: String,
    pub semester: u8,
}

impl GradeRow {
    pub fn to_entry(&self) -> Result<GradeEntry> {
        Ok(GradeEntry::new(
            &self.subject,
            self.marks_obtained,
            self.total_marks,
            &self.letter_grade,
            self.semester,
        )?)
    }
}

/// An `attendance.csv` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub student_id: String,
    pub date: NaiveDate,
    pub subject: String,
    pub status: AttendanceStatus,
}

impl AttendanceRow {
    pub fn to_entry(&self) -> Result<AttendanceEntry> {
        Ok(AttendanceEntry::new(self.date, &self.subject, self.status)?)
    }
}

/// Returns the decompressed contents if `bytes` is gzip, otherwise `bytes` itself.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes.to_vec());
    }

    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .context("Failed to decompress gzip input")?;
    Ok(out)
}

fn parse_rows<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let data = decompress(bytes)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_slice());

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row: T = result.with_context(|| format!("Malformed row at line {}", i + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Decodes and validates `grades.csv` contents.
pub fn parse_grades(bytes: &[u8]) -> Result<Vec<GradeRow>> {
    let rows: Vec<GradeRow> = parse_rows(bytes)?;
    for (i, row) in rows.iter().enumerate() {
        row.to_entry()
            .with_context(|| format!("Invalid grade at line {}", i + 2))?;
    }
    Ok(rows)
}

/// Decodes and validates `attendance.csv` contents.
pub fn parse_attendance(bytes: &[u8]) -> Result<Vec<AttendanceRow>> {
    let rows: Vec<AttendanceRow> = parse_rows(bytes)?;
    for (i, row) in rows.iter().enumerate() {
        row.to_entry()
            .with_context(|| format!("Invalid attendance at line {}", i + 2))?;
    }
    Ok(rows)
}

/// Decodes `students.csv` contents.
pub fn parse_students(bytes: &[u8]) -> Result<Vec<Student>> {
    parse_rows(bytes)
}
