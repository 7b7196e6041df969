use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::utility::round_half_up;
use crate::records::{AttendanceEntry, AttendanceStatus};

/// Present/late/absent tallies over a set of attendance records.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceTally {
    pub total: usize,
    pub present: usize,
    pub late: usize,
    pub absent: usize,
}

impl AttendanceTally {
    fn record(&mut self, status: AttendanceStatus) {
        self.total += 1;
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
    }

    /// Weighted attendance in whole percent; late counts half. 0 when nothing was recorded.
    pub fn percent(&self) -> u8 {
        let half_credits = self.present as u64 * AttendanceStatus::Present.half_credits()
            + self.late as u64 * AttendanceStatus::Late.half_credits();
        let max_half_credits = self.total as u64 * AttendanceStatus::Present.half_credits();

        // at most 100 since half_credits <= max_half_credits
        round_half_up(100 * half_credits, max_half_credits) as u8
    }
}

/// Attendance tallies overall and per subject.
#[derive(Debug, Default, Clone, Serialize)]
pub struct AttendanceStats {
    pub overall: AttendanceTally,
    pub by_subject: BTreeMap<String, AttendanceTally>,
}

impl AttendanceStats {
    pub fn from_records(records: &[AttendanceEntry]) -> Self {
        let mut s = AttendanceStats::default();

        for r in records {
            s.overall.record(r.status());
            s.by_subject
                .entry(r.subject().to_string())
                .or_default()
                .record(r.status());
        }

        s
    }

    pub fn overall_percent(&self) -> u8 {
        self.overall.percent()
    }

    /// Weighted percent per subject, ordered by subject name.
    pub fn subject_percents(&self) -> BTreeMap<String, u8> {
        self.by_subject
            .iter()
            .map(|(subject, tally)| (subject.clone(), tally.percent()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.overall.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(subject: &str, status: AttendanceStatus) -> AttendanceEntry {
        let date = NaiveDate::from_ymd_opt(2024, 10, 21).unwrap();
        AttendanceEntry::new(date, subject, status).unwrap()
    }

    #[test]
    fn test_empty_records() {
        let stats = AttendanceStats::from_records(&[]);
        assert!(stats.is_empty());
        assert_eq!(stats.overall_percent(), 0);
        assert!(stats.subject_percents().is_empty());
    }

    #[test]
    fn test_tally_counts() {
        let stats = AttendanceStats::from_records(&[
            entry("Algorithms", AttendanceStatus::Present),
            entry("Algorithms", AttendanceStatus::Late),
            entry("Databases", AttendanceStatus::Absent),
        ]);

        assert_eq!(stats.overall.total, 3);
        assert_eq!(stats.overall.present, 1);
        assert_eq!(stats.overall.late, 1);
        assert_eq!(stats.overall.absent, 1);
        assert_eq!(stats.by_subject.len(), 2);
    }

    #[test]
    fn test_subject_percents() {
        let stats = AttendanceStats::from_records(&[
            entry("Algorithms", AttendanceStatus::Present),
            entry("Algorithms", AttendanceStatus::Late),
            entry("Databases", AttendanceStatus::Absent),
            entry("Databases", AttendanceStatus::Present),
        ]);

        let percents = stats.subject_percents();
        assert_eq!(percents["Algorithms"], 75);
        assert_eq!(percents["Databases"], 50);
    }

    #[test]
    fn test_one_third_rounds_down() {
        let stats = AttendanceStats::from_records(&[
            entry("Physics", AttendanceStatus::Present),
            entry("Physics", AttendanceStatus::Absent),
            entry("Physics", AttendanceStatus::Absent),
        ]);
        assert_eq!(stats.overall_percent(), 33);
    }
}
