use serde::Serialize;

/// Grade points awarded for each letter grade, on a 0–10 scale.
///
/// | Letter | Points |
/// |--------|--------|
/// | A+     | 10     |
/// | A      | 9      |
/// | A-     | 8.5    |
/// | B+     | 8      |
/// | B      | 7      |
/// | B-     | 6.5    |
/// | C+     | 6      |
/// | C      | 5      |
/// | C-     | 4.5    |
/// | D      | 4      |
/// | F      | 0      |
static GRADE_POINTS: &[(&str, f64)] = &[
    ("A+", 10.0),
    ("A", 9.0),
    ("A-", 8.5),
    ("B+", 8.0),
    ("B", 7.0),
    ("B-", 6.5),
    ("C+", 6.0),
    ("C", 5.0),
    ("C-", 4.5),
    ("D", 4.0),
    ("F", 0.0),
];

/// Highest value on the grade point scale.
pub const MAX_GRADE_POINTS: f64 = 10.0;

/// Returns the points for `letter`, or `None` if it is not a recognised grade.
///
/// Matching is exact and case-sensitive.
pub fn grade_points(letter: &str) -> Option<f64> {
    GRADE_POINTS
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, points)| *points)
}

/// All recognised letter grades, best first.
pub fn letter_grades() -> impl Iterator<Item = &'static str> {
    GRADE_POINTS.iter().map(|(l, _)| *l)
}

/// Coarse grouping of letter grades used when presenting a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    Excellent,
    Good,
    Average,
    NeedsAttention,
}

impl GradeBand {
    pub fn of(letter: &str) -> Self {
        match letter {
            "A+" | "A" => GradeBand::Excellent,
            "B+" | "B" => GradeBand::Good,
            "C+" | "C" => GradeBand::Average,
            _ => GradeBand::NeedsAttention,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_points_table() {
        assert_eq!(grade_points("A+"), Some(10.0));
        assert_eq!(grade_points("A"), Some(9.0));
        assert_eq!(grade_points("A-"), Some(8.5));
        assert_eq!(grade_points("B+"), Some(8.0));
        assert_eq!(grade_points("B"), Some(7.0));
        assert_eq!(grade_points("B-"), Some(6.5));
        assert_eq!(grade_points("C+"), Some(6.0));
        assert_eq!(grade_points("C"), Some(5.0));
        assert_eq!(grade_points("C-"), Some(4.5));
        assert_eq!(grade_points("D"), Some(4.0));
        assert_eq!(grade_points("F"), Some(0.0));
    }

    #[test]
    fn test_grade_points_unknown() {
        assert_eq!(grade_points("a+"), None);
        assert_eq!(grade_points("E"), None);
        assert_eq!(grade_points(""), None);
    }

    #[test]
    fn test_points_stay_on_scale() {
        for letter in letter_grades() {
            let points = grade_points(letter).unwrap();
            assert!((0.0..=MAX_GRADE_POINTS).contains(&points));
        }
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(GradeBand::of("A+"), GradeBand::Excellent);
        assert_eq!(GradeBand::of("A"), GradeBand::Excellent);
        assert_eq!(GradeBand::of("B+"), GradeBand::Good);
        assert_eq!(GradeBand::of("B"), GradeBand::Good);
        assert_eq!(GradeBand::of("C"), GradeBand::Average);
        assert_eq!(GradeBand::of("A-"), GradeBand::NeedsAttention);
        assert_eq!(GradeBand::of("F"), GradeBand::NeedsAttention);
    }
}
