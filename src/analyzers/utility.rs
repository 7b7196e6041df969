/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds `numerator / denominator` to the nearest integer, halves rounding up.
///
/// Integer arithmetic only, so 62.5 always becomes 63. Returns 0 when
/// `denominator` is 0.
pub fn round_half_up(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (2 * numerator + denominator) / (2 * denominator)
}

/// Rounds to one decimal place for display.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[10.0, 7.0, 8.5]), 8.5);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(625, 10), 63);
        assert_eq!(round_half_up(624, 10), 62);
        assert_eq!(round_half_up(1, 2), 1);
        assert_eq!(round_half_up(1, 3), 0);
        assert_eq!(round_half_up(7, 0), 0);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(66.666), 66.7);
        assert_eq!(round_to_tenth(85.0), 85.0);
        assert_eq!(round_to_tenth(12.34), 12.3);
    }
}
