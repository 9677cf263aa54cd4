/// Divides a running total by the number of submissions it was summed over.
///
/// Returns exactly 0.0 when `count` is zero rather than failing.
pub fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total / count as f64
}

/// Computes `part / whole`, or `None` when `whole` is zero.
pub fn ratio(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(part as f64 / whole as f64)
}

/// Renders a fraction as a percentage with two decimals, e.g. `0.625` as `"62.50%"`.
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_with_zero_count() {
        assert_eq!(average(42.0, 0), 0.0);
    }

    #[test]
    fn test_average_normal_values() {
        assert_eq!(average(10.0, 4), 2.5);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(1, 4), Some(0.25));
        assert_eq!(ratio(3, 0), None);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.625), "62.50%");
        assert_eq!(format_percentage(0.0), "0.00%");
        assert_eq!(format_percentage(1.0), "100.00%");
    }
}
