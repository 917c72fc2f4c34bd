//! Normalization Utilities
//!
//! Guarded ratios, means and output rounding shared by every metric. Every
//! division in the scoring path goes through `safe_ratio`, so a zero
//! denominator yields 0 instead of NaN or infinity.

/// `numerator / denominator`, or 0 when the denominator is not positive
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Arithmetic mean over a fixed number of slots; 0 for zero slots
///
/// The slot count is passed separately because category means divide by the
/// number of configured categories, including categories that contributed 0.
pub fn mean_over(values: impl IntoIterator<Item = f64>, slots: usize) -> f64 {
    safe_ratio(values.into_iter().sum(), slots as f64)
}

/// Convert a raw overlap count to a 0-1 ratio of the largest possible overlap
pub fn normalize_raw_weight(raw_overlap: usize, max_possible_overlap: usize) -> f64 {
    safe_ratio(raw_overlap as f64, max_possible_overlap as f64)
}

/// Round to `decimals` places; exact binary ties go to the even digit
///
/// Float formatting works on the exact binary value, so 5/80 (0.0625) gives
/// 0.062 rather than the 0.063 a scale-and-round would produce.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_safe_ratio_guards_zero() {
        assert_eq!(safe_ratio(3.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_relative_eq!(safe_ratio(1.0, 4.0), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_over_counts_empty_slots() {
        // Two non-zero categories out of ten
        let mean = mean_over([1.0, 0.5], 10);
        assert_relative_eq!(mean, 0.15, epsilon = 1e-12);
        assert_eq!(mean_over(std::iter::empty(), 0), 0.0);
    }

    #[test]
    fn test_normalize_raw_weight() {
        assert_relative_eq!(normalize_raw_weight(25, 100), 0.25, epsilon = 1e-12);
        assert_eq!(normalize_raw_weight(5, 0), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_relative_eq!(round_to(8000.0 / 11000.0, 3), 0.727, epsilon = 1e-12);
        assert_relative_eq!(round_to(2000.0 / 11000.0, 3), 0.182, epsilon = 1e-12);
        assert_relative_eq!(round_to(1000.0 / 11000.0, 3), 0.091, epsilon = 1e-12);
        assert_eq!(round_to(0.0004, 3), 0.0);
        assert_eq!(round_to(1.0, 3), 1.0);
    }

    #[test]
    fn test_round_to_breaks_exact_ties_to_even() {
        assert_eq!(round_to(5.0 / 80.0, 3), 0.062);
        assert_eq!(round_to(5.0 / 16.0, 3), 0.312);
        assert_eq!(round_to(3.0 / 16.0, 3), 0.188);
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
    }
}
