use crate::routes::types::Number;

/// Smallest `f64` above the `i64` range (2^63).
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Collapses an integral value into [`Number::Integer`]. Values with a
/// fractional part, non-finite values and values outside the `i64` range are
/// kept as [`Number::Decimal`].
pub fn normalize(value: f64) -> Number {
    if value.is_finite() && value.trunc() == value && (-I64_BOUND..I64_BOUND).contains(&value) {
        Number::Integer(value as i64)
    } else {
        Number::Decimal(value)
    }
}

/// Rounds to `places` decimal places using the exact binary value, with
/// exact halves going to the even digit (`0.125` → `0.12`, `0.625` → `0.62`).
pub fn round_to(value: f64, places: usize) -> f64 {
    // Formatting rounds the exact binary value, ties to even.
    format!("{value:.places$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_integral() {
        assert_eq!(normalize(15.0), Number::Integer(15));
        assert_eq!(normalize(-7.0), Number::Integer(-7));
        assert_eq!(normalize(1577865600.0), Number::Integer(1577865600));
    }

    #[test]
    fn test_normalize_negative_zero() {
        assert_eq!(normalize(-0.0), Number::Integer(0));
    }

    #[test]
    fn test_normalize_fractional_kept() {
        assert_eq!(normalize(2.5), Number::Decimal(2.5));
        assert_eq!(normalize(-0.25), Number::Decimal(-0.25));
    }

    #[test]
    fn test_normalize_out_of_range() {
        assert_eq!(normalize(1e300), Number::Decimal(1e300));
        assert!(matches!(normalize(f64::NAN), Number::Decimal(_)));
    }

    #[test]
    fn test_round_to_two_places() {
        assert_eq!(round_to(15.0 / 300.0, 2), 0.05);
        assert_eq!(round_to(0.0 / 95.0, 2), 0.0);
        assert_eq!(round_to(128.0 / 95.0, 2), 1.35);
        assert_eq!(round_to(-7.0 / 240.0, 2), -0.03);
        assert_eq!(round_to(1.0 / 3.0, 2), 0.33);
    }

    #[test]
    fn test_round_to_exact_halves_go_to_even() {
        assert_eq!(round_to(15.0 / 120.0, 2), 0.12);
        assert_eq!(round_to(5.0 / 8.0, 2), 0.62);
        assert_eq!(round_to(-1.0 / 8.0, 2), -0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
    }

    #[test]
    fn test_round_to_inexact_halves_follow_binary_value() {
        // 2.675 and 1.005 are stored slightly below the half
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(1.005, 2), 1.0);
        assert_eq!(round_to(0.025, 2), 0.03);
    }
}
