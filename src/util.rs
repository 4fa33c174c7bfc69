//! Small numeric helpers shared by value serialization and unit conversion.

/// Decimal places kept when serializing numbers.
const SERIALIZED_PRECISION: f64 = 10_000.0;

/// Widen a tokenizer `f32` to the `f64` a reader would expect.
///
/// `1.3_f32 as f64` is `1.2999999523…`; going through the shortest decimal
/// representation gives `1.3` back.
pub(crate) fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(value as f64)
}

/// Largest magnitude a serialized number takes; overflowing values clamp to
/// it the way browsers clamp to the float range.
const MAX_SERIALIZED: f64 = f32::MAX as f64;

/// Serialize a number the way computed styles print them: at most four
/// decimals, no trailing zeros, no negative zero.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "0".to_string();
    }
    let value = value.clamp(-MAX_SERIALIZED, MAX_SERIALIZED);
    let rounded = (value * SERIALIZED_PRECISION).round() / SERIALIZED_PRECISION;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Tolerant equality for magnitudes that went through unit conversion.
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= 1e-6 * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen_keeps_decimal_value() {
        assert_eq!(widen(1.3), 1.3);
        assert_eq!(widen(-0.3), -0.3);
        assert_eq!(widen(100.0), 100.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(130.0), "130");
        assert_eq!(format_number(100.0 * 1.3), "130");
        assert_eq!(format_number(-4.8), "-4.8");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn test_format_number_clamps_overflow() {
        let max = format_number(f64::INFINITY);
        assert_ne!(max, "0");
        let parsed: f64 = max.parse().unwrap();
        assert!((parsed / f64::from(f32::MAX) - 1.0).abs() < 1e-9);
        assert_eq!(format_number(f64::NEG_INFINITY), format!("-{max}"));
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(-4.8 / 16.0, -0.3));
        assert!(approx_eq(2.5, 2500.0 / 1000.0));
        assert!(!approx_eq(99.0, 100.0));
        assert!(approx_eq(1e9, 1e9 + 1.0));
        assert!(!approx_eq(f64::INFINITY, 10.0));
        assert!(!approx_eq(f64::INFINITY, f64::INFINITY));
        assert!(!approx_eq(f64::NAN, 0.0));
    }
}
