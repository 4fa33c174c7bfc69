//! Unit parsing and conversion for numeric comparisons.
//!
//! A CSS value like `2.5s` is split into a magnitude and a unit, and an
//! actual rendered value is converted into the expected value's unit before
//! the two magnitudes are compared. Relative units (`%`, `em`, `rem`,
//! viewport units) resolve against a [`UnitContext`] taken from the element
//! that owns the value.
//!
//! ```
//! use csskata::units::{convert_unit_value, parse_unit_value};
//!
//! let expected = parse_unit_value("2500ms", None);
//! assert_eq!(expected.unit, "ms");
//! assert_eq!(convert_unit_value("ms", "2.5s", None, None), Some(2500.0));
//! assert_eq!(convert_unit_value("px", "2.5s", None, None), None);
//! ```

use serde::Serialize;

use crate::style::{ComponentValue, matrix_rotation_degrees, parse_value_text};

/// A numeric magnitude and its unit token; the unit is empty for plain
/// numbers and ratios.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedUnitValue {
    pub value: f64,
    pub unit: String,
}

impl ParsedUnitValue {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Element-relative bases for converting relative units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitContext {
    /// Computed font size of the element (`em` basis).
    pub font_size: f64,
    /// Computed font size of the parent (`em` basis for `font-size`).
    pub parent_font_size: f64,
    pub root_font_size: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// What `100%` of the property is, in px, when layout-independent.
    pub percent_basis: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitFamily {
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
    Unitless,
}

fn family(unit: &str) -> Option<UnitFamily> {
    let family = match unit {
        "" => UnitFamily::Unitless,
        "%" | "em" | "rem" | "ex" | "ch" | "vw" | "vh" | "vmin" | "vmax" | "svw" | "svh"
        | "lvw" | "lvh" | "dvw" | "dvh" => UnitFamily::Length,
        u if absolute_length_factor(u).is_some() => UnitFamily::Length,
        "deg" | "grad" | "rad" | "turn" => UnitFamily::Angle,
        "s" | "ms" => UnitFamily::Time,
        "hz" | "khz" => UnitFamily::Frequency,
        "dpi" | "dpcm" | "dppx" | "x" => UnitFamily::Resolution,
        _ => return None,
    };
    Some(family)
}

/// px per unit for the absolute length units.
pub fn absolute_length_factor(unit: &str) -> Option<f64> {
    let factor = match unit {
        "px" => 1.0,
        "in" => 96.0,
        "cm" => 96.0 / 2.54,
        "mm" => 96.0 / 25.4,
        "q" => 96.0 / 101.6,
        "pt" => 96.0 / 72.0,
        "pc" => 16.0,
        _ => return None,
    };
    Some(factor)
}

/// Canonical-unit factor for angle, time, frequency and resolution units.
fn canonical_factor(unit: &str) -> Option<f64> {
    let factor = match unit {
        "deg" => 1.0,
        "grad" => 0.9,
        "rad" => 180.0 / std::f64::consts::PI,
        "turn" => 360.0,
        "s" => 1.0,
        "ms" => 0.001,
        "hz" => 1.0,
        "khz" => 1000.0,
        "dppx" | "x" => 1.0,
        "dpi" => 1.0 / 96.0,
        "dpcm" => 2.54 / 96.0,
        _ => return None,
    };
    Some(factor)
}

/// Whether a property reports rotations through its transform matrix.
fn is_rotation_property(property: Option<&str>) -> bool {
    matches!(property, Some("transform" | "rotate"))
}

/// Parse a single numeric CSS value. `None` when the text is not one
/// number, percentage, dimension or `a / b` ratio, or when the magnitude
/// overflows.
///
/// A serialized transform matrix parses to its rotation angle in degrees
/// when `property` is `transform` or `rotate`.
pub fn try_parse_unit_value(raw: &str, property: Option<&str>) -> Option<ParsedUnitValue> {
    let values = parse_value_text(raw.trim());
    let parsed = match values.as_slice() {
        [ComponentValue::Number(n)] => Some(ParsedUnitValue::new(*n, "")),
        [ComponentValue::Percentage(p)] => Some(ParsedUnitValue::new(*p, "%")),
        [ComponentValue::Dimension(n, unit)] => {
            family(unit)?;
            Some(ParsedUnitValue::new(*n, unit.as_str()))
        }
        [
            ComponentValue::Number(a),
            ComponentValue::Delim('/'),
            ComponentValue::Number(b),
        ] if *b != 0.0 => Some(ParsedUnitValue::new(a / b, "")),
        [ComponentValue::Function(..)] if is_rotation_property(property) => {
            matrix_rotation_degrees(&values).map(|deg| ParsedUnitValue::new(deg, "deg"))
        }
        _ => None,
    };
    parsed.filter(|p| p.value.is_finite())
}

/// Parse a numeric CSS value, yielding `{0, ""}` when it does not parse.
///
/// Callers comparing values should prefer [`try_parse_unit_value`]: the
/// sentinel is indistinguishable from a real unitless zero.
pub fn parse_unit_value(raw: &str, property: Option<&str>) -> ParsedUnitValue {
    try_parse_unit_value(raw, property).unwrap_or_default()
}

/// Convert `actual` into `target_unit`. `None` when the value does not
/// parse, the unit families differ, or a relative unit has no basis.
pub fn convert_unit_value(
    target_unit: &str,
    actual: &str,
    context: Option<&UnitContext>,
    property: Option<&str>,
) -> Option<f64> {
    let target_unit = target_unit.trim().to_ascii_lowercase();
    let target_family = family(&target_unit)?;

    let actual = match try_parse_unit_value(actual, property) {
        Some(parsed) => parsed,
        None if target_family == UnitFamily::Angle => {
            let deg = matrix_rotation_degrees(&parse_value_text(actual.trim()))?;
            ParsedUnitValue::new(deg, "deg")
        }
        None => return None,
    };
    convert_parsed(&target_unit, target_family, &actual, context, property)
}

fn convert_parsed(
    target_unit: &str,
    target_family: UnitFamily,
    actual: &ParsedUnitValue,
    context: Option<&UnitContext>,
    property: Option<&str>,
) -> Option<f64> {
    if actual.unit == target_unit {
        return Some(actual.value);
    }
    let actual_family = family(&actual.unit)?;

    // Unitless zero is a valid length or angle.
    if actual_family == UnitFamily::Unitless
        && actual.value == 0.0
        && matches!(target_family, UnitFamily::Length | UnitFamily::Angle)
    {
        return Some(0.0);
    }
    if actual_family != target_family {
        return None;
    }

    match target_family {
        UnitFamily::Length => {
            let px = to_px(actual.value, &actual.unit, context, property)?;
            from_px(px, target_unit, context, property)
        }
        UnitFamily::Unitless => Some(actual.value),
        _ => {
            let canonical = actual.value * canonical_factor(&actual.unit)?;
            Some(canonical / canonical_factor(target_unit)?)
        }
    }
}

/// px per one of `unit`, resolving relative units against `context`.
fn px_per_unit(unit: &str, context: Option<&UnitContext>, property: Option<&str>) -> Option<f64> {
    if let Some(factor) = absolute_length_factor(unit) {
        return Some(factor);
    }
    let ctx = context?;
    let em = if property == Some("font-size") {
        ctx.parent_font_size
    } else {
        ctx.font_size
    };
    let factor = match unit {
        "%" => ctx.percent_basis? / 100.0,
        "em" => em,
        "rem" => ctx.root_font_size,
        "ex" | "ch" => em / 2.0,
        "vw" | "svw" | "lvw" | "dvw" => ctx.viewport_width / 100.0,
        "vh" | "svh" | "lvh" | "dvh" => ctx.viewport_height / 100.0,
        "vmin" => ctx.viewport_width.min(ctx.viewport_height) / 100.0,
        "vmax" => ctx.viewport_width.max(ctx.viewport_height) / 100.0,
        _ => return None,
    };
    Some(factor)
}

fn to_px(value: f64, unit: &str, context: Option<&UnitContext>, property: Option<&str>) -> Option<f64> {
    Some(value * px_per_unit(unit, context, property)?)
}

fn from_px(px: f64, unit: &str, context: Option<&UnitContext>, property: Option<&str>) -> Option<f64> {
    let factor = px_per_unit(unit, context, property)?;
    if factor == 0.0 {
        return None;
    }
    Some(px / factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::approx_eq;
    use proptest::prelude::*;

    fn context() -> UnitContext {
        UnitContext {
            font_size: 20.0,
            parent_font_size: 10.0,
            root_font_size: 16.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            percent_basis: Some(400.0),
        }
    }

    #[test]
    fn test_parse_unit_value() {
        assert_eq!(parse_unit_value("2.5s", None), ParsedUnitValue::new(2.5, "s"));
        assert_eq!(parse_unit_value("50%", None), ParsedUnitValue::new(50.0, "%"));
        assert_eq!(parse_unit_value("-1", Some("z-index")), ParsedUnitValue::new(-1.0, ""));
        assert_eq!(parse_unit_value(" 100PX ", None), ParsedUnitValue::new(100.0, "px"));
        assert_eq!(parse_unit_value("1 / 1", Some("aspect-ratio")), ParsedUnitValue::new(1.0, ""));
        assert_eq!(parse_unit_value("16/9", None).unit, "");
    }

    #[test]
    fn test_parse_failures_use_sentinel() {
        assert_eq!(parse_unit_value("auto", None), ParsedUnitValue::default());
        assert_eq!(parse_unit_value("", None), ParsedUnitValue::default());
        assert_eq!(parse_unit_value("10px 20px", None), ParsedUnitValue::default());
        assert_eq!(parse_unit_value("10furlongs", None), ParsedUnitValue::default());
        assert!(try_parse_unit_value("calc(1px + 2px)", None).is_none());
    }

    #[test]
    fn test_overflowing_magnitudes_do_not_parse() {
        assert!(try_parse_unit_value("1e400px", None).is_none());
        assert!(try_parse_unit_value("1e39s", None).is_none());
        assert!(try_parse_unit_value("1e39 / 1", None).is_none());
        assert_eq!(convert_unit_value("s", "1e39s", None, None), None);
        assert!(try_parse_unit_value("3e38px", None).is_some());
    }

    #[test]
    fn test_convert_absolute() {
        assert_eq!(convert_unit_value("px", "100px", None, Some("width")), Some(100.0));
        assert_eq!(convert_unit_value("px", "1in", None, None), Some(96.0));
        assert_eq!(convert_unit_value("s", "2500ms", None, None), Some(2.5));
        assert_eq!(convert_unit_value("deg", "0.5turn", None, None), Some(180.0));
        assert_eq!(convert_unit_value("px", "0", None, None), Some(0.0));
        assert_eq!(convert_unit_value("", "1 / 1", None, Some("aspect-ratio")), Some(1.0));
    }

    #[test]
    fn test_convert_relative() {
        let ctx = context();
        assert_eq!(convert_unit_value("px", "2em", Some(&ctx), Some("width")), Some(40.0));
        assert_eq!(convert_unit_value("px", "2em", Some(&ctx), Some("font-size")), Some(20.0));
        assert_eq!(convert_unit_value("rem", "32px", Some(&ctx), None), Some(2.0));
        assert_eq!(convert_unit_value("%", "100px", Some(&ctx), Some("width")), Some(25.0));
        assert_eq!(convert_unit_value("px", "10vw", Some(&ctx), None), Some(128.0));
    }

    #[test]
    fn test_convert_failures() {
        assert_eq!(convert_unit_value("px", "2.5s", None, None), None);
        assert_eq!(convert_unit_value("px", "2em", None, None), None);
        assert_eq!(convert_unit_value("px", "auto", None, None), None);
        assert_eq!(convert_unit_value("px", "", None, None), None);
        assert_eq!(convert_unit_value("bogus", "1px", None, None), None);
        let no_basis = UnitContext {
            percent_basis: None,
            ..context()
        };
        assert_eq!(convert_unit_value("px", "50%", Some(&no_basis), None), None);
    }

    #[test]
    fn test_convert_matrix_to_angle() {
        let deg = convert_unit_value("deg", "matrix(0, 1, -1, 0, 0, 0)", None, Some("transform"));
        assert!(approx_eq(deg.unwrap(), 90.0));
        let turn = convert_unit_value("turn", "matrix(0, 1, -1, 0, 0, 0)", None, None);
        assert!(approx_eq(turn.unwrap(), 0.25));
        assert_eq!(convert_unit_value("deg", "none", None, Some("transform")), None);
    }

    proptest! {
        #[test]
        fn prop_same_unit_round_trip(
            value in -10_000.0f64..10_000.0,
            unit in prop_oneof![Just("px"), Just("s"), Just("deg"), Just("%"), Just("rem")],
        ) {
            let value = (value * 100.0).round() / 100.0;
            let text = format!("{value}{unit}");
            let parsed = try_parse_unit_value(&text, None).unwrap();
            prop_assert_eq!(&parsed.unit, unit);
            prop_assert!(approx_eq(parsed.value, value));
            let back = convert_unit_value(unit, &text, None, None).unwrap();
            prop_assert!(approx_eq(back, value));
        }

        #[test]
        fn prop_time_conversion_is_reversible(ms in 0u32..1_000_000) {
            let seconds = convert_unit_value("s", &format!("{ms}ms"), None, None).unwrap();
            let millis = convert_unit_value("ms", &format!("{seconds}s"), None, None).unwrap();
            prop_assert!(approx_eq(millis, f64::from(ms)));
        }

        #[test]
        fn prop_incompatible_families_never_convert(value in -1000i32..1000) {
            prop_assert_eq!(convert_unit_value("px", &format!("{value}ms"), None, None), None);
            prop_assert_eq!(convert_unit_value("s", &format!("{value}deg"), None, None), None);
        }
    }
}
