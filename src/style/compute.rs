//! Specified to computed values.
//!
//! Computed values are produced as serialized text, in the form a browser's
//! `getComputedStyle` reports them: absolute lengths in `px`, colors as
//! `rgb()`/`rgba()`, times in seconds, transforms as matrices.

use super::parse::Color;
use super::properties::{PropertyInfo, ValueKind};
use super::transform;
use super::values::{ComponentValue, split_commas, to_css};
use crate::units::absolute_length_factor;

/// What relative lengths and `currentcolor` resolve against.
#[derive(Debug, Clone, Copy)]
pub struct ComputeContext {
    /// The element's own font size (`em` basis outside `font-size`).
    pub font_size: f64,
    pub root_font_size: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub current_color: Color,
    pub parent_font_weight: f64,
}

/// Convert a length to px. `em` resolves against `em_basis`.
pub fn length_px(value: f64, unit: &str, em_basis: f64, ctx: &ComputeContext) -> Option<f64> {
    if let Some(factor) = absolute_length_factor(unit) {
        return Some(value * factor);
    }
    let px = match unit {
        "em" => value * em_basis,
        "rem" => value * ctx.root_font_size,
        "ex" | "ch" => value * em_basis / 2.0,
        "vw" | "svw" | "lvw" | "dvw" => value * ctx.viewport_width / 100.0,
        "vh" | "svh" | "lvh" | "dvh" => value * ctx.viewport_height / 100.0,
        "vmin" => value * ctx.viewport_width.min(ctx.viewport_height) / 100.0,
        "vmax" => value * ctx.viewport_width.max(ctx.viewport_height) / 100.0,
        _ => return None,
    };
    Some(px)
}

/// Options threaded through component conversion.
#[derive(Debug, Clone, Copy)]
struct Mode {
    em_basis: f64,
    /// Named colors and `currentcolor` are colors here.
    colors: bool,
    /// Unitless zero is a length here.
    zero_is_length: bool,
    /// Basis for percentages inside `calc()`, when known.
    percent_basis: Option<f64>,
}

/// Compute a longhand's value.
pub fn compute_value(
    info: &PropertyInfo,
    values: &[ComponentValue],
    ctx: &ComputeContext,
) -> String {
    let mode = Mode {
        em_basis: ctx.font_size,
        colors: info.kind == ValueKind::Color || bears_color(info.name),
        zero_is_length: info.kind == ValueKind::Length,
        percent_basis: None,
    };

    match (info.kind, values) {
        (ValueKind::FontWeight, [keyword]) if keyword.ident().is_some() => {
            let weight = match keyword.ident().unwrap_or_default() {
                "normal" => 400.0,
                "bold" => 700.0,
                "bolder" => bolder(ctx.parent_font_weight),
                "lighter" => lighter(ctx.parent_font_weight),
                _ => return to_css(values),
            };
            crate::util::format_number(weight)
        }
        (ValueKind::BorderWidth(_), [keyword]) if keyword.ident().is_some() => {
            match keyword.ident().unwrap_or_default() {
                "thin" => "1px".to_string(),
                "medium" => "3px".to_string(),
                "thick" => "5px".to_string(),
                _ => to_css(values),
            }
        }
        (ValueKind::Transform, [keyword]) if keyword.is_ident("none") => "none".to_string(),
        (ValueKind::Transform, _) => {
            let length = |v: &ComponentValue| match compute_component(v, ctx, mode) {
                ComponentValue::Dimension(px, unit) if unit == "px" => Some(px),
                _ => None,
            };
            match transform::compose(values, &length) {
                Some(matrix) => matrix.to_css_string(),
                None => compute_generic(values, ctx, mode),
            }
        }
        (ValueKind::AspectRatio, [ComponentValue::Number(n)]) => {
            format!("{} / 1", crate::util::format_number(*n))
        }
        _ => compute_generic(values, ctx, mode),
    }
}

/// Compute the `font-size` against the parent's font size. `None` when the
/// value cannot be resolved, in which case the parent's size is kept.
pub fn compute_font_size(
    values: &[ComponentValue],
    parent_font_size: f64,
    ctx: &ComputeContext,
) -> Option<f64> {
    let size = match values {
        [ComponentValue::Dimension(n, unit)] => length_px(*n, unit, parent_font_size, ctx)?,
        [ComponentValue::Percentage(p)] => parent_font_size * p / 100.0,
        [ComponentValue::Number(n)] if *n == 0.0 => 0.0,
        [ComponentValue::Ident(keyword)] => match keyword.to_ascii_lowercase().as_str() {
            "xx-small" => 9.0,
            "x-small" => 10.0,
            "small" => 13.0,
            "medium" => 16.0,
            "large" => 18.0,
            "x-large" => 24.0,
            "xx-large" => 32.0,
            "xxx-large" => 48.0,
            "smaller" => parent_font_size / 1.2,
            "larger" => parent_font_size * 1.2,
            _ => return None,
        },
        [ComponentValue::Function(name, args)] if is_math_function(name) => {
            let mode = Mode {
                em_basis: parent_font_size,
                colors: false,
                zero_is_length: true,
                percent_basis: Some(parent_font_size),
            };
            match evaluate_math(name, args, ctx, mode)? {
                CalcValue {
                    value,
                    kind: CalcKind::Length,
                } => value,
                _ => return None,
            }
        }
        _ => return None,
    };
    (size >= 0.0).then_some(size)
}

/// Compute a value that has no property-specific rules, e.g. a registered
/// custom property.
pub fn compute_components(values: &[ComponentValue], ctx: &ComputeContext) -> Vec<ComponentValue> {
    let mode = Mode {
        em_basis: ctx.font_size,
        colors: false,
        zero_is_length: false,
        percent_basis: None,
    };
    values
        .iter()
        .map(|v| compute_component(v, ctx, mode))
        .collect()
}

fn compute_generic(values: &[ComponentValue], ctx: &ComputeContext, mode: Mode) -> String {
    let computed: Vec<ComponentValue> = values
        .iter()
        .map(|v| match v {
            ComponentValue::Number(n) if mode.zero_is_length && *n == 0.0 => {
                ComponentValue::Dimension(0.0, "px".to_string())
            }
            _ => compute_component(v, ctx, mode),
        })
        .collect();
    to_css(&computed)
}

/// Properties outside the color table whose values still carry colors.
fn bears_color(property: &str) -> bool {
    matches!(
        property,
        "box-shadow" | "text-shadow" | "background-image" | "filter"
    )
}

fn bolder(parent: f64) -> f64 {
    if parent < 350.0 {
        400.0
    } else if parent < 550.0 {
        700.0
    } else {
        900.0
    }
}

fn lighter(parent: f64) -> f64 {
    if parent < 550.0 {
        100.0
    } else if parent < 750.0 {
        400.0
    } else {
        700.0
    }
}

fn compute_component(value: &ComponentValue, ctx: &ComputeContext, mode: Mode) -> ComponentValue {
    match value {
        ComponentValue::Dimension(n, unit) => {
            if let Some(px) = length_px(*n, unit, mode.em_basis, ctx) {
                ComponentValue::Dimension(px, "px".to_string())
            } else if unit == "ms" {
                ComponentValue::Dimension(n / 1000.0, "s".to_string())
            } else {
                value.clone()
            }
        }
        ComponentValue::Hash(hex) => match Color::from_hex(hex) {
            Some(color) => color.to_component(),
            None => value.clone(),
        },
        ComponentValue::Ident(name) if mode.colors => {
            if name.eq_ignore_ascii_case("currentcolor") {
                ctx.current_color.to_component()
            } else {
                Color::named(name).map_or_else(|| value.clone(), |c| c.to_component())
            }
        }
        ComponentValue::Function(name, args) => {
            if is_math_function(name)
                && let Some(result) = evaluate_math(name, args, ctx, mode)
            {
                return result.to_component();
            }
            if matches!(name.as_str(), "rgb" | "rgba" | "hsl" | "hsla")
                && let Some(color) = Color::parse(value)
            {
                return color.to_component();
            }
            let inner = Mode {
                colors: mode.colors || name.ends_with("gradient"),
                zero_is_length: false,
                ..mode
            };
            ComponentValue::Function(
                name.clone(),
                args.iter().map(|a| compute_component(a, ctx, inner)).collect(),
            )
        }
        ComponentValue::Parens(inner) => ComponentValue::Parens(
            inner.iter().map(|a| compute_component(a, ctx, mode)).collect(),
        ),
        ComponentValue::Brackets(inner) => ComponentValue::Brackets(inner.clone()),
        _ => value.clone(),
    }
}

fn is_math_function(name: &str) -> bool {
    matches!(name, "calc" | "min" | "max" | "clamp")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalcKind {
    Number,
    Length,
    Percent,
    Time,
    Angle,
}

#[derive(Debug, Clone, Copy)]
struct CalcValue {
    value: f64,
    kind: CalcKind,
}

impl CalcValue {
    fn to_component(self) -> ComponentValue {
        match self.kind {
            CalcKind::Number => ComponentValue::Number(self.value),
            CalcKind::Length => ComponentValue::Dimension(self.value, "px".to_string()),
            CalcKind::Percent => ComponentValue::Percentage(self.value),
            CalcKind::Time => ComponentValue::Dimension(self.value, "s".to_string()),
            CalcKind::Angle => ComponentValue::Dimension(self.value, "deg".to_string()),
        }
    }
}

fn evaluate_math(
    name: &str,
    args: &[ComponentValue],
    ctx: &ComputeContext,
    mode: Mode,
) -> Option<CalcValue> {
    match name {
        "calc" => {
            let mut parser = CalcParser {
                tokens: args,
                pos: 0,
                ctx,
                mode,
            };
            let value = parser.sum()?;
            (parser.pos == args.len()).then_some(value)
        }
        "min" | "max" | "clamp" => {
            let values = split_commas(args)
                .into_iter()
                .map(|arg| {
                    let mut parser = CalcParser {
                        tokens: arg,
                        pos: 0,
                        ctx,
                        mode,
                    };
                    let value = parser.sum()?;
                    (parser.pos == arg.len()).then_some(value)
                })
                .collect::<Option<Vec<_>>>()?;
            let kind = values.first()?.kind;
            if values.iter().any(|v| v.kind != kind) {
                return None;
            }
            let numbers = values.iter().map(|v| v.value);
            let value = match name {
                "min" => numbers.fold(f64::INFINITY, f64::min),
                "max" => numbers.fold(f64::NEG_INFINITY, f64::max),
                _ => match values.as_slice() {
                    [low, preferred, high] => preferred.value.min(high.value).max(low.value),
                    _ => return None,
                },
            };
            Some(CalcValue { value, kind })
        }
        _ => None,
    }
}

/// Recursive-descent evaluator over `calc()` arguments.
struct CalcParser<'a> {
    tokens: &'a [ComponentValue],
    pos: usize,
    ctx: &'a ComputeContext,
    mode: Mode,
}

impl CalcParser<'_> {
    fn sum(&mut self) -> Option<CalcValue> {
        let mut left = self.product()?;
        while let Some(ComponentValue::Delim(op @ ('+' | '-'))) = self.tokens.get(self.pos) {
            let op = *op;
            self.pos += 1;
            let right = self.product()?;
            if right.kind != left.kind {
                return None;
            }
            left.value = if op == '+' {
                left.value + right.value
            } else {
                left.value - right.value
            };
        }
        Some(left)
    }

    fn product(&mut self) -> Option<CalcValue> {
        let mut left = self.operand()?;
        while let Some(ComponentValue::Delim(op @ ('*' | '/'))) = self.tokens.get(self.pos) {
            let op = *op;
            self.pos += 1;
            let right = self.operand()?;
            left = match (op, left.kind, right.kind) {
                ('*', _, CalcKind::Number) => CalcValue {
                    value: left.value * right.value,
                    kind: left.kind,
                },
                ('*', CalcKind::Number, _) => CalcValue {
                    value: left.value * right.value,
                    kind: right.kind,
                },
                ('/', _, CalcKind::Number) if right.value != 0.0 => CalcValue {
                    value: left.value / right.value,
                    kind: left.kind,
                },
                _ => return None,
            };
        }
        Some(left)
    }

    fn operand(&mut self) -> Option<CalcValue> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        let value = match token {
            ComponentValue::Number(n) => CalcValue {
                value: *n,
                kind: CalcKind::Number,
            },
            ComponentValue::Percentage(p) => match self.mode.percent_basis {
                Some(basis) => CalcValue {
                    value: basis * p / 100.0,
                    kind: CalcKind::Length,
                },
                None => CalcValue {
                    value: *p,
                    kind: CalcKind::Percent,
                },
            },
            ComponentValue::Dimension(n, unit) => {
                if let Some(px) = length_px(*n, unit, self.mode.em_basis, self.ctx) {
                    CalcValue {
                        value: px,
                        kind: CalcKind::Length,
                    }
                } else if let Some(rad) = transform::angle_radians(*n, unit) {
                    CalcValue {
                        value: rad.to_degrees(),
                        kind: CalcKind::Angle,
                    }
                } else {
                    let seconds = match unit.as_str() {
                        "s" => *n,
                        "ms" => n / 1000.0,
                        _ => return None,
                    };
                    CalcValue {
                        value: seconds,
                        kind: CalcKind::Time,
                    }
                }
            }
            ComponentValue::Parens(inner) => {
                let mut nested = CalcParser {
                    tokens: inner,
                    pos: 0,
                    ctx: self.ctx,
                    mode: self.mode,
                };
                let value = nested.sum()?;
                if nested.pos != inner.len() {
                    return None;
                }
                value
            }
            ComponentValue::Function(name, args) if is_math_function(name) => {
                evaluate_math(name, args, self.ctx, self.mode)?
            }
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::properties::longhand;
    use crate::style::values::parse_value_text;

    fn ctx() -> ComputeContext {
        ComputeContext {
            font_size: 20.0,
            root_font_size: 16.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            current_color: Color::rgb(1, 2, 3),
            parent_font_weight: 400.0,
        }
    }

    fn computed(property: &str, value: &str) -> String {
        compute_value(longhand(property).unwrap(), &parse_value_text(value), &ctx())
    }

    #[test]
    fn test_lengths() {
        assert_eq!(computed("width", "2em"), "40px");
        assert_eq!(computed("width", "1.5rem"), "24px");
        assert_eq!(computed("width", "50vw"), "640px");
        assert_eq!(computed("width", "1in"), "96px");
        assert_eq!(computed("width", "50%"), "50%");
        assert_eq!(computed("margin-top", "0"), "0px");
        assert_eq!(computed("opacity", "0"), "0");
        assert_eq!(computed("top", "-0.3rem"), "-4.8px");
    }

    #[test]
    fn test_calc() {
        assert_eq!(computed("width", "calc(100px * 1.3)"), "130px");
        assert_eq!(computed("width", "calc(1rem + 4px)"), "20px");
        assert_eq!(computed("width", "calc((10px + 2px) / 2)"), "6px");
        assert_eq!(computed("width", "calc(50% - 10px)"), "calc(50% - 10px)");
        assert_eq!(computed("width", "min(10px, 2em)"), "10px");
        assert_eq!(computed("width", "clamp(10px, 1px, 20px)"), "10px");
    }

    #[test]
    fn test_colors() {
        assert_eq!(computed("background-color", "#fff"), "rgb(255, 255, 255)");
        assert_eq!(computed("color", "red"), "rgb(255, 0, 0)");
        assert_eq!(computed("border-top-color", "currentcolor"), "rgb(1, 2, 3)");
        assert_eq!(computed("background-color", "transparent"), "rgba(0, 0, 0, 0)");
        assert_eq!(
            computed("background-image", "linear-gradient(0deg, #5ddcff, red 43%)"),
            "linear-gradient(0deg, rgb(93, 220, 255), rgb(255, 0, 0) 43%)"
        );
        assert_eq!(computed("display", "red"), "red");
    }

    #[test]
    fn test_times_and_keywords() {
        assert_eq!(computed("animation-duration", "2500ms"), "2.5s");
        assert_eq!(computed("transition-delay", "1s"), "1s");
        assert_eq!(computed("font-weight", "bold"), "700");
        assert_eq!(computed("font-weight", "bolder"), "700");
        assert_eq!(computed("border-top-width", "thin"), "1px");
        assert_eq!(computed("aspect-ratio", "1"), "1 / 1");
        assert_eq!(computed("aspect-ratio", "2/3"), "2 / 3");
    }

    #[test]
    fn test_transform() {
        assert_eq!(computed("transform", "none"), "none");
        assert_eq!(
            computed("transform", "translateX(1em) rotate(90deg)"),
            "matrix(0, 1, -1, 0, 20, 0)"
        );
    }

    #[test]
    fn test_font_size() {
        let c = ctx();
        let size = |v: &str| compute_font_size(&parse_value_text(v), 10.0, &c);
        assert_eq!(size("2em"), Some(20.0));
        assert_eq!(size("150%"), Some(15.0));
        assert_eq!(size("1rem"), Some(16.0));
        assert_eq!(size("large"), Some(18.0));
        assert_eq!(size("calc(1em + 50%)"), Some(15.0));
        assert_eq!(size("nonsense"), None);
    }
}
