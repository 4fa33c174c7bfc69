//! Shorthand properties: expansion into longhands and serialization back.

use super::parse::Color;
use super::values::{ComponentValue, split_commas};

type Longhands = Vec<(&'static str, Vec<ComponentValue>)>;

const BOX_MARGIN: &[&str] = &["margin-top", "margin-right", "margin-bottom", "margin-left"];
const BOX_PADDING: &[&str] = &["padding-top", "padding-right", "padding-bottom", "padding-left"];
const BOX_INSET: &[&str] = &["top", "right", "bottom", "left"];
const BORDER_WIDTH: &[&str] = &[
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
];
const BORDER_STYLE: &[&str] = &[
    "border-top-style",
    "border-right-style",
    "border-bottom-style",
    "border-left-style",
];
const BORDER_COLOR: &[&str] = &[
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
];
const BORDER_RADIUS: &[&str] = &[
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-right-radius",
    "border-bottom-left-radius",
];
const BORDER: &[&str] = &[
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
    "border-top-style",
    "border-right-style",
    "border-bottom-style",
    "border-left-style",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
];
const BORDER_TOP: &[&str] = &["border-top-width", "border-top-style", "border-top-color"];
const BORDER_RIGHT: &[&str] = &["border-right-width", "border-right-style", "border-right-color"];
const BORDER_BOTTOM: &[&str] = &["border-bottom-width", "border-bottom-style", "border-bottom-color"];
const BORDER_LEFT: &[&str] = &["border-left-width", "border-left-style", "border-left-color"];
const OUTLINE: &[&str] = &["outline-width", "outline-style", "outline-color"];
const GAP: &[&str] = &["row-gap", "column-gap"];
const OVERFLOW: &[&str] = &["overflow-x", "overflow-y"];
const PLACE_ITEMS: &[&str] = &["align-items", "justify-items"];
const PLACE_CONTENT: &[&str] = &["align-content", "justify-content"];
const PLACE_SELF: &[&str] = &["align-self", "justify-self"];
const FLEX_FLOW: &[&str] = &["flex-direction", "flex-wrap"];
const FLEX: &[&str] = &["flex-grow", "flex-shrink", "flex-basis"];
const GRID_COLUMN: &[&str] = &["grid-column-start", "grid-column-end"];
const GRID_ROW: &[&str] = &["grid-row-start", "grid-row-end"];
const TEXT_DECORATION: &[&str] = &[
    "text-decoration-line",
    "text-decoration-style",
    "text-decoration-color",
];
const BACKGROUND: &[&str] = &[
    "background-color",
    "background-image",
    "background-repeat",
    "background-position",
    "background-size",
];
const ANIMATION: &[&str] = &[
    "animation-duration",
    "animation-timing-function",
    "animation-delay",
    "animation-iteration-count",
    "animation-direction",
    "animation-fill-mode",
    "animation-play-state",
    "animation-name",
];
const TRANSITION: &[&str] = &[
    "transition-property",
    "transition-duration",
    "transition-timing-function",
    "transition-delay",
];

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];
const TIMING_KEYWORDS: &[&str] = &[
    "ease",
    "linear",
    "ease-in",
    "ease-out",
    "ease-in-out",
    "step-start",
    "step-end",
];
const CSS_WIDE_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];

/// Longhands a shorthand sets, in serialization order.
pub fn longhands_of(name: &str) -> Option<&'static [&'static str]> {
    let longhands = match name {
        "margin" => BOX_MARGIN,
        "padding" => BOX_PADDING,
        "inset" => BOX_INSET,
        "border-width" => BORDER_WIDTH,
        "border-style" => BORDER_STYLE,
        "border-color" => BORDER_COLOR,
        "border-radius" => BORDER_RADIUS,
        "border" => BORDER,
        "border-top" => BORDER_TOP,
        "border-right" => BORDER_RIGHT,
        "border-bottom" => BORDER_BOTTOM,
        "border-left" => BORDER_LEFT,
        "outline" => OUTLINE,
        "gap" | "grid-gap" => GAP,
        "overflow" => OVERFLOW,
        "place-items" => PLACE_ITEMS,
        "place-content" => PLACE_CONTENT,
        "place-self" => PLACE_SELF,
        "flex-flow" => FLEX_FLOW,
        "flex" => FLEX,
        "grid-column" => GRID_COLUMN,
        "grid-row" => GRID_ROW,
        "text-decoration" => TEXT_DECORATION,
        "background" => BACKGROUND,
        "animation" => ANIMATION,
        "transition" => TRANSITION,
        _ => return None,
    };
    Some(longhands)
}

pub fn is_shorthand(name: &str) -> bool {
    longhands_of(name).is_some()
}

/// Expand a shorthand declaration into its longhands. `None` if `name` is
/// not a shorthand or the value does not parse.
pub fn expand(name: &str, value: &[ComponentValue]) -> Option<Longhands> {
    let longhands = longhands_of(name)?;

    if let [keyword] = value
        && let Some(ident) = keyword.ident()
        && CSS_WIDE_KEYWORDS.iter().any(|k| ident.eq_ignore_ascii_case(k))
    {
        return Some(longhands.iter().map(|&l| (l, value.to_vec())).collect());
    }

    match name {
        "margin" | "padding" | "inset" | "border-width" | "border-style" | "border-color"
        | "border-radius" => expand_box(longhands, value),
        "border" => {
            let [width, style, color] = parse_border_side(value)?;
            let mut out = Vec::with_capacity(12);
            for (i, part) in [width, style, color].into_iter().enumerate() {
                for side in 0..4 {
                    out.push((BORDER[i * 4 + side], part.clone()));
                }
            }
            Some(out)
        }
        "border-top" | "border-right" | "border-bottom" | "border-left" | "outline" => {
            let parts = parse_border_side(value)?;
            Some(longhands.iter().copied().zip(parts).collect())
        }
        "gap" | "grid-gap" | "overflow" | "place-items" | "place-content" | "place-self" => {
            expand_pair(longhands, value)
        }
        "flex-flow" => expand_flex_flow(value),
        "flex" => expand_flex(value),
        "grid-column" | "grid-row" => expand_grid_line(longhands, value),
        "text-decoration" => expand_text_decoration(value),
        "background" => expand_background(value),
        "animation" => expand_list(ANIMATION, value, parse_animation),
        "transition" => expand_list(TRANSITION, value, parse_transition),
        _ => None,
    }
}

/// Serialize a shorthand from its longhand values. `None` if a longhand is
/// missing or the longhands cannot be expressed by the shorthand.
pub fn serialize(name: &str, get: impl Fn(&str) -> Option<String>) -> Option<String> {
    let longhands = longhands_of(name)?;
    let values = longhands
        .iter()
        .map(|l| get(l))
        .collect::<Option<Vec<String>>>()?;

    if let Some(first) = values.first()
        && CSS_WIDE_KEYWORDS.contains(&first.as_str())
    {
        return values.iter().all(|v| v == first).then(|| first.clone());
    }

    match name {
        "margin" | "padding" | "inset" | "border-width" | "border-style" | "border-color"
        | "border-radius" => Some(serialize_box(&values)),
        "border" => {
            let uniform = values.chunks(4).all(|side| side.iter().all(|v| *v == side[0]));
            uniform.then(|| join_nonempty(&[&values[0], &values[4], &values[8]]))
        }
        "border-top" | "border-right" | "border-bottom" | "border-left" => {
            Some(join_nonempty(&[&values[0], &values[1], &values[2]]))
        }
        "outline" => Some(join_nonempty(&[&values[2], &values[1], &values[0]])),
        "gap" | "grid-gap" | "overflow" | "place-items" | "place-content" | "place-self" => {
            if values[0] == values[1] {
                Some(values[0].clone())
            } else {
                Some(format!("{} {}", values[0], values[1]))
            }
        }
        "grid-column" | "grid-row" => Some(format!("{} / {}", values[0], values[1])),
        "background" => Some(format!(
            "{} {} {} {} / {}",
            values[0], values[1], values[2], values[3], values[4]
        )),
        "animation" | "transition" => serialize_list(&values),
        _ => Some(values.join(" ")),
    }
}

fn join_nonempty(parts: &[&String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn serialize_box(values: &[String]) -> String {
    let (top, right, bottom, left) = (&values[0], &values[1], &values[2], &values[3]);
    if right == left {
        if top == bottom {
            if top == right {
                top.clone()
            } else {
                format!("{top} {right}")
            }
        } else {
            format!("{top} {right} {bottom}")
        }
    } else {
        format!("{top} {right} {bottom} {left}")
    }
}

/// Zip comma-separated longhand lists back into comma-separated shorthand
/// items.
fn serialize_list(values: &[String]) -> Option<String> {
    let lists: Vec<Vec<&str>> = values.iter().map(|v| v.split(", ").collect()).collect();
    let count = lists[0].len();
    if lists.iter().any(|l| l.len() != count) {
        return None;
    }
    let items: Vec<String> = (0..count)
        .map(|i| lists.iter().map(|l| l[i]).collect::<Vec<_>>().join(" "))
        .collect();
    Some(items.join(", "))
}

fn single(value: &ComponentValue) -> Vec<ComponentValue> {
    vec![value.clone()]
}

fn ident(name: &str) -> Vec<ComponentValue> {
    vec![ComponentValue::Ident(name.to_string())]
}

fn expand_box(longhands: &'static [&'static str], value: &[ComponentValue]) -> Option<Longhands> {
    // Elliptical radii (`a / b`) keep only the horizontal radii.
    let value = match value.iter().position(|v| *v == ComponentValue::Delim('/')) {
        Some(slash) => &value[..slash],
        None => value,
    };
    let [top, right, bottom, left] = match value {
        [a] => [a, a, a, a],
        [a, b] => [a, b, a, b],
        [a, b, c] => [a, b, c, b],
        [a, b, c, d] => [a, b, c, d],
        _ => return None,
    };
    Some(
        longhands
            .iter()
            .copied()
            .zip([single(top), single(right), single(bottom), single(left)])
            .collect(),
    )
}

fn expand_pair(longhands: &'static [&'static str], value: &[ComponentValue]) -> Option<Longhands> {
    let (first, second) = match value {
        [a] => (a, a),
        [a, b] => (a, b),
        _ => return None,
    };
    Some(vec![(longhands[0], single(first)), (longhands[1], single(second))])
}

fn is_line_width(value: &ComponentValue) -> bool {
    match value {
        ComponentValue::Dimension(..) => true,
        ComponentValue::Number(n) => *n == 0.0,
        ComponentValue::Ident(s) => matches!(s.as_str(), "thin" | "medium" | "thick"),
        ComponentValue::Function(name, _) => matches!(name.as_str(), "calc" | "min" | "max" | "clamp"),
        _ => false,
    }
}

fn is_color(value: &ComponentValue) -> bool {
    value.is_ident("currentcolor") || Color::parse(value).is_some()
}

/// `<line-width> || <line-style> || <color>`, with omitted parts reset.
fn parse_border_side(value: &[ComponentValue]) -> Option<[Vec<ComponentValue>; 3]> {
    let mut width = None;
    let mut style = None;
    let mut color = None;
    for component in value {
        if width.is_none() && is_line_width(component) {
            width = Some(single(component));
        } else if style.is_none()
            && component
                .ident()
                .is_some_and(|s| BORDER_STYLES.contains(&s.to_ascii_lowercase().as_str()))
        {
            style = Some(single(component));
        } else if color.is_none() && is_color(component) {
            color = Some(single(component));
        } else {
            return None;
        }
    }
    Some([
        width.unwrap_or_else(|| ident("medium")),
        style.unwrap_or_else(|| ident("none")),
        color.unwrap_or_else(|| ident("currentcolor")),
    ])
}

fn expand_flex_flow(value: &[ComponentValue]) -> Option<Longhands> {
    let mut direction = None;
    let mut wrap = None;
    for component in value {
        match component.ident() {
            Some("row" | "row-reverse" | "column" | "column-reverse") if direction.is_none() => {
                direction = Some(single(component));
            }
            Some("nowrap" | "wrap" | "wrap-reverse") if wrap.is_none() => {
                wrap = Some(single(component));
            }
            _ => return None,
        }
    }
    Some(vec![
        ("flex-direction", direction.unwrap_or_else(|| ident("row"))),
        ("flex-wrap", wrap.unwrap_or_else(|| ident("nowrap"))),
    ])
}

fn expand_flex(value: &[ComponentValue]) -> Option<Longhands> {
    let number = |n: f64| vec![ComponentValue::Number(n)];
    if let [keyword] = value {
        if keyword.is_ident("none") {
            return Some(vec![
                ("flex-grow", number(0.0)),
                ("flex-shrink", number(0.0)),
                ("flex-basis", ident("auto")),
            ]);
        }
        if keyword.is_ident("auto") {
            return Some(vec![
                ("flex-grow", number(1.0)),
                ("flex-shrink", number(1.0)),
                ("flex-basis", ident("auto")),
            ]);
        }
    }

    let mut factors = Vec::new();
    let mut basis = None;
    for component in value {
        match component {
            ComponentValue::Number(n) if basis.is_none() || factors.is_empty() => {
                if factors.len() == 2 {
                    return None;
                }
                factors.push(*n);
            }
            _ if basis.is_none() => basis = Some(single(component)),
            _ => return None,
        }
    }
    if factors.is_empty() && basis.is_none() {
        return None;
    }
    Some(vec![
        ("flex-grow", number(factors.first().copied().unwrap_or(1.0))),
        ("flex-shrink", number(factors.get(1).copied().unwrap_or(1.0))),
        (
            "flex-basis",
            basis.unwrap_or_else(|| vec![ComponentValue::Percentage(0.0)]),
        ),
    ])
}

fn expand_grid_line(
    longhands: &'static [&'static str],
    value: &[ComponentValue],
) -> Option<Longhands> {
    let mut parts = value.split(|v| *v == ComponentValue::Delim('/'));
    let start = parts.next().filter(|p| !p.is_empty())?.to_vec();
    let end = match parts.next() {
        Some(end) if !end.is_empty() => end.to_vec(),
        Some(_) => return None,
        None => ident("auto"),
    };
    if parts.next().is_some() {
        return None;
    }
    Some(vec![(longhands[0], start), (longhands[1], end)])
}

fn expand_text_decoration(value: &[ComponentValue]) -> Option<Longhands> {
    let mut line = Vec::new();
    let mut style = None;
    let mut color = None;
    for component in value {
        match component.ident() {
            Some("none" | "underline" | "overline" | "line-through") => line.push(component.clone()),
            Some("solid" | "double" | "dotted" | "dashed" | "wavy") if style.is_none() => {
                style = Some(single(component));
            }
            _ if color.is_none() && is_color(component) => color = Some(single(component)),
            _ => return None,
        }
    }
    Some(vec![
        (
            "text-decoration-line",
            if line.is_empty() { ident("none") } else { line },
        ),
        ("text-decoration-style", style.unwrap_or_else(|| ident("solid"))),
        (
            "text-decoration-color",
            color.unwrap_or_else(|| ident("currentcolor")),
        ),
    ])
}

fn expand_background(value: &[ComponentValue]) -> Option<Longhands> {
    let mut color = None;
    let mut image = None;
    let mut repeat = Vec::new();
    let mut position = Vec::new();
    let mut size = Vec::new();
    let mut after_slash = false;
    for component in value {
        match component {
            ComponentValue::Delim('/') => after_slash = true,
            ComponentValue::Url(_) if image.is_none() => image = Some(single(component)),
            ComponentValue::Function(name, _) if name.ends_with("gradient") && image.is_none() => {
                image = Some(single(component));
            }
            ComponentValue::Ident(s) if s == "none" && image.is_none() => {
                image = Some(single(component));
            }
            ComponentValue::Ident(s)
                if matches!(
                    s.as_str(),
                    "repeat" | "no-repeat" | "repeat-x" | "repeat-y" | "space" | "round"
                ) =>
            {
                repeat.push(component.clone());
            }
            _ if color.is_none() && !after_slash && is_color(component) => {
                color = Some(single(component));
            }
            _ if after_slash => size.push(component.clone()),
            _ => position.push(component.clone()),
        }
    }
    Some(vec![
        ("background-color", color.unwrap_or_else(|| ident("transparent"))),
        ("background-image", image.unwrap_or_else(|| ident("none"))),
        (
            "background-repeat",
            if repeat.is_empty() { ident("repeat") } else { repeat },
        ),
        (
            "background-position",
            if position.is_empty() {
                vec![ComponentValue::Percentage(0.0), ComponentValue::Percentage(0.0)]
            } else {
                position
            },
        ),
        ("background-size", if size.is_empty() { ident("auto") } else { size }),
    ])
}

/// Expand a comma-separated list shorthand: each item is parsed into one
/// value per longhand, and the longhands become comma-separated lists.
fn expand_list(
    longhands: &'static [&'static str],
    value: &[ComponentValue],
    parse_item: fn(&[ComponentValue]) -> Option<Vec<Vec<ComponentValue>>>,
) -> Option<Longhands> {
    let mut lists: Vec<Vec<ComponentValue>> = vec![Vec::new(); longhands.len()];
    for (i, item) in split_commas(value).into_iter().enumerate() {
        let parts = parse_item(item)?;
        for (list, part) in lists.iter_mut().zip(parts) {
            if i > 0 {
                list.push(ComponentValue::Comma);
            }
            list.extend(part);
        }
    }
    Some(longhands.iter().copied().zip(lists).collect())
}

fn is_time(value: &ComponentValue) -> bool {
    matches!(value, ComponentValue::Dimension(_, unit) if unit == "s" || unit == "ms")
}

fn is_timing_function(value: &ComponentValue) -> bool {
    match value {
        ComponentValue::Ident(s) => TIMING_KEYWORDS.contains(&s.as_str()),
        ComponentValue::Function(name, _) => {
            matches!(name.as_str(), "cubic-bezier" | "steps" | "linear")
        }
        _ => false,
    }
}

/// One `animation` item, in [`ANIMATION`] order.
fn parse_animation(item: &[ComponentValue]) -> Option<Vec<Vec<ComponentValue>>> {
    let mut duration = None;
    let mut timing = None;
    let mut delay = None;
    let mut iterations = None;
    let mut direction = None;
    let mut fill_mode = None;
    let mut play_state = None;
    let mut name = None;

    for component in item {
        let slot = if is_time(component) {
            if duration.is_none() { &mut duration } else { &mut delay }
        } else if timing.is_none() && is_timing_function(component) {
            &mut timing
        } else if iterations.is_none()
            && (matches!(component, ComponentValue::Number(_)) || component.is_ident("infinite"))
        {
            &mut iterations
        } else {
            match component {
                ComponentValue::Ident(s)
                    if direction.is_none()
                        && matches!(
                            s.as_str(),
                            "normal" | "reverse" | "alternate" | "alternate-reverse"
                        ) =>
                {
                    &mut direction
                }
                ComponentValue::Ident(s)
                    if fill_mode.is_none()
                        && matches!(s.as_str(), "none" | "forwards" | "backwards" | "both") =>
                {
                    &mut fill_mode
                }
                ComponentValue::Ident(s)
                    if play_state.is_none() && matches!(s.as_str(), "running" | "paused") =>
                {
                    &mut play_state
                }
                ComponentValue::Ident(_) | ComponentValue::String(_) => &mut name,
                _ => return None,
            }
        };
        if slot.is_some() {
            return None;
        }
        *slot = Some(single(component));
    }

    let seconds = || vec![ComponentValue::Dimension(0.0, "s".to_string())];
    Some(vec![
        duration.unwrap_or_else(seconds),
        timing.unwrap_or_else(|| ident("ease")),
        delay.unwrap_or_else(seconds),
        iterations.unwrap_or_else(|| vec![ComponentValue::Number(1.0)]),
        direction.unwrap_or_else(|| ident("normal")),
        fill_mode.unwrap_or_else(|| ident("none")),
        play_state.unwrap_or_else(|| ident("running")),
        name.unwrap_or_else(|| ident("none")),
    ])
}

/// One `transition` item, in [`TRANSITION`] order.
fn parse_transition(item: &[ComponentValue]) -> Option<Vec<Vec<ComponentValue>>> {
    let mut property = None;
    let mut duration = None;
    let mut timing = None;
    let mut delay = None;

    for component in item {
        let slot = if is_time(component) {
            if duration.is_none() { &mut duration } else { &mut delay }
        } else if timing.is_none() && is_timing_function(component) {
            &mut timing
        } else if matches!(component, ComponentValue::Ident(_)) {
            &mut property
        } else {
            return None;
        };
        if slot.is_some() {
            return None;
        }
        *slot = Some(single(component));
    }

    let seconds = || vec![ComponentValue::Dimension(0.0, "s".to_string())];
    Some(vec![
        property.unwrap_or_else(|| ident("all")),
        duration.unwrap_or_else(seconds),
        timing.unwrap_or_else(|| ident("ease")),
        delay.unwrap_or_else(seconds),
    ])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::style::values::{parse_value_text, to_css};

    fn expanded(name: &str, value: &str) -> HashMap<&'static str, String> {
        expand(name, &parse_value_text(value))
            .unwrap()
            .into_iter()
            .map(|(k, v)| (k, to_css(&v)))
            .collect()
    }

    #[test]
    fn test_box_expansion() {
        let m = expanded("margin", "10px auto");
        assert_eq!(m["margin-top"], "10px");
        assert_eq!(m["margin-right"], "auto");
        assert_eq!(m["margin-bottom"], "10px");
        assert_eq!(m["margin-left"], "auto");

        let r = expanded("border-radius", "50%");
        assert_eq!(r["border-bottom-left-radius"], "50%");
        assert!(expand("padding", &parse_value_text("1px 2px 3px 4px 5px")).is_none());
    }

    #[test]
    fn test_border_expansion() {
        let b = expanded("border", "3px solid #9ca3af");
        assert_eq!(b.len(), 12);
        assert_eq!(b["border-left-width"], "3px");
        assert_eq!(b["border-top-style"], "solid");
        assert_eq!(b["border-right-color"], "#9ca3af");

        let b = expanded("border-top", "dashed");
        assert_eq!(b["border-top-width"], "medium");
        assert_eq!(b["border-top-color"], "currentcolor");
        assert!(expand("border", &parse_value_text("solid solid")).is_none());
    }

    #[test]
    fn test_flex_expansion() {
        let f = expanded("flex", "1");
        assert_eq!(f["flex-grow"], "1");
        assert_eq!(f["flex-shrink"], "1");
        assert_eq!(f["flex-basis"], "0%");

        let f = expanded("flex", "none");
        assert_eq!(f["flex-grow"], "0");
        assert_eq!(f["flex-basis"], "auto");

        let f = expanded("flex", "2 3 10px");
        assert_eq!(f["flex-shrink"], "3");
        assert_eq!(f["flex-basis"], "10px");
    }

    #[test]
    fn test_animation_expansion() {
        let a = expanded("animation", "spin 2.5s linear infinite");
        assert_eq!(a["animation-name"], "spin");
        assert_eq!(a["animation-duration"], "2.5s");
        assert_eq!(a["animation-timing-function"], "linear");
        assert_eq!(a["animation-iteration-count"], "infinite");
        assert_eq!(a["animation-delay"], "0s");

        let a = expanded("animation", "a 1s, b 2s 500ms");
        assert_eq!(a["animation-name"], "a, b");
        assert_eq!(a["animation-delay"], "0s, 500ms");
    }

    #[test]
    fn test_css_wide_keyword() {
        let m = expanded("padding", "inherit");
        assert_eq!(m["padding-left"], "inherit");
    }

    #[test]
    fn test_serialize_box() {
        let values: HashMap<&str, &str> = [
            ("margin-top", "10px"),
            ("margin-right", "0px"),
            ("margin-bottom", "10px"),
            ("margin-left", "0px"),
        ]
        .into();
        let out = serialize("margin", |l| values.get(l).map(|v| v.to_string()));
        assert_eq!(out.as_deref(), Some("10px 0px"));
        assert_eq!(serialize("margin", |_| None), None);
    }

    #[test]
    fn test_serialize_border() {
        let uniform = serialize("border", |l| {
            Some(
                if l.ends_with("width") {
                    "3px"
                } else if l.ends_with("style") {
                    "solid"
                } else {
                    "rgb(0, 0, 0)"
                }
                .to_string(),
            )
        });
        assert_eq!(uniform.as_deref(), Some("3px solid rgb(0, 0, 0)"));

        let mixed = serialize("border", |l| {
            Some(if l == "border-top-width" { "1px" } else { "0px" }.to_string())
        });
        assert_eq!(mixed, None);
    }

    #[test]
    fn test_serialize_animation_list() {
        let out = serialize("animation", |l| {
            Some(
                match l {
                    "animation-name" => "spin",
                    "animation-duration" => "2.5s",
                    "animation-timing-function" => "linear",
                    "animation-iteration-count" => "infinite",
                    "animation-delay" => "0s",
                    "animation-direction" => "normal",
                    "animation-fill-mode" => "none",
                    _ => "running",
                }
                .to_string(),
            )
        });
        assert_eq!(
            out.as_deref(),
            Some("2.5s linear 0s infinite normal none running spin")
        );
    }
}
