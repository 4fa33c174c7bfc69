//! Longhand property table: inheritance, initial values and how computed
//! values are derived.

use std::collections::HashMap;
use std::sync::LazyLock;

/// How a property's specified value becomes its computed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Lengths are absolutized, colors in hex notation converted.
    Generic,
    /// Like `Generic`, and unitless zero becomes `0px`.
    Length,
    /// Named colors and `currentcolor` resolve to `rgb()`.
    Color,
    /// Resolved against the parent font size.
    FontSize,
    /// `normal`/`bold`/`bolder`/`lighter` become numeric weights.
    FontWeight,
    /// Computes to `0px` when the matching style is `none` or `hidden`.
    BorderWidth(&'static str),
    /// A transform list computes to a matrix.
    Transform,
    /// A single number becomes an `a / b` ratio.
    AspectRatio,
}

#[derive(Debug, Clone, Copy)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub inherited: bool,
    pub initial: &'static str,
    pub kind: ValueKind,
}

/// Basis a percentage of this property resolves against, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentBasis {
    ParentWidth,
    ParentHeight,
    ParentFontSize,
    OwnFontSize,
    OwnWidth,
}

macro_rules! longhands {
    ($($name:literal, $inherited:expr, $initial:literal, $kind:expr;)*) => {
        &[$(PropertyInfo { name: $name, inherited: $inherited, initial: $initial, kind: $kind },)*]
    };
}

use ValueKind::*;

const INHERITED: bool = true;
const RESET: bool = false;

static LONGHANDS: &[PropertyInfo] = longhands! {
    "display", RESET, "inline", Generic;
    "position", RESET, "static", Generic;
    "top", RESET, "auto", Length;
    "right", RESET, "auto", Length;
    "bottom", RESET, "auto", Length;
    "left", RESET, "auto", Length;
    "z-index", RESET, "auto", Generic;
    "float", RESET, "none", Generic;
    "clear", RESET, "none", Generic;
    "box-sizing", RESET, "content-box", Generic;
    "width", RESET, "auto", Length;
    "height", RESET, "auto", Length;
    "min-width", RESET, "auto", Length;
    "min-height", RESET, "auto", Length;
    "max-width", RESET, "none", Length;
    "max-height", RESET, "none", Length;
    "aspect-ratio", RESET, "auto", AspectRatio;
    "margin-top", RESET, "0px", Length;
    "margin-right", RESET, "0px", Length;
    "margin-bottom", RESET, "0px", Length;
    "margin-left", RESET, "0px", Length;
    "padding-top", RESET, "0px", Length;
    "padding-right", RESET, "0px", Length;
    "padding-bottom", RESET, "0px", Length;
    "padding-left", RESET, "0px", Length;
    "border-top-width", RESET, "3px", BorderWidth("border-top-style");
    "border-right-width", RESET, "3px", BorderWidth("border-right-style");
    "border-bottom-width", RESET, "3px", BorderWidth("border-bottom-style");
    "border-left-width", RESET, "3px", BorderWidth("border-left-style");
    "border-top-style", RESET, "none", Generic;
    "border-right-style", RESET, "none", Generic;
    "border-bottom-style", RESET, "none", Generic;
    "border-left-style", RESET, "none", Generic;
    "border-top-color", RESET, "currentcolor", Color;
    "border-right-color", RESET, "currentcolor", Color;
    "border-bottom-color", RESET, "currentcolor", Color;
    "border-left-color", RESET, "currentcolor", Color;
    "border-top-left-radius", RESET, "0px", Length;
    "border-top-right-radius", RESET, "0px", Length;
    "border-bottom-right-radius", RESET, "0px", Length;
    "border-bottom-left-radius", RESET, "0px", Length;
    "border-collapse", INHERITED, "separate", Generic;
    "outline-width", RESET, "3px", BorderWidth("outline-style");
    "outline-style", RESET, "none", Generic;
    "outline-color", RESET, "currentcolor", Color;
    "outline-offset", RESET, "0px", Length;
    "color", INHERITED, "rgb(0, 0, 0)", Color;
    "background-color", RESET, "rgba(0, 0, 0, 0)", Color;
    "background-image", RESET, "none", Generic;
    "background-size", RESET, "auto", Length;
    "background-position", RESET, "0% 0%", Length;
    "background-repeat", RESET, "repeat", Generic;
    "opacity", RESET, "1", Generic;
    "visibility", INHERITED, "visible", Generic;
    "overflow-x", RESET, "visible", Generic;
    "overflow-y", RESET, "visible", Generic;
    "cursor", INHERITED, "auto", Generic;
    "pointer-events", INHERITED, "auto", Generic;
    "user-select", RESET, "auto", Generic;
    "font-family", INHERITED, "serif", Generic;
    "font-size", INHERITED, "16px", FontSize;
    "font-style", INHERITED, "normal", Generic;
    "font-weight", INHERITED, "400", FontWeight;
    "line-height", INHERITED, "normal", Length;
    "letter-spacing", INHERITED, "normal", Length;
    "word-spacing", INHERITED, "0px", Length;
    "text-align", INHERITED, "start", Generic;
    "text-indent", INHERITED, "0px", Length;
    "text-transform", INHERITED, "none", Generic;
    "text-shadow", INHERITED, "none", Length;
    "text-decoration-line", RESET, "none", Generic;
    "text-decoration-style", RESET, "solid", Generic;
    "text-decoration-color", RESET, "currentcolor", Color;
    "white-space", INHERITED, "normal", Generic;
    "list-style-type", INHERITED, "disc", Generic;
    "list-style-position", INHERITED, "outside", Generic;
    "vertical-align", RESET, "baseline", Length;
    "flex-direction", RESET, "row", Generic;
    "flex-wrap", RESET, "nowrap", Generic;
    "flex-grow", RESET, "0", Generic;
    "flex-shrink", RESET, "1", Generic;
    "flex-basis", RESET, "auto", Length;
    "order", RESET, "0", Generic;
    "justify-content", RESET, "normal", Generic;
    "justify-items", RESET, "normal", Generic;
    "justify-self", RESET, "auto", Generic;
    "align-content", RESET, "normal", Generic;
    "align-items", RESET, "normal", Generic;
    "align-self", RESET, "auto", Generic;
    "row-gap", RESET, "normal", Length;
    "column-gap", RESET, "normal", Length;
    "grid-template-columns", RESET, "none", Length;
    "grid-template-rows", RESET, "none", Length;
    "grid-column-start", RESET, "auto", Generic;
    "grid-column-end", RESET, "auto", Generic;
    "grid-row-start", RESET, "auto", Generic;
    "grid-row-end", RESET, "auto", Generic;
    "box-shadow", RESET, "none", Length;
    "filter", RESET, "none", Length;
    "mix-blend-mode", RESET, "normal", Generic;
    "object-fit", RESET, "fill", Generic;
    "transform", RESET, "none", Transform;
    "translate", RESET, "none", Length;
    "rotate", RESET, "none", Generic;
    "scale", RESET, "none", Generic;
    "content", RESET, "normal", Generic;
    "animation-name", RESET, "none", Generic;
    "animation-duration", RESET, "0s", Generic;
    "animation-timing-function", RESET, "ease", Generic;
    "animation-delay", RESET, "0s", Generic;
    "animation-iteration-count", RESET, "1", Generic;
    "animation-direction", RESET, "normal", Generic;
    "animation-fill-mode", RESET, "none", Generic;
    "animation-play-state", RESET, "running", Generic;
    "transition-property", RESET, "all", Generic;
    "transition-duration", RESET, "0s", Generic;
    "transition-timing-function", RESET, "ease", Generic;
    "transition-delay", RESET, "0s", Generic;
};

static BY_NAME: LazyLock<HashMap<&'static str, &'static PropertyInfo>> =
    LazyLock::new(|| LONGHANDS.iter().map(|info| (info.name, info)).collect());

/// Table entry for a longhand property.
pub fn longhand(name: &str) -> Option<&'static PropertyInfo> {
    BY_NAME.get(name).copied()
}

pub fn all_longhands() -> impl Iterator<Item = &'static PropertyInfo> {
    LONGHANDS.iter()
}

pub fn is_inherited(name: &str) -> bool {
    longhand(name).is_some_and(|info| info.inherited)
}

/// Initial value of a longhand, as its computed value serializes.
///
/// Pseudo-elements report `content: none` rather than `normal`.
pub fn initial_value(name: &str, pseudo: bool) -> Option<&'static str> {
    if pseudo && name == "content" {
        return Some("none");
    }
    longhand(name).map(|info| info.initial)
}

pub fn percent_basis(name: &str) -> Option<PercentBasis> {
    let basis = match name {
        "width" | "min-width" | "max-width" | "left" | "right" | "flex-basis" | "column-gap"
        | "text-indent" | "margin-top" | "margin-right" | "margin-bottom" | "margin-left"
        | "padding-top" | "padding-right" | "padding-bottom" | "padding-left" => {
            PercentBasis::ParentWidth
        }
        "height" | "min-height" | "max-height" | "top" | "bottom" | "row-gap" => {
            PercentBasis::ParentHeight
        }
        "font-size" => PercentBasis::ParentFontSize,
        "line-height" | "vertical-align" => PercentBasis::OwnFontSize,
        "border-top-left-radius"
        | "border-top-right-radius"
        | "border-bottom-right-radius"
        | "border-bottom-left-radius"
        | "translate" => PercentBasis::OwnWidth,
        _ => return None,
    };
    Some(basis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let color = longhand("color").unwrap();
        assert!(color.inherited);
        assert_eq!(color.kind, ValueKind::Color);
        assert!(!is_inherited("width"));
        assert!(longhand("margin").is_none());
    }

    #[test]
    fn test_initial_values() {
        assert_eq!(initial_value("background-color", false), Some("rgba(0, 0, 0, 0)"));
        assert_eq!(initial_value("content", false), Some("normal"));
        assert_eq!(initial_value("content", true), Some("none"));
        assert_eq!(initial_value("no-such-property", false), None);
    }

    #[test]
    fn test_table_has_no_duplicates() {
        assert_eq!(BY_NAME.len(), LONGHANDS.len());
    }
}
