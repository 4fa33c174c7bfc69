//! Color parsing and `rgb()`/`rgba()` serialization.

use crate::style::values::{ComponentValue, to_css};

/// An sRGB color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa` (without the `#`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 | 4 => {
                let r = digit(0)?;
                let g = digit(1)?;
                let b = digit(2)?;
                let a = if hex.len() == 4 { digit(3)? } else { 15 };
                Some(Self::rgba(r * 17, g * 17, b * 17, f64::from(a * 17) / 255.0))
            }
            6 | 8 => {
                let a = if hex.len() == 8 { pair(6)? } else { 255 };
                Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, f64::from(a) / 255.0))
            }
            _ => None,
        }
    }

    pub fn named(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == lower)
            .and_then(|(_, hex)| Self::from_hex(hex))
    }

    /// Parse a single color component value. `currentcolor` is left to the
    /// caller.
    pub fn parse(value: &ComponentValue) -> Option<Self> {
        match value {
            ComponentValue::Hash(hex) => Self::from_hex(hex),
            ComponentValue::Ident(name) => Self::named(name),
            ComponentValue::Function(name, args) => match name.as_str() {
                "rgb" | "rgba" => parse_rgb_function(args),
                "hsl" | "hsla" => parse_hsl_function(args),
                _ => None,
            },
            _ => None,
        }
    }

    /// The color as an `rgb()`/`rgba()` function component.
    pub fn to_component(self) -> ComponentValue {
        let mut args = vec![
            ComponentValue::Number(f64::from(self.r)),
            ComponentValue::Comma,
            ComponentValue::Number(f64::from(self.g)),
            ComponentValue::Comma,
            ComponentValue::Number(f64::from(self.b)),
        ];
        if self.a >= 1.0 {
            return ComponentValue::Function("rgb".to_string(), args);
        }
        // Alpha is stored with 8-bit precision, so round like a browser would.
        let alpha = ((self.a * 255.0).round() / 255.0 * 1000.0).round() / 1000.0;
        args.push(ComponentValue::Comma);
        args.push(ComponentValue::Number(alpha));
        ComponentValue::Function("rgba".to_string(), args)
    }

    /// Serialize as `rgb(r, g, b)` or, when translucent, `rgba(r, g, b, a)`.
    pub fn to_css_string(&self) -> String {
        to_css(std::slice::from_ref(&self.to_component()))
    }
}

/// Numeric channel arguments of a color function, with the alpha (after a
/// comma or `/`) split off.
fn channel_args(args: &[ComponentValue]) -> Option<(Vec<&ComponentValue>, Option<&ComponentValue>)> {
    let mut channels = Vec::new();
    let mut alpha = None;
    let mut after_slash = false;
    for arg in args {
        match arg {
            ComponentValue::Comma => {}
            ComponentValue::Delim('/') => after_slash = true,
            ComponentValue::Number(_)
            | ComponentValue::Percentage(_)
            | ComponentValue::Dimension(..) => {
                if after_slash || channels.len() == 3 {
                    alpha = Some(arg);
                } else {
                    channels.push(arg);
                }
            }
            ComponentValue::Ident(none) if none.eq_ignore_ascii_case("none") => {
                channels.push(arg);
            }
            _ => return None,
        }
    }
    if channels.len() != 3 {
        return None;
    }
    Some((channels, alpha))
}

fn alpha_value(alpha: Option<&ComponentValue>) -> Option<f64> {
    match alpha {
        None => Some(1.0),
        Some(ComponentValue::Number(n)) => Some(n.clamp(0.0, 1.0)),
        Some(ComponentValue::Percentage(p)) => Some((p / 100.0).clamp(0.0, 1.0)),
        _ => None,
    }
}

fn clamp_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn parse_rgb_function(args: &[ComponentValue]) -> Option<Color> {
    let (channels, alpha) = channel_args(args)?;
    let mut rgb = [0u8; 3];
    for (slot, channel) in rgb.iter_mut().zip(channels) {
        *slot = match channel {
            ComponentValue::Number(n) => clamp_channel(*n),
            ComponentValue::Percentage(p) => clamp_channel(p * 2.55),
            ComponentValue::Ident(_) => 0,
            _ => return None,
        };
    }
    Some(Color::rgba(rgb[0], rgb[1], rgb[2], alpha_value(alpha)?))
}

fn parse_hsl_function(args: &[ComponentValue]) -> Option<Color> {
    let (channels, alpha) = channel_args(args)?;
    let hue = match channels[0] {
        ComponentValue::Number(n) => *n,
        ComponentValue::Dimension(n, unit) => match unit.as_str() {
            "deg" => *n,
            "rad" => n.to_degrees(),
            "grad" => n * 0.9,
            "turn" => n * 360.0,
            _ => return None,
        },
        _ => return None,
    };
    let percent = |value: &ComponentValue| match value {
        ComponentValue::Percentage(p) => Some((p / 100.0).clamp(0.0, 1.0)),
        ComponentValue::Number(n) => Some((n / 100.0).clamp(0.0, 1.0)),
        _ => None,
    };
    let saturation = percent(channels[1])?;
    let lightness = percent(channels[2])?;

    let hue = hue.rem_euclid(360.0) / 360.0;
    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;
    let channel = |t: f64| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        clamp_channel(v * 255.0)
    };
    Some(Color::rgba(
        channel(hue + 1.0 / 3.0),
        channel(hue),
        channel(hue - 1.0 / 3.0),
        alpha_value(alpha)?,
    ))
}

static NAMED_COLORS: &[(&str, &str)] = &[
    ("aliceblue", "f0f8ff"),
    ("aqua", "00ffff"),
    ("aquamarine", "7fffd4"),
    ("azure", "f0ffff"),
    ("beige", "f5f5dc"),
    ("black", "000000"),
    ("blue", "0000ff"),
    ("blueviolet", "8a2be2"),
    ("brown", "a52a2a"),
    ("burlywood", "deb887"),
    ("cadetblue", "5f9ea0"),
    ("chartreuse", "7fff00"),
    ("chocolate", "d2691e"),
    ("coral", "ff7f50"),
    ("cornflowerblue", "6495ed"),
    ("cornsilk", "fff8dc"),
    ("crimson", "dc143c"),
    ("cyan", "00ffff"),
    ("darkblue", "00008b"),
    ("darkcyan", "008b8b"),
    ("darkgoldenrod", "b8860b"),
    ("darkgray", "a9a9a9"),
    ("darkgreen", "006400"),
    ("darkgrey", "a9a9a9"),
    ("darkkhaki", "bdb76b"),
    ("darkmagenta", "8b008b"),
    ("darkolivegreen", "556b2f"),
    ("darkorange", "ff8c00"),
    ("darkorchid", "9932cc"),
    ("darkred", "8b0000"),
    ("darksalmon", "e9967a"),
    ("darkseagreen", "8fbc8f"),
    ("darkslateblue", "483d8b"),
    ("darkslategray", "2f4f4f"),
    ("darkturquoise", "00ced1"),
    ("darkviolet", "9400d3"),
    ("deeppink", "ff1493"),
    ("deepskyblue", "00bfff"),
    ("dimgray", "696969"),
    ("dodgerblue", "1e90ff"),
    ("firebrick", "b22222"),
    ("floralwhite", "fffaf0"),
    ("forestgreen", "228b22"),
    ("fuchsia", "ff00ff"),
    ("gainsboro", "dcdcdc"),
    ("ghostwhite", "f8f8ff"),
    ("gold", "ffd700"),
    ("goldenrod", "daa520"),
    ("gray", "808080"),
    ("green", "008000"),
    ("greenyellow", "adff2f"),
    ("grey", "808080"),
    ("honeydew", "f0fff0"),
    ("hotpink", "ff69b4"),
    ("indianred", "cd5c5c"),
    ("indigo", "4b0082"),
    ("ivory", "fffff0"),
    ("khaki", "f0e68c"),
    ("lavender", "e6e6fa"),
    ("lawngreen", "7cfc00"),
    ("lemonchiffon", "fffacd"),
    ("lightblue", "add8e6"),
    ("lightcoral", "f08080"),
    ("lightcyan", "e0ffff"),
    ("lightgray", "d3d3d3"),
    ("lightgreen", "90ee90"),
    ("lightgrey", "d3d3d3"),
    ("lightpink", "ffb6c1"),
    ("lightsalmon", "ffa07a"),
    ("lightseagreen", "20b2aa"),
    ("lightskyblue", "87cefa"),
    ("lightslategray", "778899"),
    ("lightsteelblue", "b0c4de"),
    ("lightyellow", "ffffe0"),
    ("lime", "00ff00"),
    ("limegreen", "32cd32"),
    ("linen", "faf0e6"),
    ("magenta", "ff00ff"),
    ("maroon", "800000"),
    ("mediumaquamarine", "66cdaa"),
    ("mediumblue", "0000cd"),
    ("mediumorchid", "ba55d3"),
    ("mediumpurple", "9370db"),
    ("mediumseagreen", "3cb371"),
    ("mediumslateblue", "7b68ee"),
    ("mediumspringgreen", "00fa9a"),
    ("mediumturquoise", "48d1cc"),
    ("mediumvioletred", "c71585"),
    ("midnightblue", "191970"),
    ("mintcream", "f5fffa"),
    ("mistyrose", "ffe4e1"),
    ("moccasin", "ffe4b5"),
    ("navajowhite", "ffdead"),
    ("navy", "000080"),
    ("oldlace", "fdf5e6"),
    ("olive", "808000"),
    ("olivedrab", "6b8e23"),
    ("orange", "ffa500"),
    ("orangered", "ff4500"),
    ("orchid", "da70d6"),
    ("palegoldenrod", "eee8aa"),
    ("palegreen", "98fb98"),
    ("paleturquoise", "afeeee"),
    ("palevioletred", "db7093"),
    ("papayawhip", "ffefd5"),
    ("peachpuff", "ffdab9"),
    ("peru", "cd853f"),
    ("pink", "ffc0cb"),
    ("plum", "dda0dd"),
    ("powderblue", "b0e0e6"),
    ("purple", "800080"),
    ("rebeccapurple", "663399"),
    ("red", "ff0000"),
    ("rosybrown", "bc8f8f"),
    ("royalblue", "4169e1"),
    ("saddlebrown", "8b4513"),
    ("salmon", "fa8072"),
    ("sandybrown", "f4a460"),
    ("seagreen", "2e8b57"),
    ("seashell", "fff5ee"),
    ("sienna", "a0522d"),
    ("silver", "c0c0c0"),
    ("skyblue", "87ceeb"),
    ("slateblue", "6a5acd"),
    ("slategray", "708090"),
    ("snow", "fffafa"),
    ("springgreen", "00ff7f"),
    ("steelblue", "4682b4"),
    ("tan", "d2b48c"),
    ("teal", "008080"),
    ("thistle", "d8bfd8"),
    ("tomato", "ff6347"),
    ("turquoise", "40e0d0"),
    ("violet", "ee82ee"),
    ("wheat", "f5deb3"),
    ("white", "ffffff"),
    ("whitesmoke", "f5f5f5"),
    ("yellow", "ffff00"),
    ("yellowgreen", "9acd32"),
];
