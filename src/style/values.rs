//! Component values: the token tree declarations are stored as.
//!
//! Values are kept as a light tree of CSS component values rather than
//! typed per-property structures, because verification must be able to
//! read back *any* property, including ones this crate knows nothing about.

use std::fmt::Write as _;

use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::util::{format_number, widen};

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    Ident(String),
    Number(f64),
    /// Percentage on the 0-100 scale.
    Percentage(f64),
    /// Number with a unit; the unit is lowercased.
    Dimension(f64, String),
    /// `#abc` / `#id`, without the hash.
    Hash(String),
    String(String),
    Url(String),
    /// Function with a lowercased name and its arguments.
    Function(String, Vec<ComponentValue>),
    /// `( … )`
    Parens(Vec<ComponentValue>),
    /// `[ … ]`
    Brackets(Vec<ComponentValue>),
    Comma,
    Delim(char),
}

impl ComponentValue {
    pub fn ident(&self) -> Option<&str> {
        match self {
            Self::Ident(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_ident(&self, name: &str) -> bool {
        self.ident().is_some_and(|s| s.eq_ignore_ascii_case(name))
    }

    pub fn is_function(&self, name: &str) -> bool {
        matches!(self, Self::Function(n, _) if n == name)
    }

    /// Whether a `var()` reference appears anywhere in this value.
    pub fn references_var(&self) -> bool {
        match self {
            Self::Function(name, args) => name == "var" || args.iter().any(Self::references_var),
            Self::Parens(inner) | Self::Brackets(inner) => inner.iter().any(Self::references_var),
            _ => false,
        }
    }
}

/// Parse every remaining component value in `input`.
pub fn parse_component_values(input: &mut Parser<'_, '_>) -> Vec<ComponentValue> {
    let mut out = Vec::new();
    loop {
        let token = match input.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let value = match token {
            Token::Ident(s) => ComponentValue::Ident(s.to_string()),
            Token::Number { value, .. } => ComponentValue::Number(widen(value)),
            Token::Percentage { unit_value, .. } => {
                ComponentValue::Percentage(widen(unit_value) * 100.0)
            }
            Token::Dimension { value, unit, .. } => {
                ComponentValue::Dimension(widen(value), unit.to_ascii_lowercase())
            }
            Token::Hash(s) | Token::IDHash(s) => ComponentValue::Hash(s.to_string()),
            Token::QuotedString(s) => ComponentValue::String(s.to_string()),
            Token::UnquotedUrl(s) => ComponentValue::Url(s.to_string()),
            Token::Function(name) => {
                let name = name.to_ascii_lowercase();
                let args = parse_nested(input);
                if name == "url" {
                    match args.as_slice() {
                        [ComponentValue::String(url)] => ComponentValue::Url(url.clone()),
                        _ => ComponentValue::Function(name, args),
                    }
                } else {
                    ComponentValue::Function(name, args)
                }
            }
            Token::ParenthesisBlock => ComponentValue::Parens(parse_nested(input)),
            Token::SquareBracketBlock => ComponentValue::Brackets(parse_nested(input)),
            Token::CurlyBracketBlock => {
                parse_nested(input);
                continue;
            }
            Token::Comma => ComponentValue::Comma,
            Token::Delim(c) => ComponentValue::Delim(c),
            Token::Colon => ComponentValue::Delim(':'),
            Token::Semicolon => ComponentValue::Delim(';'),
            _ => continue,
        };
        out.push(value);
    }
    out
}

fn parse_nested(input: &mut Parser<'_, '_>) -> Vec<ComponentValue> {
    input
        .parse_nested_block(|nested| -> Result<_, ParseError<'_, ()>> {
            Ok(parse_component_values(nested))
        })
        .unwrap_or_default()
}

/// Parse standalone value text, e.g. a requirement's expected value.
pub fn parse_value_text(text: &str) -> Vec<ComponentValue> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    parse_component_values(&mut parser)
}

/// Split a value at its top-level commas.
pub fn split_commas(values: &[ComponentValue]) -> Vec<&[ComponentValue]> {
    values
        .split(|v| matches!(v, ComponentValue::Comma))
        .collect()
}

/// Serialize component values with normalized spacing: one space between
/// components, `, ` after commas, spaced delimiters.
pub fn to_css(values: &[ComponentValue]) -> String {
    let mut out = String::new();
    write_values(values, &mut out);
    out
}

fn write_values(values: &[ComponentValue], out: &mut String) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 && !matches!(value, ComponentValue::Comma) {
            out.push(' ');
        }
        write_value(value, out);
    }
}

fn write_value(value: &ComponentValue, out: &mut String) {
    match value {
        ComponentValue::Ident(s) => out.push_str(s),
        ComponentValue::Number(n) => out.push_str(&format_number(*n)),
        ComponentValue::Percentage(n) => {
            out.push_str(&format_number(*n));
            out.push('%');
        }
        ComponentValue::Dimension(n, unit) => {
            out.push_str(&format_number(*n));
            out.push_str(unit);
        }
        ComponentValue::Hash(s) => {
            out.push('#');
            out.push_str(s);
        }
        ComponentValue::String(s) => {
            let _ = cssparser::serialize_string(s, out);
        }
        ComponentValue::Url(s) => {
            out.push_str("url(");
            let _ = cssparser::serialize_string(s, out);
            out.push(')');
        }
        ComponentValue::Function(name, args) => {
            out.push_str(name);
            out.push('(');
            write_values(args, out);
            out.push(')');
        }
        ComponentValue::Parens(inner) => {
            out.push('(');
            write_values(inner, out);
            out.push(')');
        }
        ComponentValue::Brackets(inner) => {
            out.push('[');
            write_values(inner, out);
            out.push(']');
        }
        ComponentValue::Comma => out.push(','),
        ComponentValue::Delim(c) => {
            let _ = write!(out, "{c}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) -> String {
        to_css(&parse_value_text(text))
    }

    #[test]
    fn test_normalized_spacing() {
        assert_eq!(roundtrip("2/3"), "2 / 3");
        assert_eq!(roundtrip("  grid "), "grid");
        assert_eq!(roundtrip("calc(var(--base-size)*1.3)"), "calc(var(--base-size) * 1.3)");
        assert_eq!(
            roundtrip("linear-gradient( 0deg,#5ddcff ,#3c67e3 43%)"),
            "linear-gradient(0deg, #5ddcff, #3c67e3 43%)"
        );
    }

    #[test]
    fn test_numbers_and_units() {
        assert_eq!(roundtrip("-0.3rem"), "-0.3rem");
        assert_eq!(roundtrip("50%"), "50%");
        assert_eq!(roundtrip("2.5S"), "2.5s");
        assert_eq!(roundtrip("1.7"), "1.7");
    }

    #[test]
    fn test_strings_and_urls() {
        assert_eq!(roundtrip("''"), "\"\"");
        assert_eq!(roundtrip("'a\"b'"), "\"a\\\"b\"");
        assert_eq!(roundtrip("url(img.png)"), "url(\"img.png\")");
        assert_eq!(roundtrip("url('img.png')"), "url(\"img.png\")");
    }

    #[test]
    fn test_references_var() {
        let values = parse_value_text("calc(var(--x) * 2)");
        assert!(values.iter().any(ComponentValue::references_var));
        let values = parse_value_text("10px");
        assert!(!values.iter().any(ComponentValue::references_var));
    }

    #[test]
    fn test_split_commas() {
        let values = parse_value_text("spin 2s, fade 1s");
        let parts = split_commas(&values);
        assert_eq!(parts.len(), 2);
        assert_eq!(to_css(parts[1]), "fade 1s");
    }
}
