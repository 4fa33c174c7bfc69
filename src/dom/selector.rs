//! Selector text handling: normalization, pseudo-element splitting, parsing
//! and matching.
//!
//! Rules and requirements both name elements by selector text. Stylesheet
//! lookups compare normalized text (the way CSSOM `selectorText` reads back),
//! while cascade and queries match parsed selectors against the arena.

use std::fmt;

use cssparser::{Parser, ParserInput};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::{MatchingForInvalidation, MatchingMode, NeedsSelectorFlags};
use selectors::parser::{ParseRelative, Selector, SelectorList};
use serde::{Deserialize, Serialize};

use super::arena::{ArenaDom, NodeId};
use super::element_ref::{ElementRef, PreviewSelectors};

/// Generated boxes a requirement or rule can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PseudoElement {
    Before,
    After,
}

impl PseudoElement {
    /// Parse `::before`, `:before`, `before` (case-insensitive).
    pub fn parse(text: &str) -> Option<Self> {
        let name = text.trim().trim_start_matches(':');
        if name.eq_ignore_ascii_case("before") {
            Some(Self::Before)
        } else if name.eq_ignore_ascii_case("after") {
            Some(Self::After)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "::before",
            Self::After => "::after",
        }
    }
}

impl fmt::Display for PseudoElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PseudoElement {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unsupported pseudo-element `{value}`"))
    }
}

impl From<PseudoElement> for String {
    fn from(value: PseudoElement) -> Self {
        value.as_str().to_string()
    }
}

/// Pseudo-elements CSS2 allowed with a single colon.
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Normalize selector text so equivalent spellings compare equal.
///
/// Collapses whitespace, puts single spaces around combinators, `, ` after
/// list commas, and rewrites legacy `:before`-style pseudo-elements to the
/// double-colon form. Quoted strings and attribute brackets are left alone.
pub fn normalize_selector_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.trim().chars();
    let mut quote: Option<char> = None;
    let mut brackets = 0usize;
    let mut parens = 0usize;
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        let combinator = brackets == 0 && parens == 0 && matches!(c, '>' | '+' | '~' | ',');
        if combinator {
            while out.ends_with(' ') {
                out.pop();
            }
            if c == ',' {
                out.push_str(", ");
            } else {
                out.push(' ');
                out.push(c);
                out.push(' ');
            }
            pending_space = false;
            continue;
        }

        if pending_space && !out.is_empty() && !out.ends_with(' ') && !out.ends_with('(') && c != ')'
        {
            out.push(' ');
        }
        pending_space = false;

        match c {
            '"' | '\'' => quote = Some(c),
            '[' => brackets += 1,
            ']' => brackets = brackets.saturating_sub(1),
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
                continue;
            }
            _ => {}
        }
        out.push(c);
    }

    while out.ends_with(' ') {
        out.pop();
    }
    upgrade_legacy_pseudo_elements(&out)
}

fn upgrade_legacy_pseudo_elements(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 4);
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b':' && (i == 0 || bytes[i - 1] != b':') && bytes.get(i + 1) != Some(&b':') {
            let rest = &text[i + 1..];
            let legacy = LEGACY_PSEUDO_ELEMENTS.iter().find(|name| {
                rest.len() >= name.len()
                    && rest[..name.len()].eq_ignore_ascii_case(name)
                    && !rest[name.len()..]
                        .chars()
                        .next()
                        .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
            });
            if legacy.is_some() {
                out.push_str("::");
                i += 1;
                continue;
            }
        }
        let c = text[i..].chars().next().unwrap_or_default();
        out.push(c);
        i += c.len_utf8().max(1);
    }
    out
}

/// Split normalized selector-list text at its top-level commas.
pub fn split_selector_list(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Split a trailing `::before` / `::after` off a single normalized selector.
///
/// Returns `None` when the selector uses a pseudo-element this preview does
/// not generate, or places one anywhere but at the end.
pub fn split_pseudo_element(selector: &str) -> Option<(&str, Option<PseudoElement>)> {
    let Some(pos) = selector.rfind("::") else {
        return Some((selector, None));
    };
    let pseudo = PseudoElement::parse(&selector[pos..])?;
    let base = selector[..pos].trim_end();
    if base.contains("::") {
        return None;
    }
    // `::before` alone means `*::before`.
    Some((if base.is_empty() { "*" } else { base }, Some(pseudo)))
}

/// One member of a selector list, parsed.
#[derive(Debug, Clone)]
pub struct ParsedSelector {
    pub selector: Selector<PreviewSelectors>,
    pub pseudo: Option<PseudoElement>,
}

impl ParsedSelector {
    /// Specificity packed as `(ids, classes, elements)`; a pseudo-element
    /// counts as an element.
    pub fn specificity(&self) -> (u16, u16, u16) {
        let spec = self.selector.specificity();
        (
            ((spec >> 20) & 0x3FF) as u16,
            ((spec >> 10) & 0x3FF) as u16,
            (spec & 0x3FF) as u16 + u16::from(self.pseudo.is_some()),
        )
    }

    pub fn matches(&self, dom: &ArenaDom, element: NodeId, caches: &mut SelectorCaches) -> bool {
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            caches,
            selectors::context::QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        selectors::matching::matches_selector(
            &self.selector,
            0,
            None,
            &ElementRef::new(dom, element),
            &mut context,
        )
    }
}

/// Parse selector-list text. Any invalid member invalidates the whole list,
/// as it does for a style rule.
pub fn parse_selector_list(text: &str) -> Option<Vec<ParsedSelector>> {
    let normalized = normalize_selector_text(text);
    let members = split_selector_list(&normalized);
    if members.is_empty() {
        return None;
    }

    members
        .into_iter()
        .map(|member| {
            let (base, pseudo) = split_pseudo_element(member)?;
            let selector = parse_single(base)?;
            Some(ParsedSelector { selector, pseudo })
        })
        .collect()
}

fn parse_single(text: &str) -> Option<Selector<PreviewSelectors>> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let list = SelectorList::parse(&PreviewSelectors, &mut parser, ParseRelative::No).ok()?;
    parser.expect_exhausted().ok()?;
    list.slice().first().cloned()
}

/// First element in document order matching `selector`, like
/// `Document.querySelector`. Pseudo-element selectors match no element.
pub fn query_selector(dom: &ArenaDom, selector: &str) -> Option<NodeId> {
    let parsed = parse_selector_list(selector)?;
    if parsed.iter().any(|p| p.pseudo.is_some()) {
        return None;
    }
    let mut caches = SelectorCaches::default();
    dom.elements()
        .into_iter()
        .find(|&id| parsed.iter().any(|p| p.matches(dom, id, &mut caches)))
}
