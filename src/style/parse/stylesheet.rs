//! CSS stylesheet parsing and rule structures.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};

use crate::dom::{ParsedSelector, normalize_selector_text, parse_selector_list};
use crate::style::values::{ComponentValue, parse_component_values, to_css};

/// A parsed CSS stylesheet.
#[derive(Debug, Default, Clone)]
pub struct Stylesheet {
    pub rules: Vec<StyleRule>,
    /// `@property` registrations, in source order.
    pub registrations: Vec<PropertyRegistration>,
}

/// A style rule: selectors and the declarations in its block.
#[derive(Debug, Clone)]
pub struct StyleRule {
    /// Selector text in normalized form, as `CSSStyleRule.selectorText`
    /// would report it.
    pub selector_text: String,
    pub selectors: Vec<ParsedSelector>,
    /// Declarations in source order; `!important` ones are flagged.
    pub declarations: Vec<Declaration>,
}

/// One `property: value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Lowercased property name; custom properties keep their case.
    pub property: String,
    pub value: Vec<ComponentValue>,
    pub important: bool,
}

impl Declaration {
    pub fn is_custom(&self) -> bool {
        self.property.starts_with("--")
    }

    /// Value text with normalized spacing.
    pub fn value_text(&self) -> String {
        to_css(&self.value)
    }
}

/// An `@property` registration.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRegistration {
    pub name: String,
    pub syntax: String,
    pub inherits: bool,
    pub initial_value: Option<Vec<ComponentValue>>,
}

/// Origin of a style (for cascade ordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    UserAgent = 0,
    Author = 1,
}

impl StyleRule {
    /// The declaration a CSSOM `getPropertyValue` would report for a
    /// property written directly in this rule: the last `!important` one,
    /// else the last one.
    pub fn declared(&self, property: &str) -> Option<&Declaration> {
        let matching = || self.declarations.iter().filter(|d| d.property == property);
        matching()
            .filter(|d| d.important)
            .next_back()
            .or_else(|| matching().next_back())
    }
}

impl Stylesheet {
    /// Parse a CSS stylesheet from a string. Invalid rules and declarations
    /// are dropped the way a browser drops them.
    pub fn parse(css: &str) -> Self {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut sheet = Stylesheet::default();

        let mut rule_parser = TopLevelRuleParser { sheet: &mut sheet };
        let stylesheet_parser = StyleSheetParser::new(&mut parser, &mut rule_parser);

        for result in stylesheet_parser {
            if let Err((error, slice)) = result {
                log::trace!("dropped invalid rule {slice:?}: {:?}", error.kind);
            }
        }

        sheet
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule whose normalized selector text equals `selector_text`.
    pub fn find_rule(&self, selector_text: &str) -> Option<&StyleRule> {
        let wanted = normalize_selector_text(selector_text);
        self.rules.iter().find(|rule| rule.selector_text == wanted)
    }
}

/// Parser for top-level stylesheet rules.
struct TopLevelRuleParser<'a> {
    sheet: &'a mut Stylesheet,
}

enum AtRulePrelude {
    Property(String),
}

impl<'i> AtRuleParser<'i> for TopLevelRuleParser<'_> {
    type Prelude = AtRulePrelude;
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        if name.eq_ignore_ascii_case("property") {
            let ident = input.expect_ident()?.clone();
            if !ident.starts_with("--") {
                return Err(input.new_custom_error(()));
            }
            Ok(AtRulePrelude::Property(ident.to_string()))
        } else {
            // @keyframes, @media and friends carry nothing to verify.
            Err(input.new_custom_error(()))
        }
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let AtRulePrelude::Property(name) = prelude;
        let declarations = parse_declaration_block(input);

        let descriptor = |key: &str| declarations.iter().rev().find(|d| d.property == key);
        let syntax = match descriptor("syntax").map(|d| d.value.as_slice()) {
            Some([ComponentValue::String(syntax)]) => syntax.clone(),
            _ => return Err(input.new_custom_error(())),
        };
        let inherits = match descriptor("inherits").map(|d| d.value.as_slice()) {
            Some([value]) if value.is_ident("true") => true,
            Some([value]) if value.is_ident("false") => false,
            _ => return Err(input.new_custom_error(())),
        };
        let initial_value = descriptor("initial-value").map(|d| d.value.clone());
        if syntax != "*" && initial_value.is_none() {
            return Err(input.new_custom_error(()));
        }

        self.sheet.registrations.push(PropertyRegistration {
            name,
            syntax,
            inherits,
            initial_value,
        });
        Ok(())
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelRuleParser<'_> {
    type Prelude = String;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        Ok(input.slice_from(start).to_string())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let Some(selectors) = parse_selector_list(&prelude) else {
            return Err(input.new_custom_error(()));
        };
        let declarations = parse_declaration_block(input);

        self.sheet.rules.push(StyleRule {
            selector_text: normalize_selector_text(&prelude),
            selectors,
            declarations,
        });
        Ok(())
    }
}

/// Parse the declarations of a `style` attribute.
pub fn parse_style_attribute(css: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_declaration_block(&mut parser)
}

/// Parse the declarations of a `{ … }` block, dropping invalid ones.
fn parse_declaration_block(input: &mut Parser<'_, '_>) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut decl_parser = DeclarationListParser {
        declarations: &mut declarations,
    };
    for result in RuleBodyParser::new(input, &mut decl_parser) {
        if let Err((error, slice)) = result {
            log::trace!("dropped invalid declaration {slice:?}: {:?}", error.kind);
        }
    }
    declarations
}

struct DeclarationListParser<'a> {
    declarations: &'a mut Vec<Declaration>,
}

impl<'i> AtRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> DeclarationParser<'i> for DeclarationListParser<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let property = if name.starts_with("--") {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        };

        let mut value = parse_component_values(input);
        let important = strip_important(&mut value);
        if value.is_empty() && !property.starts_with("--") {
            return Err(input.new_custom_error(()));
        }

        self.declarations.push(Declaration {
            property,
            value,
            important,
        });
        Ok(())
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationListParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Remove a trailing `! important` from `value`, reporting whether it was
/// there.
fn strip_important(value: &mut Vec<ComponentValue>) -> bool {
    let n = value.len();
    if n >= 2 && value[n - 2] == ComponentValue::Delim('!') && value[n - 1].is_ident("important") {
        value.truncate(n - 2);
        true
    } else {
        false
    }
}
