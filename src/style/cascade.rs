//! CSS cascade implementation.
//!
//! Resolves which declarations apply to an element based on importance,
//! origin, specificity and source order, substitutes `var()` references and
//! produces a [`ComputedStyle`].

use std::collections::{HashMap, HashSet};

use selectors::context::SelectorCaches;

use super::compute::{ComputeContext, compute_components, compute_font_size, compute_value};
use super::parse::{
    Color, Declaration, Origin, PropertyRegistration, Stylesheet, parse_style_attribute,
};
use super::properties::{self, ValueKind};
use super::shorthand;
use super::values::{ComponentValue, to_css};
use crate::dom::{ArenaDom, NodeId, PseudoElement};

/// Environment the cascade resolves viewport and root units against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleEnvironment {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Font size of the root element before any author styles.
    pub root_font_size: f64,
}

impl Default for StyleEnvironment {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            root_font_size: 16.0,
        }
    }
}

/// Computed style of one element or pseudo-element.
#[derive(Debug, Clone)]
pub struct ComputedStyle {
    /// Longhands that differ from their initial value: cascaded ones and
    /// inherited ones.
    values: HashMap<&'static str, String>,
    custom: HashMap<String, Vec<ComponentValue>>,
    font_size: f64,
    font_weight: f64,
    color: Color,
    pseudo: bool,
}

impl ComputedStyle {
    /// Style of a root with nothing applied.
    pub fn initial(env: &StyleEnvironment) -> Self {
        Self {
            values: HashMap::new(),
            custom: HashMap::new(),
            font_size: env.root_font_size,
            font_weight: 400.0,
            color: Color::BLACK,
            pseudo: false,
        }
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_pseudo(&self) -> bool {
        self.pseudo
    }

    /// Resolved value of a custom property, if set.
    pub fn custom_property(&self, name: &str) -> Option<&[ComponentValue]> {
        self.custom.get(name).map(Vec::as_slice)
    }

    /// Serialized computed value, as `getPropertyValue` on a computed style
    /// declaration reports it. Unknown properties give `""`.
    pub fn get(&self, property: &str) -> String {
        if property.starts_with("--") {
            return self.custom.get(property).map(|v| to_css(v)).unwrap_or_default();
        }
        let property = property.to_ascii_lowercase();

        if let Some(info) = properties::longhand(&property) {
            if let ValueKind::BorderWidth(style_property) = info.kind {
                let style = self.get(style_property);
                if style == "none" || style == "hidden" {
                    return "0px".to_string();
                }
            }
            if property == "font-size" {
                return format!("{}px", crate::util::format_number(self.font_size));
            }
            return match self.values.get(info.name) {
                Some(value) => value.clone(),
                None => match properties::initial_value(info.name, self.pseudo) {
                    Some("currentcolor") => self.color.to_css_string(),
                    Some(initial) => initial.to_string(),
                    None => String::new(),
                },
            };
        }

        shorthand::serialize(&property, |longhand| Some(self.get(longhand))).unwrap_or_default()
    }
}

/// A matched declaration with ordering information for the cascade.
#[derive(Debug)]
struct MatchedDeclaration<'a> {
    declaration: &'a Declaration,
    origin: Origin,
    inline: bool,
    specificity: (u16, u16, u16),
    order: (usize, usize, usize),
}

impl MatchedDeclaration<'_> {
    /// Later sorts win.
    fn cascade_key(&self) -> (bool, u8, bool, (u16, u16, u16), (usize, usize, usize)) {
        let important = self.declaration.important;
        let origin = self.origin as u8;
        // Important declarations reverse the origin order.
        let origin = if important { 1 - origin } else { origin };
        (important, origin, self.inline, self.specificity, self.order)
    }
}

/// Applies a document's stylesheets to its elements.
pub struct Cascade<'a> {
    sheets: Vec<(&'a Stylesheet, Origin)>,
    registrations: HashMap<&'a str, &'a PropertyRegistration>,
    env: StyleEnvironment,
}

impl<'a> Cascade<'a> {
    pub fn new(sheets: Vec<(&'a Stylesheet, Origin)>, env: StyleEnvironment) -> Self {
        let registrations = sheets
            .iter()
            .flat_map(|(sheet, _)| &sheet.registrations)
            .map(|reg| (reg.name.as_str(), reg))
            .collect();
        Self {
            sheets,
            registrations,
            env,
        }
    }

    /// Compute every element's style, parents before children.
    pub fn compute_all(&self, dom: &ArenaDom) -> HashMap<NodeId, ComputedStyle> {
        let mut styles: HashMap<NodeId, ComputedStyle> = HashMap::new();
        let mut caches = SelectorCaches::default();
        let mut root_font_size = self.env.root_font_size;

        for element in dom.elements() {
            let parent = dom.parent_element(element).and_then(|p| styles.get(&p));
            let inline = dom
                .get_attr(element, "style")
                .map(parse_style_attribute)
                .unwrap_or_default();
            let matched = self.matched(dom, element, None, &inline, &mut caches);
            let style = self.compute(&matched, parent, false, root_font_size);
            if parent.is_none() {
                root_font_size = style.font_size;
            }
            styles.insert(element, style);
        }

        log::debug!("computed styles for {} elements", styles.len());
        styles
    }

    /// Compute a pseudo-element's style from its originating element's.
    pub fn compute_pseudo(
        &self,
        dom: &ArenaDom,
        element: NodeId,
        pseudo: PseudoElement,
        element_style: &ComputedStyle,
        root_font_size: f64,
    ) -> ComputedStyle {
        let mut caches = SelectorCaches::default();
        let matched = self.matched(dom, element, Some(pseudo), &[], &mut caches);
        self.compute(&matched, Some(element_style), true, root_font_size)
    }

    fn matched<'m>(
        &'m self,
        dom: &ArenaDom,
        element: NodeId,
        pseudo: Option<PseudoElement>,
        inline: &'m [Declaration],
        caches: &mut SelectorCaches,
    ) -> Vec<MatchedDeclaration<'m>> {
        let mut matched = Vec::new();

        for (sheet_index, (sheet, origin)) in self.sheets.iter().enumerate() {
            for (rule_index, rule) in sheet.rules.iter().enumerate() {
                let specificity = rule
                    .selectors
                    .iter()
                    .filter(|s| s.pseudo == pseudo && s.matches(dom, element, caches))
                    .map(|s| s.specificity())
                    .max();
                let Some(specificity) = specificity else {
                    continue;
                };
                for (decl_index, declaration) in rule.declarations.iter().enumerate() {
                    matched.push(MatchedDeclaration {
                        declaration,
                        origin: *origin,
                        inline: false,
                        specificity,
                        order: (sheet_index, rule_index, decl_index),
                    });
                }
            }
        }

        for (decl_index, declaration) in inline.iter().enumerate() {
            matched.push(MatchedDeclaration {
                declaration,
                origin: Origin::Author,
                inline: true,
                specificity: (0, 0, 0),
                order: (self.sheets.len(), 0, decl_index),
            });
        }

        matched.sort_by_key(MatchedDeclaration::cascade_key);
        matched
    }

    fn compute(
        &self,
        matched: &[MatchedDeclaration<'_>],
        parent: Option<&ComputedStyle>,
        pseudo: bool,
        root_font_size: f64,
    ) -> ComputedStyle {
        self.compute_declarations(
            matched.iter().map(|m| m.declaration),
            parent,
            pseudo,
            root_font_size,
        )
    }

    /// Compute a style from declarations already in cascade order.
    pub fn compute_declarations<'d>(
        &self,
        declarations: impl Iterator<Item = &'d Declaration> + Clone,
        parent: Option<&ComputedStyle>,
        pseudo: bool,
        root_font_size: f64,
    ) -> ComputedStyle {
        let initial = ComputedStyle::initial(&self.env);
        let parent_style = parent.unwrap_or(&initial);

        // Custom properties first: everything else may reference them.
        let mut resolver = CustomResolver::new(self, parent, declarations.clone());
        let custom = resolver.resolve_all();

        let mut specified: HashMap<&'static str, Vec<ComponentValue>> = HashMap::new();
        for declaration in declarations.filter(|d| !d.is_custom()) {
            let value = if declaration.value.iter().any(ComponentValue::references_var) {
                resolver.substitute(&declaration.value, 0)
            } else {
                Some(declaration.value.clone())
            };
            apply_declaration(&mut specified, &declaration.property, value);
        }

        let mut ctx = ComputeContext {
            font_size: parent_style.font_size,
            root_font_size,
            viewport_width: self.env.viewport_width,
            viewport_height: self.env.viewport_height,
            current_color: parent_style.color,
            parent_font_weight: parent_style.font_weight,
        };

        let mut style = ComputedStyle {
            values: parent_style
                .values
                .iter()
                .filter(|(name, _)| properties::is_inherited(name))
                .map(|(name, value)| (*name, value.clone()))
                .collect(),
            custom,
            font_size: parent_style.font_size,
            font_weight: parent_style.font_weight,
            color: parent_style.color,
            pseudo,
        };

        // font-size and color feed every other value.
        if let Some(value) = specified.remove("font-size") {
            style.font_size = match resolve_keyword("font-size", &value, parent) {
                Keyword::Inherit => parent_style.font_size,
                Keyword::Initial => self.env.root_font_size,
                Keyword::None => compute_font_size(&value, parent_style.font_size, &ctx)
                    .unwrap_or(parent_style.font_size),
            };
        }
        ctx.font_size = style.font_size;

        if let Some(value) = specified.remove("color") {
            style.color = match resolve_keyword("color", &value, parent) {
                Keyword::Inherit => parent_style.color,
                Keyword::Initial => Color::BLACK,
                Keyword::None => match value.as_slice() {
                    [v] if v.is_ident("currentcolor") => parent_style.color,
                    [v] => Color::parse(v).unwrap_or(parent_style.color),
                    _ => parent_style.color,
                },
            };
            style.values.insert("color", style.color.to_css_string());
        }
        ctx.current_color = style.color;

        for (name, value) in specified {
            let Some(info) = properties::longhand(name) else {
                continue;
            };
            match resolve_keyword(name, &value, parent) {
                Keyword::Inherit => match parent {
                    Some(parent) => {
                        style.values.insert(info.name, parent.get(info.name));
                    }
                    None => {
                        style.values.remove(info.name);
                    }
                },
                Keyword::Initial => {
                    style.values.remove(info.name);
                }
                Keyword::None => {
                    let computed = compute_value(info, &value, &ctx);
                    if name == "font-weight" {
                        style.font_weight = computed.parse().unwrap_or(style.font_weight);
                    }
                    style.values.insert(info.name, computed);
                }
            }
        }

        // Registered custom properties of a known type compute like values.
        for (name, value) in style.custom.iter_mut() {
            if let Some(reg) = self.registrations.get(name.as_str())
                && reg.syntax != "*"
            {
                *value = compute_components(value, &ctx);
            }
        }

        style
    }
}

/// Record a declaration's longhands, expanding shorthands. A value that
/// failed `var()` substitution makes its longhands `unset`.
fn apply_declaration(
    specified: &mut HashMap<&'static str, Vec<ComponentValue>>,
    property: &str,
    value: Option<Vec<ComponentValue>>,
) {
    let unset = || vec![ComponentValue::Ident("unset".to_string())];

    if let Some(info) = properties::longhand(property) {
        specified.insert(info.name, value.unwrap_or_else(unset));
        return;
    }

    let Some(longhands) = shorthand::longhands_of(property) else {
        log::trace!("ignoring unsupported property {property}");
        return;
    };
    match value.as_deref().and_then(|v| shorthand::expand(property, v)) {
        Some(expanded) => {
            for (longhand, value) in expanded {
                specified.insert(longhand, value);
            }
        }
        None if value.is_none() => {
            for longhand in longhands {
                specified.insert(longhand, unset());
            }
        }
        None => log::trace!("ignoring invalid {property} shorthand"),
    }
}

enum Keyword {
    Inherit,
    Initial,
    None,
}

/// Map CSS-wide keywords onto inherit/initial for a longhand.
fn resolve_keyword(
    property: &str,
    value: &[ComponentValue],
    parent: Option<&ComputedStyle>,
) -> Keyword {
    let [ComponentValue::Ident(keyword)] = value else {
        return Keyword::None;
    };
    let inherit = if parent.is_some() {
        Keyword::Inherit
    } else {
        Keyword::Initial
    };
    match keyword.to_ascii_lowercase().as_str() {
        "inherit" => inherit,
        "initial" => Keyword::Initial,
        "unset" | "revert" | "revert-layer" => {
            if properties::is_inherited(property) {
                inherit
            } else {
                Keyword::Initial
            }
        }
        _ => Keyword::None,
    }
}

/// Resolves custom properties and `var()` references for one element.
struct CustomResolver<'c, 'd> {
    /// Winning raw value per custom property set on this element.
    raw: HashMap<&'d str, &'d [ComponentValue]>,
    /// Values before this element's own declarations apply.
    inherited: HashMap<String, Vec<ComponentValue>>,
    registrations: &'c HashMap<&'c str, &'c PropertyRegistration>,
    resolved: HashMap<String, Option<Vec<ComponentValue>>>,
    in_progress: HashSet<String>,
}

/// Nesting limit for `var()` fallbacks.
const MAX_SUBSTITUTION_DEPTH: usize = 32;

impl<'c, 'd> CustomResolver<'c, 'd> {
    fn new(
        cascade: &'c Cascade<'_>,
        parent: Option<&ComputedStyle>,
        declarations: impl Iterator<Item = &'d Declaration>,
    ) -> Self {
        let mut raw = HashMap::new();
        for declaration in declarations.filter(|d| d.is_custom()) {
            raw.insert(declaration.property.as_str(), declaration.value.as_slice());
        }

        let mut inherited: HashMap<String, Vec<ComponentValue>> = parent
            .map(|p| {
                p.custom
                    .iter()
                    .filter(|(name, _)| {
                        cascade
                            .registrations
                            .get(name.as_str())
                            .is_none_or(|reg| reg.inherits)
                    })
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        for (name, reg) in &cascade.registrations {
            let inherits_value = reg.inherits && parent.is_some();
            if !inherits_value
                && let Some(initial) = &reg.initial_value
            {
                inherited.insert(name.to_string(), initial.clone());
            }
        }

        Self {
            raw,
            inherited,
            registrations: &cascade.registrations,
            resolved: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn resolve_all(&mut self) -> HashMap<String, Vec<ComponentValue>> {
        let names: Vec<&str> = self.raw.keys().copied().collect();
        for name in names {
            self.resolve(name);
        }

        let mut custom = self.inherited.clone();
        for (name, value) in &self.resolved {
            match value {
                Some(value) => {
                    custom.insert(name.clone(), value.clone());
                }
                None => match self.registered_initial(name) {
                    Some(initial) => {
                        custom.insert(name.clone(), initial);
                    }
                    None => {
                        custom.remove(name);
                    }
                },
            }
        }
        custom
    }

    fn registered_initial(&self, name: &str) -> Option<Vec<ComponentValue>> {
        self.registrations
            .get(name)
            .and_then(|reg| reg.initial_value.clone())
    }

    /// Value of a custom property on this element; `None` when it is the
    /// guaranteed-invalid value.
    fn resolve(&mut self, name: &str) -> Option<Vec<ComponentValue>> {
        if let Some(value) = self.resolved.get(name) {
            return value.clone();
        }
        let Some(raw) = self.raw.get(name).copied() else {
            return self.inherited.get(name).cloned();
        };
        if !self.in_progress.insert(name.to_string()) {
            log::debug!("custom property cycle through {name}");
            return None;
        }

        let value = match raw {
            [keyword] if keyword.is_ident("inherit") || keyword.is_ident("unset") => {
                self.inherited.get(name).cloned()
            }
            [keyword] if keyword.is_ident("initial") => self.registered_initial(name),
            _ => self.substitute(raw, 0),
        };

        self.in_progress.remove(name);
        self.resolved.insert(name.to_string(), value.clone());
        value
    }

    /// Replace every `var()` in `values`. `None` when a reference has no
    /// value and no fallback.
    fn substitute(
        &mut self,
        values: &[ComponentValue],
        depth: usize,
    ) -> Option<Vec<ComponentValue>> {
        if depth > MAX_SUBSTITUTION_DEPTH {
            return None;
        }
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match value {
                ComponentValue::Function(name, args) if name == "var" => {
                    let comma = args.iter().position(|a| *a == ComponentValue::Comma);
                    let (reference, fallback) = match comma {
                        Some(comma) => (&args[..comma], Some(&args[comma + 1..])),
                        None => (&args[..], None),
                    };
                    let [ComponentValue::Ident(reference)] = reference else {
                        return None;
                    };
                    match self.resolve(reference) {
                        Some(resolved) => out.extend(resolved),
                        None => out.extend(self.substitute(fallback?, depth + 1)?),
                    }
                }
                ComponentValue::Function(name, args) => {
                    out.push(ComponentValue::Function(
                        name.clone(),
                        self.substitute(args, depth + 1)?,
                    ));
                }
                ComponentValue::Parens(inner) => {
                    out.push(ComponentValue::Parens(self.substitute(inner, depth + 1)?));
                }
                _ => out.push(value.clone()),
            }
        }
        Some(out)
    }
}
