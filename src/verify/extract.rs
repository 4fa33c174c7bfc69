//! Reading the value a requirement inspects.

use std::collections::HashMap;

use super::requirement::{Source, Target};
use crate::dom::{NodeId, normalize_selector_text};
use crate::preview::RenderedDocument;
use crate::style::{ComponentValue, StyleRule, shorthand};

/// Index of the user stylesheet's rules by selector text, valid for one
/// document revision.
///
/// Holds rule positions rather than references, and rebuilds itself the
/// first time it sees a different revision.
#[derive(Debug, Default)]
pub struct RuleCache {
    revision: Option<u64>,
    by_selector: HashMap<String, usize>,
    rebuilds: usize,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the index has been built.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    fn refresh<D: RenderedDocument + ?Sized>(&mut self, document: &D) {
        if self.revision == Some(document.revision()) {
            return;
        }
        self.by_selector.clear();
        if let Some(sheet) = document.user_stylesheet() {
            for (index, rule) in sheet.rules.iter().enumerate() {
                self.by_selector
                    .entry(rule.selector_text.clone())
                    .or_insert(index);
            }
        }
        self.revision = Some(document.revision());
        self.rebuilds += 1;
        log::debug!(
            "indexed {} user rules for revision {}",
            self.by_selector.len(),
            document.revision()
        );
    }

    /// First user rule whose selector text matches `selector_text`.
    pub fn rule<'d, D: RenderedDocument + ?Sized>(
        &mut self,
        document: &'d D,
        selector_text: &str,
    ) -> Option<&'d StyleRule> {
        self.refresh(document);
        let index = *self.by_selector.get(&normalize_selector_text(selector_text))?;
        document.user_stylesheet()?.rules.get(index)
    }
}

/// The value `target` names on `element`, or `""` when there is none.
pub fn extract_value<D: RenderedDocument + ?Sized>(
    document: &D,
    cache: &mut RuleCache,
    target: &Target,
    element: NodeId,
) -> String {
    match target.source {
        Source::Computed => document.computed_value(element, target.pseudo, &target.property),
        Source::Exact => {
            let mut selector = target.selector.clone();
            if let Some(pseudo) = target.pseudo {
                selector.push_str(pseudo.as_str());
            }
            cache
                .rule(document, &selector)
                .map(|rule| authored_value(rule, &target.property))
                .unwrap_or_default()
        }
    }
}

/// A property's value as written in one rule, the way CSSOM
/// `style.getPropertyValue` reads it: shorthands set their longhands,
/// shorthands are recombined from longhands, `!important` wins.
pub fn authored_value(rule: &StyleRule, property: &str) -> String {
    if property.starts_with("--") {
        return rule
            .declared(property)
            .map(|d| d.value_text())
            .unwrap_or_default();
    }
    let property = property.to_ascii_lowercase();

    // Shorthands holding var() cannot be split until computed time.
    if let Some(declaration) = rule.declared(&property)
        && declaration.value.iter().any(ComponentValue::references_var)
    {
        return declaration.value_text();
    }

    let longhands = declared_longhands(rule);
    if shorthand::is_shorthand(&property) {
        return shorthand::serialize(&property, |longhand| {
            longhands
                .get(longhand)
                .filter(|(value, _)| !value.is_empty())
                .map(|(value, _)| value.clone())
        })
        .unwrap_or_default();
    }
    longhands
        .get(property.as_str())
        .map(|(value, _)| value.clone())
        .unwrap_or_default()
}

/// Longhand values a rule declares, with their importance.
fn declared_longhands(rule: &StyleRule) -> HashMap<String, (String, bool)> {
    let mut longhands: HashMap<String, (String, bool)> = HashMap::new();
    let mut set = |name: &str, value: String, important: bool| {
        let overridden = longhands
            .get(name)
            .is_some_and(|(_, was_important)| *was_important && !important);
        if !overridden {
            longhands.insert(name.to_string(), (value, important));
        }
    };

    for declaration in rule.declarations.iter().filter(|d| !d.is_custom()) {
        let name = declaration.property.as_str();
        if !shorthand::is_shorthand(name) {
            set(name, declaration.value_text(), declaration.important);
            continue;
        }
        let references_var = declaration.value.iter().any(ComponentValue::references_var);
        match shorthand::expand(name, &declaration.value) {
            Some(parts) if !references_var => {
                for (longhand, value) in parts {
                    set(longhand, crate::style::to_css(&value), declaration.important);
                }
            }
            // Pending substitution: the longhands read as empty.
            _ => {
                for &longhand in shorthand::longhands_of(name).unwrap_or_default() {
                    set(longhand, String::new(), declaration.important);
                }
            }
        }
    }
    longhands
}
