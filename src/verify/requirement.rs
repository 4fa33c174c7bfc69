//! Requirement model.
//!
//! Requirements arrive as flat JSON objects:
//!
//! ```json
//! { "type": "unit", "selector": ".ball", "property": "width",
//!   "comparator": ">=", "value": "100px" }
//! ```
//!
//! and are validated into [`Requirement`], where each kind carries only the
//! fields that mean something for it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::PseudoElement;
use crate::util::approx_eq;

/// Ordering test for unit requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[default]
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl Comparator {
    /// Compare converted magnitudes. Equality is tolerant of conversion
    /// rounding.
    pub fn apply(self, actual: f64, expected: f64) -> bool {
        self.compare(actual, expected, approx_eq(actual, expected))
    }

    /// Like [`apply`](Self::apply), also treating magnitudes at most
    /// `tolerance` apart as equal.
    pub fn apply_within(self, actual: f64, expected: f64, tolerance: f64) -> bool {
        let equal = approx_eq(actual, expected) || (actual - expected).abs() <= tolerance;
        self.compare(actual, expected, equal)
    }

    fn compare(self, actual: f64, expected: f64, equal: bool) -> bool {
        match self {
            Self::Greater => actual > expected && !equal,
            Self::GreaterOrEqual => actual > expected || equal,
            Self::Less => actual < expected && !equal,
            Self::LessOrEqual => actual < expected || equal,
            Self::Equal => equal,
            Self::NotEqual => !equal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a requirement reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The value as authored in the user's stylesheet rule.
    Exact,
    /// The value after cascade and computation.
    #[default]
    Computed,
}

/// What a requirement inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub selector: String,
    pub pseudo: Option<PseudoElement>,
    pub property: String,
    pub source: Source,
}

impl Target {
    pub fn new(selector: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            pseudo: None,
            property: property.into(),
            source: Source::Computed,
        }
    }
}

/// One declarative check against one property of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequirement", into = "RawRequirement")]
pub enum Requirement {
    /// Exact string (in)equality.
    Literal {
        target: Target,
        expected: String,
        negated: bool,
    },
    /// Numeric comparison after converting into the expected value's unit.
    Unit {
        target: Target,
        comparator: Comparator,
        expected: String,
    },
}

impl Requirement {
    pub fn literal(
        selector: impl Into<String>,
        property: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::Literal {
            target: Target::new(selector, property),
            expected: expected.into(),
            negated: false,
        }
    }

    pub fn unit(
        selector: impl Into<String>,
        property: impl Into<String>,
        comparator: Comparator,
        expected: impl Into<String>,
    ) -> Self {
        Self::Unit {
            target: Target::new(selector, property),
            comparator,
            expected: expected.into(),
        }
    }

    /// Read the authored value instead of the computed one.
    pub fn exact(mut self) -> Self {
        self.target_mut().source = Source::Exact;
        self
    }

    pub fn on_pseudo(mut self, pseudo: PseudoElement) -> Self {
        self.target_mut().pseudo = Some(pseudo);
        self
    }

    /// Turn a literal equality check into an inequality check.
    pub fn negate(mut self) -> Self {
        if let Self::Literal { negated, .. } = &mut self {
            *negated = !*negated;
        }
        self
    }

    pub fn target(&self) -> &Target {
        match self {
            Self::Literal { target, .. } | Self::Unit { target, .. } => target,
        }
    }

    fn target_mut(&mut self) -> &mut Target {
        match self {
            Self::Literal { target, .. } | Self::Unit { target, .. } => target,
        }
    }

    pub fn expected(&self) -> &str {
        match self {
            Self::Literal { expected, .. } | Self::Unit { expected, .. } => expected,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target();
        write!(f, "{}", target.selector)?;
        if let Some(pseudo) = target.pseudo {
            write!(f, "{pseudo}")?;
        }
        let comparator = match self {
            Self::Literal { negated: false, .. } => Comparator::Equal,
            Self::Literal { negated: true, .. } => Comparator::NotEqual,
            Self::Unit { comparator, .. } => *comparator,
        };
        write!(f, " {{ {} {comparator} {} }}", target.property, self.expected())?;
        if target.source == Source::Exact {
            f.write_str(" (authored)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RequirementKind {
    Literal,
    Unit,
}

/// Wire form of a requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRequirement {
    #[serde(rename = "type")]
    kind: RequirementKind,
    selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pseudo_selector: Option<PseudoElement>,
    property: String,
    #[serde(default)]
    source: Source,
    #[serde(default)]
    comparator: Comparator,
    value: String,
}

impl TryFrom<RawRequirement> for Requirement {
    type Error = String;

    fn try_from(raw: RawRequirement) -> Result<Self, Self::Error> {
        if raw.selector.trim().is_empty() {
            return Err("requirement selector is empty".to_string());
        }
        if raw.property.trim().is_empty() {
            return Err("requirement property is empty".to_string());
        }
        let property = if raw.property.starts_with("--") {
            raw.property
        } else {
            raw.property.trim().to_ascii_lowercase()
        };
        let target = Target {
            selector: raw.selector,
            pseudo: raw.pseudo_selector,
            property,
            source: raw.source,
        };
        match raw.kind {
            RequirementKind::Literal if !raw.comparator.is_equality() => Err(format!(
                "literal requirement on `{}` cannot use comparator `{}`",
                target.property, raw.comparator
            )),
            RequirementKind::Literal => Ok(Self::Literal {
                target,
                expected: raw.value,
                negated: raw.comparator == Comparator::NotEqual,
            }),
            RequirementKind::Unit => Ok(Self::Unit {
                target,
                comparator: raw.comparator,
                expected: raw.value,
            }),
        }
    }
}

impl From<Requirement> for RawRequirement {
    fn from(requirement: Requirement) -> Self {
        let (kind, target, comparator, value) = match requirement {
            Requirement::Literal {
                target,
                expected,
                negated,
            } => {
                let comparator = if negated {
                    Comparator::NotEqual
                } else {
                    Comparator::Equal
                };
                (RequirementKind::Literal, target, comparator, expected)
            }
            Requirement::Unit {
                target,
                comparator,
                expected,
            } => (RequirementKind::Unit, target, comparator, expected),
        };
        Self {
            kind,
            selector: target.selector,
            pseudo_selector: target.pseudo,
            property: target.property,
            source: target.source,
            comparator,
            value,
        }
    }
}

/// Requirements that must all hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequirementSet", into = "RawRequirementSet")]
pub enum RequirementSet {
    Single(Requirement),
    All(Vec<Requirement>),
}

impl RequirementSet {
    pub fn requirements(&self) -> &[Requirement] {
        match self {
            Self::Single(requirement) => std::slice::from_ref(requirement),
            Self::All(requirements) => requirements,
        }
    }
}

impl From<Requirement> for RequirementSet {
    fn from(requirement: Requirement) -> Self {
        Self::Single(requirement)
    }
}

impl From<Vec<Requirement>> for RequirementSet {
    fn from(requirements: Vec<Requirement>) -> Self {
        Self::All(requirements)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRequirementSet {
    Single(Requirement),
    All(Vec<Requirement>),
}

impl TryFrom<RawRequirementSet> for RequirementSet {
    type Error = String;

    fn try_from(raw: RawRequirementSet) -> Result<Self, Self::Error> {
        match raw {
            RawRequirementSet::Single(requirement) => Ok(Self::Single(requirement)),
            RawRequirementSet::All(requirements) if requirements.is_empty() => {
                Err("requirement set is empty".to_string())
            }
            RawRequirementSet::All(requirements) => Ok(Self::All(requirements)),
        }
    }
}

impl From<RequirementSet> for RawRequirementSet {
    fn from(set: RequirementSet) -> Self {
        match set {
            RequirementSet::Single(requirement) => Self::Single(requirement),
            RequirementSet::All(requirements) => Self::All(requirements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_unit() {
        let requirement: Requirement = serde_json::from_str(
            r#"{"type": "unit", "selector": ".ball", "property": "width",
                "comparator": ">=", "value": "100px"}"#,
        )
        .unwrap();
        assert_eq!(
            requirement,
            Requirement::unit(".ball", "width", Comparator::GreaterOrEqual, "100px")
        );
    }

    #[test]
    fn test_deserialize_defaults() {
        let requirement: Requirement = serde_json::from_str(
            r##"{"type": "literal", "selector": "#card", "pseudoSelector": "::before",
                "property": "Z-Index", "value": "-1"}"##,
        )
        .unwrap();
        let target = requirement.target();
        assert_eq!(target.source, Source::Computed);
        assert_eq!(target.pseudo, Some(PseudoElement::Before));
        assert_eq!(target.property, "z-index");
        assert!(matches!(requirement, Requirement::Literal { negated: false, .. }));
    }

    #[test]
    fn test_literal_not_equal() {
        let requirement: Requirement = serde_json::from_str(
            r##"{"type": "literal", "selector": "#a", "property": "display",
                "comparator": "!=", "value": "none", "source": "exact"}"##,
        )
        .unwrap();
        assert_eq!(
            requirement,
            Requirement::literal("#a", "display", "none").exact().negate()
        );
    }

    #[test]
    fn test_rejects_invalid_requirements() {
        let ordering_literal = r#"{"type": "literal", "selector": "a", "property": "display",
            "comparator": ">", "value": "block"}"#;
        assert!(serde_json::from_str::<Requirement>(ordering_literal).is_err());

        let legacy = r#"{"type": "property", "selector": "a", "property": "width",
            "comparator": ">", "value": "1px"}"#;
        assert!(serde_json::from_str::<Requirement>(legacy).is_err());

        let pseudo = r#"{"type": "unit", "selector": "a", "pseudoSelector": "::marker",
            "property": "width", "value": "1px"}"#;
        assert!(serde_json::from_str::<Requirement>(pseudo).is_err());

        let empty_selector = r#"{"type": "unit", "selector": " ", "property": "width",
            "value": "1px"}"#;
        assert!(serde_json::from_str::<Requirement>(empty_selector).is_err());
    }

    #[test]
    fn test_requirement_sets() {
        let single: RequirementSet = serde_json::from_str(
            r#"{"type": "unit", "selector": "a", "property": "width", "value": "1px"}"#,
        )
        .unwrap();
        assert_eq!(single.requirements().len(), 1);

        let all: RequirementSet = serde_json::from_str(
            r#"[{"type": "unit", "selector": "a", "property": "width", "value": "1px"},
                {"type": "literal", "selector": "a", "property": "display", "value": "flex"}]"#,
        )
        .unwrap();
        assert_eq!(all.requirements().len(), 2);

        assert!(serde_json::from_str::<RequirementSet>("[]").is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let requirement = Requirement::literal("#card", "z-index", "-1")
            .on_pseudo(PseudoElement::Before);
        let json = serde_json::to_value(&requirement).unwrap();
        assert_eq!(json["type"], "literal");
        assert_eq!(json["pseudoSelector"], "::before");
        assert_eq!(json["comparator"], "==");
        let back: Requirement = serde_json::from_value(json).unwrap();
        assert_eq!(back, requirement);
    }

    #[test]
    fn test_comparator_apply() {
        assert!(Comparator::GreaterOrEqual.apply(150.0, 100.0));
        assert!(!Comparator::GreaterOrEqual.apply(99.0, 100.0));
        assert!(Comparator::GreaterOrEqual.apply(100.0 - 1e-9, 100.0));
        assert!(!Comparator::Greater.apply(100.0 + 1e-9, 100.0));
        assert!(Comparator::Less.apply(1.0, 2.0));
        assert!(Comparator::Equal.apply(0.1 + 0.2, 0.3));
        assert!(Comparator::NotEqual.apply(1.0, 2.0));
    }

    #[test]
    fn test_comparator_apply_within() {
        assert!(!Comparator::Equal.apply(45.0015, 45.0));
        assert!(Comparator::Equal.apply_within(45.0015, 45.0, 0.01));
        assert!(!Comparator::Greater.apply_within(45.0015, 45.0, 0.01));
        assert!(Comparator::LessOrEqual.apply_within(45.0015, 45.0, 0.01));
        assert!(!Comparator::Equal.apply_within(45.1, 45.0, 0.01));
        assert!(Comparator::NotEqual.apply_within(45.1, 45.0, 0.01));
    }

    #[test]
    fn test_display() {
        let requirement = Requirement::unit(".ball", "width", Comparator::GreaterOrEqual, "100px");
        assert_eq!(requirement.to_string(), ".ball { width >= 100px }");
    }
}
