//! Deciding whether requirements hold against a rendered document.

use super::extract::{RuleCache, extract_value};
use super::requirement::{Requirement, RequirementSet};
use super::task::{Task, VerifiedTask};
use crate::preview::RenderedDocument;
use crate::units::{convert_unit_value, try_parse_unit_value};

/// Evaluates requirements, owning the rule cache for the documents it sees.
///
/// Every failure (no document yet, no matching element, no authored rule,
/// unparsable or incompatible values) evaluates to `false`.
#[derive(Debug, Default)]
pub struct Verifier {
    rules: RuleCache,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule_cache(&self) -> &RuleCache {
        &self.rules
    }

    /// True when every requirement of the set holds. An empty set holds.
    pub fn verify<D: RenderedDocument + ?Sized>(
        &mut self,
        document: Option<&D>,
        set: &RequirementSet,
    ) -> bool {
        set.requirements()
            .iter()
            .all(|requirement| self.verify_requirement(document, requirement))
    }

    pub fn verify_requirement<D: RenderedDocument + ?Sized>(
        &mut self,
        document: Option<&D>,
        requirement: &Requirement,
    ) -> bool {
        let Some(document) = document else {
            log::trace!("{requirement}: no rendered document");
            return false;
        };
        let target = requirement.target();
        let Some(element) = document.query_selector(&target.selector) else {
            log::trace!("{requirement}: no element matches");
            return false;
        };

        let actual = extract_value(document, &mut self.rules, target, element);
        if actual.is_empty() {
            log::trace!("{requirement}: no value");
            return false;
        }

        let verdict = match requirement {
            Requirement::Literal {
                expected, negated, ..
            } => (actual == *expected) != *negated,
            Requirement::Unit {
                comparator,
                expected,
                ..
            } => {
                let property = Some(target.property.as_str());
                let Some(expected) = try_parse_unit_value(expected, property) else {
                    log::trace!("{requirement}: expected value does not parse");
                    return false;
                };
                let context = document.unit_context(element, target.pseudo, &target.property);
                match convert_unit_value(&expected.unit, &actual, Some(&context), property) {
                    Some(converted) => match matrix_angle_tolerance(&actual, &expected.unit) {
                        Some(tolerance) => {
                            comparator.apply_within(converted, expected.value, tolerance)
                        }
                        None => comparator.apply(converted, expected.value),
                    },
                    None => {
                        log::trace!("{requirement}: cannot convert `{actual}` to `{}`", expected.unit);
                        false
                    }
                }
            }
        };
        log::trace!("{requirement}: actual `{actual}` -> {verdict}");
        verdict
    }

    /// Verify every task against the same document.
    pub fn verify_tasks<D: RenderedDocument + ?Sized>(
        &mut self,
        document: Option<&D>,
        tasks: &[Task],
    ) -> Vec<VerifiedTask> {
        tasks
            .iter()
            .map(|task| VerifiedTask {
                completed: self.verify(document, &task.requirement),
                task: task.clone(),
            })
            .collect()
    }
}

/// Matrix entries serialize with four decimals, so an angle read back from
/// a matrix is only good to about a hundredth of a degree.
const MATRIX_ANGLE_TOLERANCE: &str = "0.01deg";

/// Equality slack, in `unit`, for an angle recovered from a matrix.
fn matrix_angle_tolerance(actual: &str, unit: &str) -> Option<f64> {
    if !actual.trim_start().starts_with("matrix") {
        return None;
    }
    convert_unit_value(unit, MATRIX_ANGLE_TOLERANCE, None, None)
}

/// Verify a set with a fresh cache.
pub fn verify<D: RenderedDocument + ?Sized>(document: Option<&D>, set: &RequirementSet) -> bool {
    Verifier::new().verify(document, set)
}
