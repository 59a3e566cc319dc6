//! Invariant constraint evaluation
//!
//! Every constraint of every element evaluates against the resource root,
//! whether or not the element is populated — some invariants assert
//! conditional absence, so presence gating would silently disable them.

use serde_json::Value;

use crate::profile::{CompiledElement, ConstraintSeverity};
use crate::validator::{IssueCode, ValidationIssue};

pub(crate) fn check(
    element: &CompiledElement,
    resource: &Value,
    issues: &mut Vec<ValidationIssue>,
) {
    for constraint in &element.constraints {
        if constraint.expression.evaluate_boolean(resource) {
            continue;
        }

        let detail = if constraint.human.is_empty() {
            constraint.expression.text()
        } else {
            constraint.human.as_str()
        };
        let diagnostics = format!("constraint '{}' not satisfied: {}", constraint.key, detail);

        let issue = match constraint.severity {
            ConstraintSeverity::Error => ValidationIssue::error(IssueCode::Invariant, diagnostics),
            ConstraintSeverity::Warning => {
                ValidationIssue::warning(IssueCode::Invariant, diagnostics)
            }
        };
        issues.push(
            issue
                .with_location(element.definition.path.clone())
                .with_key(constraint.key.clone()),
        );
    }
}
