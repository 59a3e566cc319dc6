//! Fixed-value and pattern checks
//!
//! Both operate on the string form of values and only run when the element
//! is populated. Fixed values require exact equality; patterns require
//! substring containment of the pattern's string form within the value's.

use serde_json::Value;

use crate::profile::ElementDefinition;
use crate::validator::{IssueCode, ValidationIssue};

pub(crate) fn check(
    definition: &ElementDefinition,
    occurrences: &[&Value],
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(fixed) = &definition.fixed {
        let expected = string_form(fixed);
        for value in occurrences {
            let actual = string_form(value);
            if actual != expected {
                issues.push(
                    ValidationIssue::error(
                        IssueCode::Value,
                        format!(
                            "element '{}' must have fixed value '{}', found '{}'",
                            definition.path, expected, actual
                        ),
                    )
                    .with_location(definition.path.clone()),
                );
            }
        }
    }

    if let Some(pattern) = &definition.pattern {
        let needle = string_form(pattern);
        for value in occurrences {
            if !string_form(value).contains(&needle) {
                issues.push(
                    ValidationIssue::error(
                        IssueCode::Value,
                        format!(
                            "element '{}' does not match required pattern '{}'",
                            definition.path, needle
                        ),
                    )
                    .with_location(definition.path.clone()),
                );
            }
        }
    }
}

/// The comparison form: strings compare by their content, everything else
/// by compact JSON rendering.
fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
