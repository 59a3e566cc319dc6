//! Occurrence-count checks
//!
//! Bounds violations emit at most one structure-coded issue per element —
//! a single count cannot violate both min and max. Must-support is an
//! interoperability signal, not a conformance failure: an absent
//! must-support element is reported at information severity only.

use crate::profile::{CardinalityMax, ElementDefinition};
use crate::validator::{IssueCode, ValidationIssue};

pub(crate) fn check_bounds(
    definition: &ElementDefinition,
    count: usize,
    issues: &mut Vec<ValidationIssue>,
) {
    if count < definition.min as usize {
        issues.push(bounds_issue(definition, count));
        return;
    }

    if let CardinalityMax::Finite(max) = definition.max {
        if count > max as usize {
            issues.push(bounds_issue(definition, count));
        }
    }
}

pub(crate) fn check_must_support(
    definition: &ElementDefinition,
    count: usize,
    issues: &mut Vec<ValidationIssue>,
) {
    if definition.must_support && count == 0 {
        issues.push(
            ValidationIssue::information(
                IssueCode::Informational,
                format!(
                    "element '{}' is marked must-support but is not populated",
                    definition.path
                ),
            )
            .with_location(definition.path.clone()),
        );
    }
}

fn bounds_issue(definition: &ElementDefinition, count: usize) -> ValidationIssue {
    ValidationIssue::error(
        IssueCode::Structure,
        format!(
            "element '{}' has cardinality {}..{}, but found {} occurrence(s)",
            definition.path, definition.min, definition.max, count
        ),
    )
    .with_location(definition.path.clone())
}
