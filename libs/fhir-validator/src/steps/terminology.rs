//! Binding checks via the injected terminology capability
//!
//! Runs only when the element is populated AND a provider is configured:
//! an absent optional collaborator must never manufacture a false
//! positive. A non-member code maps to severity by binding strength; a
//! provider failure yields a single warning and no membership verdict.

use serde_json::Value;

use crate::profile::{Binding, BindingStrength, ElementDefinition};
use crate::terminology::TerminologyProvider;
use crate::validator::{IssueCode, ValidationIssue};

pub(crate) fn check(
    definition: &ElementDefinition,
    occurrences: &[&Value],
    provider: Option<&dyn TerminologyProvider>,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(binding) = &definition.binding else {
        return;
    };
    let Some(provider) = provider else {
        return;
    };

    for value in occurrences {
        check_value(definition, binding, value, provider, issues);
    }
}

fn check_value(
    definition: &ElementDefinition,
    binding: &Binding,
    value: &Value,
    provider: &dyn TerminologyProvider,
    issues: &mut Vec<ValidationIssue>,
) {
    let codings = extract_codings(value);
    if codings.is_empty() {
        return;
    }

    for (system, code) in &codings {
        match provider.validate_code(&binding.value_set, system.as_deref(), code) {
            Ok(true) => return,
            Ok(false) => {}
            Err(err) => {
                issues.push(
                    ValidationIssue::warning(
                        IssueCode::NotSupported,
                        format!(
                            "could not check binding of '{}' against '{}': {err}",
                            definition.path, binding.value_set
                        ),
                    )
                    .with_location(definition.path.clone()),
                );
                return;
            }
        }
    }

    let (_, code) = &codings[0];
    let diagnostics = format!(
        "code '{}' is not in value set '{}' (binding strength: {:?})",
        code, binding.value_set, binding.strength
    );
    let issue = match binding.strength {
        BindingStrength::Required => ValidationIssue::error(IssueCode::CodeInvalid, diagnostics),
        BindingStrength::Extensible => {
            ValidationIssue::warning(IssueCode::CodeInvalid, diagnostics)
        }
        BindingStrength::Preferred => {
            ValidationIssue::information(IssueCode::Informational, diagnostics)
        }
        BindingStrength::Example => return,
    };
    issues.push(issue.with_location(definition.path.clone()));
}

/// The codings carried by a coded value: a bare code string, a coding
/// object with `code`/`system`, or a concept wrapping a `coding` array.
fn extract_codings(value: &Value) -> Vec<(Option<String>, String)> {
    match value {
        Value::String(code) => vec![(None, code.clone())],
        Value::Object(obj) => match obj.get("coding").and_then(Value::as_array) {
            Some(codings) => codings.iter().filter_map(coding_pair).collect(),
            None => coding_pair(value).into_iter().collect(),
        },
        _ => Vec::new(),
    }
}

fn coding_pair(value: &Value) -> Option<(Option<String>, String)> {
    let code = value.get("code")?.as_str()?.to_string();
    let system = value
        .get("system")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some((system, code))
}
