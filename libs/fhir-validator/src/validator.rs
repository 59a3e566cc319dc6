//! Profile validation orchestrator
//!
//! A [`Validator`] is stateless per call: each call builds a short-lived
//! run owning a fresh issue vector, so independent resources validate
//! concurrently without coordination. Issues accumulate across all
//! elements and constraints — collection never stops early, because a
//! resource legitimately carries many independent issues and callers need
//! the complete set.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::profile::{CompiledElement, CompiledProfile};
use crate::steps;
use crate::terminology::TerminologyProvider;

/// Reusable validator - owns the optional terminology capability
pub struct Validator {
    terminology: Option<Arc<dyn TerminologyProvider>>,
}

impl Validator {
    pub fn new() -> Self {
        Self { terminology: None }
    }

    pub fn with_terminology(terminology: Arc<dyn TerminologyProvider>) -> Self {
        Self {
            terminology: Some(terminology),
        }
    }

    /// Validate one resource against one compiled profile.
    pub fn validate(&self, resource: &Value, profile: &CompiledProfile) -> ValidationOutcome {
        ValidationRun::new(profile, self.terminology.as_deref(), resource).execute()
    }

    pub fn validate_batch(
        &self,
        resources: &[Value],
        profile: &CompiledProfile,
    ) -> Vec<ValidationOutcome> {
        resources
            .iter()
            .map(|r| self.validate(r, profile))
            .collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Short-lived validation execution
struct ValidationRun<'a> {
    profile: &'a CompiledProfile,
    terminology: Option<&'a dyn TerminologyProvider>,
    resource: &'a Value,
    issues: Vec<ValidationIssue>,
}

impl<'a> ValidationRun<'a> {
    fn new(
        profile: &'a CompiledProfile,
        terminology: Option<&'a dyn TerminologyProvider>,
        resource: &'a Value,
    ) -> Self {
        Self {
            profile,
            terminology,
            resource,
            issues: Vec::new(),
        }
    }

    fn execute(mut self) -> ValidationOutcome {
        let resource_type = self.get_resource_type();

        if resource_type.as_deref() != Some(self.profile.resource_type.as_str()) {
            // Element checks against the wrong shape are meaningless.
            self.issues.push(
                ValidationIssue::error(
                    IssueCode::Structure,
                    format!(
                        "resource type '{}' does not match profile type '{}'",
                        resource_type.as_deref().unwrap_or("<none>"),
                        self.profile.resource_type
                    ),
                )
                .with_location("resourceType".to_string()),
            );
            return self.finish(resource_type);
        }

        for element in &self.profile.elements {
            self.check_element(element);
        }

        self.finish(resource_type)
    }

    fn check_element(&mut self, element: &CompiledElement) {
        let occurrences = steps::element_occurrences(self.resource, &element.definition.path);

        steps::cardinality::check_bounds(&element.definition, occurrences.len(), &mut self.issues);

        // Constraints run regardless of presence; some assert conditional
        // absence.
        steps::invariants::check(element, self.resource, &mut self.issues);

        steps::cardinality::check_must_support(
            &element.definition,
            occurrences.len(),
            &mut self.issues,
        );

        if !occurrences.is_empty() {
            steps::values::check(&element.definition, &occurrences, &mut self.issues);
            steps::terminology::check(
                &element.definition,
                &occurrences,
                self.terminology,
                &mut self.issues,
            );
        }
    }

    fn finish(self, resource_type: Option<String>) -> ValidationOutcome {
        let valid = !self
            .issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error);
        debug!(
            profile = %self.profile.resource_type,
            issues = self.issues.len(),
            valid,
            "validation run finished"
        );
        ValidationOutcome {
            resource_type,
            valid,
            issues: self.issues,
        }
    }

    fn get_resource_type(&self) -> Option<String> {
        self.resource
            .get("resourceType")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

/// Validation result for a single resource
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub resource_type: Option<String>,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn to_operation_outcome(&self) -> Value {
        serde_json::json!({
            "resourceType": "OperationOutcome",
            "issue": self.issues.iter().map(|i| i.to_json()).collect::<Vec<_>>()
        })
    }
}

/// Individual validation issue
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub diagnostics: String,
    pub location: Option<String>,
    /// Key of the originating constraint, when one exists
    pub key: Option<String>,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            diagnostics,
            location: None,
            key: None,
        }
    }

    pub fn warning(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            diagnostics,
            location: None,
            key: None,
        }
    }

    pub fn information(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Information,
            code,
            diagnostics,
            location: None,
            key: None,
        }
    }

    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_key(mut self, key: String) -> Self {
        self.key = Some(key);
        self
    }

    fn to_json(&self) -> Value {
        let mut issue = serde_json::json!({
            "severity": self.severity.to_string(),
            "code": self.code.to_string(),
            "diagnostics": self.diagnostics,
        });

        if let Some(ref location) = self.location {
            issue["location"] = serde_json::json!([location]);
        }
        if let Some(ref key) = self.key {
            issue["key"] = serde_json::json!(key);
        }

        issue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
    Information,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Information => write!(f, "information"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    Invalid,
    Structure,
    Value,
    Invariant,
    CodeInvalid,
    BusinessRule,
    NotSupported,
    Informational,
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invalid => "invalid",
            Self::Structure => "structure",
            Self::Value => "value",
            Self::Invariant => "invariant",
            Self::CodeInvalid => "code-invalid",
            Self::BusinessRule => "business-rule",
            Self::NotSupported => "not-supported",
            Self::Informational => "informational",
        };
        write!(f, "{}", s)
    }
}
