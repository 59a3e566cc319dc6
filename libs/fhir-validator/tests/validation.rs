//! End-to-end validation suite
//!
//! Exercises the orchestrator against in-test profiles: cardinality,
//! constraint independence from presence, binding severity mapping, and
//! the determinism of repeated runs.

use std::sync::Arc;

use cobalt_validator::{
    CompiledProfile, IssueCode, IssueSeverity, Profile, TerminologyError, TerminologyProvider,
    Validator,
};
use serde_json::{json, Value};

fn compile(value: Value) -> CompiledProfile {
    let profile: Profile = serde_json::from_value(value).unwrap();
    profile.compile().unwrap()
}

/// Membership stub: a fixed list of (value set, code) pairs.
struct StaticValueSets {
    members: Vec<(&'static str, &'static str)>,
}

impl TerminologyProvider for StaticValueSets {
    fn validate_code(
        &self,
        value_set: &str,
        _system: Option<&str>,
        code: &str,
    ) -> Result<bool, TerminologyError> {
        Ok(self
            .members
            .iter()
            .any(|(vs, c)| *vs == value_set && *c == code))
    }
}

/// A provider that always fails, for the degraded-service path.
struct BrokenTerminology;

impl TerminologyProvider for BrokenTerminology {
    fn validate_code(
        &self,
        _value_set: &str,
        _system: Option<&str>,
        _code: &str,
    ) -> Result<bool, TerminologyError> {
        Err(TerminologyError("connection refused".to_string()))
    }
}

fn observation_status_profile() -> CompiledProfile {
    compile(json!({
        "resourceType": "Observation",
        "elements": [
            { "path": "Observation.status", "min": 1, "max": "1" }
        ]
    }))
}

#[test]
fn test_resource_type_mismatch_stops_element_checks() {
    let profile = observation_status_profile();
    let outcome = Validator::new().validate(&json!({ "resourceType": "Patient" }), &profile);

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].code, IssueCode::Structure);
    assert!(outcome.has_errors());
}

#[test]
fn test_missing_resource_type_is_a_mismatch() {
    let profile = observation_status_profile();
    let outcome = Validator::new().validate(&json!({ "status": "final" }), &profile);

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].code, IssueCode::Structure);
}

#[test]
fn test_required_scalar_cardinality() {
    let profile = observation_status_profile();
    let validator = Validator::new();

    // count = 0: exactly one error
    let absent = validator.validate(&json!({ "resourceType": "Observation" }), &profile);
    assert_eq!(absent.error_count(), 1);

    // count = 2: exactly one error
    let repeated = validator.validate(
        &json!({ "resourceType": "Observation", "status": ["final", "draft"] }),
        &profile,
    );
    assert_eq!(repeated.error_count(), 1);

    // count = 1: none
    let scalar = validator.validate(
        &json!({ "resourceType": "Observation", "status": "final" }),
        &profile,
    );
    assert!(scalar.issues.is_empty());
    assert!(scalar.valid);
}

#[test]
fn test_constraints_evaluate_regardless_of_presence() {
    let profile = compile(json!({
        "resourceType": "Observation",
        "elements": [{
            "path": "Observation.component",
            "constraints": [{
                "key": "obs-3",
                "human": "component is self-consistent",
                "expression": "component.empty() or component.exists()",
                "severity": "error"
            }]
        }]
    }));
    let validator = Validator::new();

    let absent = validator.validate(&json!({ "resourceType": "Observation" }), &profile);
    assert!(absent.issues.is_empty());

    let present = validator.validate(
        &json!({ "resourceType": "Observation", "component": [{ "code": "x" }] }),
        &profile,
    );
    assert!(present.issues.is_empty());
}

#[test]
fn test_conditional_absence_constraint_fires_on_absent_element() {
    // Zero cardinality skips value checks but never constraint evaluation.
    let profile = compile(json!({
        "resourceType": "Observation",
        "elements": [{
            "path": "Observation.value",
            "constraints": [{
                "key": "obs-6",
                "human": "entered-in-error observations carry no value",
                "expression": "status = 'entered-in-error' implies value.empty()",
                "severity": "error"
            }]
        }]
    }));
    let validator = Validator::new();

    let clean = validator.validate(
        &json!({ "resourceType": "Observation", "status": "entered-in-error" }),
        &profile,
    );
    assert!(clean.issues.is_empty());

    let dirty = validator.validate(
        &json!({ "resourceType": "Observation", "status": "entered-in-error", "value": 5 }),
        &profile,
    );
    assert_eq!(dirty.error_count(), 1);
    assert_eq!(dirty.issues[0].code, IssueCode::Invariant);
    assert_eq!(dirty.issues[0].key.as_deref(), Some("obs-6"));
}

#[test]
fn test_warning_constraints_do_not_invalidate() {
    let profile = compile(json!({
        "resourceType": "Observation",
        "elements": [{
            "path": "Observation.note",
            "constraints": [{
                "key": "obs-w1",
                "human": "notes should exist",
                "expression": "note.exists()",
                "severity": "warning"
            }]
        }]
    }));

    let outcome = Validator::new().validate(&json!({ "resourceType": "Observation" }), &profile);
    assert!(outcome.valid);
    assert_eq!(outcome.warning_count(), 1);
}

#[test]
fn test_must_support_absence_is_informational_only() {
    let profile = compile(json!({
        "resourceType": "Patient",
        "elements": [
            { "path": "Patient.birthDate", "mustSupport": true }
        ]
    }));

    let outcome = Validator::new().validate(&json!({ "resourceType": "Patient" }), &profile);
    assert!(outcome.valid);
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].severity, IssueSeverity::Information);
}

#[test]
fn test_fixed_value_checked_only_when_present() {
    let profile = compile(json!({
        "resourceType": "Observation",
        "elements": [
            { "path": "Observation.status", "fixed": "final" }
        ]
    }));
    let validator = Validator::new();

    let absent = validator.validate(&json!({ "resourceType": "Observation" }), &profile);
    assert!(absent.issues.is_empty());

    let wrong = validator.validate(
        &json!({ "resourceType": "Observation", "status": "draft" }),
        &profile,
    );
    assert_eq!(wrong.error_count(), 1);
    assert_eq!(wrong.issues[0].code, IssueCode::Value);
}

fn binding_profile(strength: &str) -> CompiledProfile {
    compile(json!({
        "resourceType": "Observation",
        "elements": [{
            "path": "Observation.status",
            "binding": {
                "strength": strength,
                "valueSet": "http://hl7.org/fhir/ValueSet/observation-status"
            }
        }]
    }))
}

fn terminology() -> Arc<dyn TerminologyProvider> {
    Arc::new(StaticValueSets {
        members: vec![
            ("http://hl7.org/fhir/ValueSet/observation-status", "final"),
            ("http://hl7.org/fhir/ValueSet/observation-status", "draft"),
        ],
    })
}

#[test]
fn test_binding_severity_follows_strength() {
    let resource = json!({ "resourceType": "Observation", "status": "bogus" });

    let required = Validator::with_terminology(terminology())
        .validate(&resource, &binding_profile("required"));
    assert_eq!(required.error_count(), 1);
    assert_eq!(required.issues[0].code, IssueCode::CodeInvalid);

    let extensible = Validator::with_terminology(terminology())
        .validate(&resource, &binding_profile("extensible"));
    assert!(extensible.valid);
    assert_eq!(extensible.warning_count(), 1);

    let preferred = Validator::with_terminology(terminology())
        .validate(&resource, &binding_profile("preferred"));
    assert!(preferred.valid);
    assert_eq!(preferred.issues.len(), 1);
    assert_eq!(preferred.issues[0].severity, IssueSeverity::Information);

    let example = Validator::with_terminology(terminology())
        .validate(&resource, &binding_profile("example"));
    assert!(example.issues.is_empty());
}

#[test]
fn test_member_code_passes_required_binding() {
    let resource = json!({ "resourceType": "Observation", "status": "final" });
    let outcome =
        Validator::with_terminology(terminology()).validate(&resource, &binding_profile("required"));
    assert!(outcome.issues.is_empty());
}

#[test]
fn test_binding_skipped_without_provider() {
    let resource = json!({ "resourceType": "Observation", "status": "bogus" });
    let outcome = Validator::new().validate(&resource, &binding_profile("required"));
    assert!(outcome.issues.is_empty());
}

#[test]
fn test_provider_failure_yields_warning_not_verdict() {
    let resource = json!({ "resourceType": "Observation", "status": "final" });
    let outcome = Validator::with_terminology(Arc::new(BrokenTerminology))
        .validate(&resource, &binding_profile("required"));

    assert!(outcome.valid);
    assert_eq!(outcome.warning_count(), 1);
    assert_eq!(outcome.issues[0].code, IssueCode::NotSupported);
}

#[test]
fn test_issues_accumulate_without_early_return() {
    let profile = compile(json!({
        "resourceType": "Observation",
        "elements": [
            { "path": "Observation.status", "min": 1, "max": "1", "fixed": "final" },
            { "path": "Observation.code", "min": 1, "max": "1" },
            {
                "path": "Observation.subject",
                "constraints": [{
                    "key": "obs-s1",
                    "human": "subject is required here",
                    "expression": "subject.exists()",
                    "severity": "error"
                }]
            }
        ]
    }));

    // status wrong, code missing, subject missing: three independent errors
    let outcome = Validator::new().validate(
        &json!({ "resourceType": "Observation", "status": "draft" }),
        &profile,
    );
    assert_eq!(outcome.error_count(), 3);

    let codes: Vec<IssueCode> = outcome.issues.iter().map(|i| i.code).collect();
    assert_eq!(
        codes,
        vec![IssueCode::Value, IssueCode::Structure, IssueCode::Invariant]
    );
}

#[test]
fn test_repeated_runs_are_deterministic() {
    let profile = compile(json!({
        "resourceType": "Observation",
        "elements": [
            { "path": "Observation.status", "min": 1, "max": "1" },
            { "path": "Observation.category", "mustSupport": true },
            {
                "path": "Observation.value",
                "constraints": [{
                    "key": "obs-v1",
                    "human": "numeric values stay positive",
                    "expression": "value.exists() implies value > 0",
                    "severity": "warning"
                }]
            }
        ]
    }));
    let resource = json!({ "resourceType": "Observation", "value": -3 });
    let validator = Validator::new();

    let first = validator.validate(&resource, &profile);
    for _ in 0..5 {
        assert_eq!(validator.validate(&resource, &profile), first);
    }
}

#[test]
fn test_batch_validation_isolates_runs() {
    let profile = observation_status_profile();
    let resources = vec![
        json!({ "resourceType": "Observation", "status": "final" }),
        json!({ "resourceType": "Observation" }),
    ];

    let outcomes = Validator::new().validate_batch(&resources, &profile);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].issues.is_empty());
    assert_eq!(outcomes[1].error_count(), 1);
}
