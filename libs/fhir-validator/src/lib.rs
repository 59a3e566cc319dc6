//! Profile validation engine
//!
//! Validates health-record resources - represented as generic value trees -
//! against machine-readable profiles: cardinality bounds, fixed and
//! pattern values, terminology bindings, and invariant constraints written
//! in the expression language of [`cobalt_fhirpath`].
//!
//! Profiles compile once ([`Profile::compile`]), surfacing
//! schema-authoring defects at load time; validation runs are then pure
//! functions producing an ordered [`ValidationOutcome`]. An empty issue
//! list implies conformance; accept/reject policy stays with the caller.
//!
//! ```
//! use cobalt_validator::{Profile, Validator};
//! use serde_json::json;
//!
//! let profile: Profile = serde_json::from_value(json!({
//!     "resourceType": "Observation",
//!     "elements": [
//!         { "path": "Observation.status", "min": 1, "max": "1" }
//!     ]
//! })).unwrap();
//! let profile = profile.compile().unwrap();
//!
//! let outcome = Validator::new()
//!     .validate(&json!({ "resourceType": "Observation" }), &profile);
//! assert_eq!(outcome.error_count(), 1);
//! ```

pub mod error;
pub mod profile;
mod steps;
pub mod terminology;
pub mod validator;

pub use error::ProfileError;
pub use profile::{
    Binding, BindingStrength, CardinalityMax, CompiledConstraint, CompiledElement,
    CompiledProfile, Constraint, ConstraintSeverity, ElementDefinition, Profile,
};
pub use terminology::{TerminologyError, TerminologyProvider};
pub use validator::{IssueCode, IssueSeverity, ValidationIssue, ValidationOutcome, Validator};
