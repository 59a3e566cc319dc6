//! Error types for profile loading
//!
//! These are schema-authoring errors, raised once when a profile is
//! compiled. They are distinct from [`crate::ValidationIssue`]s, which are
//! accumulated per-resource data, not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid expression for constraint '{key}' on '{path}': {source}")]
    InvalidExpression {
        key: String,
        path: String,
        #[source]
        source: cobalt_fhirpath::Error,
    },

    #[error("invalid cardinality {min}..{max} on '{path}'")]
    InvalidCardinality { path: String, min: u32, max: u32 },

    #[error("element definition with empty path")]
    EmptyPath,
}
