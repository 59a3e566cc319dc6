//! The injected terminology capability
//!
//! Binding checks delegate to a caller-provided service answering "is code
//! C in system S a member of value set V". The capability is an explicit
//! optional handle passed at validator construction; when none is
//! configured, binding checks are skipped entirely rather than failing.
//! The core treats the call as a synchronous boundary and adds no
//! timeouts, retries or caching — those policies belong to the
//! implementation behind the trait.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("terminology service failure: {0}")]
pub struct TerminologyError(pub String);

/// Value-set membership lookup
pub trait TerminologyProvider: Send + Sync {
    /// Whether `code` (optionally qualified by `system`) is a member of
    /// the value set identified by `value_set`.
    fn validate_code(
        &self,
        value_set: &str,
        system: Option<&str>,
        code: &str,
    ) -> Result<bool, TerminologyError>;
}
