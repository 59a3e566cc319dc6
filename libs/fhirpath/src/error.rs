//! Error types for the expression engine

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Expression compilation errors
///
/// A malformed expression is a schema-authoring defect: it surfaces once,
/// when the expression is compiled, never per evaluated resource.
/// Evaluation itself is total — absent data yields empty results, not
/// errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("function not found: {0}")]
    FunctionNotFound(String),
}
