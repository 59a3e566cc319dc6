//! Error types for ER7 parsing

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Parse and query errors
///
/// Parse errors are fatal to the call that raised them: a wrong delimiter
/// guess would silently corrupt every downstream boundary, so there is no
/// partial or best-effort result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("message is empty")]
    EmptyMessage,

    #[error("message does not start with the header segment tag: found '{found}'")]
    MissingHeader { found: String },

    #[error("header too short to declare delimiters: {len} characters, need 8")]
    TruncatedHeader { len: usize },

    #[error("invalid query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },
}
