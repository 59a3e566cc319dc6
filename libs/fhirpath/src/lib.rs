//! Invariant expression engine
//!
//! The boolean expression language profile constraints are written in:
//! path navigation, existence and emptiness predicates, scalar comparison,
//! boolean combinators, membership, and literals, evaluated against a
//! resource represented as a generic value tree.
//!
//! Pipeline: **Lexer → Parser → AST → tree-walking evaluation**. An
//! expression compiles once — malformed input is a schema-authoring error
//! surfaced at that point — and can then be evaluated any number of times
//! as a pure function of the resource snapshot.
//!
//! ```
//! use cobalt_fhirpath::Expression;
//! use serde_json::json;
//!
//! let expr = Expression::parse("effective.empty() or effective.exists()").unwrap();
//! assert!(expr.evaluate_boolean(&json!({ "status": "final" })));
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{Error, Result};
pub use eval::{Collection, Expression};
