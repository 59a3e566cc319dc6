//! Abstract syntax tree for the invariant grammar subset
//!
//! The tree mirrors the grammar directly; bare member and function
//! invocations are normalized onto a `$this` base during parsing so that
//! evaluation is uniform.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A parsed expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `$this` — the node currently under evaluation
    This,

    /// Literal term
    Literal(Literal),

    /// Member navigation: `base.name`
    Path { base: Box<Expr>, name: String },

    /// Function invocation: `base.name(args)`
    Function {
        base: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },

    /// Indexer: `base[index]`
    Index { base: Box<Expr>, index: Box<Expr> },

    /// Binary operator application
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `{}` — the empty collection
    Empty,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    String(String),
    Date(NaiveDate),
}

/// Binary operators, in the subset's precedence groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Equality
    Equal,    // =
    NotEqual, // !=

    // Inequality
    LessThan,           // <
    LessThanOrEqual,    // <=
    GreaterThan,        // >
    GreaterThanOrEqual, // >=

    // Membership
    In,       // in
    Contains, // contains

    // Boolean
    And,     // and
    Or,      // or
    Xor,     // xor
    Implies, // implies
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::In => "in",
            Self::Contains => "contains",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Implies => "implies",
        }
    }
}
