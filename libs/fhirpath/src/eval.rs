//! Tree-walking evaluator
//!
//! Evaluates a compiled expression against a resource represented as a
//! generic value tree. Evaluation is pure, deterministic and total:
//! navigating through a missing node yields the empty collection, never an
//! error, and comparisons with an empty operand propagate emptiness. Only
//! compilation can fail.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::Value;
use smallvec::{smallvec, SmallVec};

use crate::ast::{BinaryOp, Expr, Literal};
use crate::error::Result;
use crate::parser::Parser;

/// An ordered evaluation result
pub type Collection = SmallVec<[Value; 1]>;

/// A compiled constraint expression
#[derive(Debug, Clone)]
pub struct Expression {
    text: String,
    ast: Expr,
}

impl Expression {
    /// Compile an expression. Malformed input is detected here, once, and
    /// reported as a schema-authoring defect.
    pub fn parse(input: &str) -> Result<Self> {
        let ast = Parser::new(input.to_string()).parse()?;
        Ok(Self {
            text: input.to_string(),
            ast,
        })
    }

    /// The source text this expression was compiled from
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Evaluate against a resource snapshot.
    pub fn evaluate(&self, resource: &Value) -> Collection {
        eval(&self.ast, resource)
    }

    /// Boolean verdict for invariant checking.
    ///
    /// An empty result is non-violation (absence only fails when the
    /// expression asserts presence); a singleton boolean is itself; any
    /// other non-empty result passes.
    pub fn evaluate_boolean(&self, resource: &Value) -> bool {
        to_boolean(&self.evaluate(resource)).unwrap_or(true)
    }
}

impl FromStr for Expression {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn eval(expr: &Expr, root: &Value) -> Collection {
    match expr {
        Expr::This => {
            if root.is_null() {
                Collection::new()
            } else {
                smallvec![root.clone()]
            }
        }
        Expr::Literal(literal) => literal_value(literal),
        Expr::Path { base, name } => navigate(&eval(base, root), name),
        Expr::Function { base, name, .. } => apply_function(name, &eval(base, root)),
        Expr::Index { base, index } => {
            let items = eval(base, root);
            match singleton_index(&eval(index, root)) {
                Some(i) => items
                    .get(i)
                    .map(|v| smallvec![v.clone()])
                    .unwrap_or_default(),
                None => Collection::new(),
            }
        }
        Expr::Binary { op, left, right } => eval_binary(*op, left, right, root),
    }
}

fn literal_value(literal: &Literal) -> Collection {
    match literal {
        Literal::Empty => Collection::new(),
        Literal::Boolean(b) => smallvec![Value::Bool(*b)],
        Literal::Integer(i) => smallvec![Value::from(*i)],
        Literal::Decimal(d) => match d.to_f64().and_then(serde_json::Number::from_f64) {
            Some(n) => smallvec![Value::Number(n)],
            None => Collection::new(),
        },
        Literal::String(s) => smallvec![Value::String(s.clone())],
        Literal::Date(d) => smallvec![Value::String(d.format("%Y-%m-%d").to_string())],
    }
}

/// Member navigation, element-wise over the input collection. Arrays
/// flatten; null and missing children contribute nothing.
fn navigate(items: &[Value], name: &str) -> Collection {
    let mut out = Collection::new();
    for item in items {
        let Some(child) = item.get(name) else {
            continue;
        };
        match child {
            Value::Null => {}
            Value::Array(elements) => {
                for element in elements {
                    if !element.is_null() {
                        out.push(element.clone());
                    }
                }
            }
            other => out.push(other.clone()),
        }
    }
    out
}

fn apply_function(name: &str, input: &Collection) -> Collection {
    match name {
        "exists" => smallvec![Value::Bool(!input.is_empty())],
        "empty" => smallvec![Value::Bool(input.is_empty())],
        "count" => smallvec![Value::from(input.len() as i64)],
        "first" => input
            .first()
            .map(|v| smallvec![v.clone()])
            .unwrap_or_default(),
        "not" => match to_boolean(input) {
            Some(b) => smallvec![Value::Bool(!b)],
            None => Collection::new(),
        },
        // The parser only admits known functions.
        _ => Collection::new(),
    }
}

fn eval_binary(op: BinaryOp, left: &Expr, right: &Expr, root: &Value) -> Collection {
    match op {
        BinaryOp::And | BinaryOp::Or | BinaryOp::Xor | BinaryOp::Implies => {
            let l = to_boolean(&eval(left, root));
            let r = to_boolean(&eval(right, root));
            let verdict = match op {
                BinaryOp::And => match (l, r) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                },
                BinaryOp::Or => match (l, r) {
                    (Some(true), _) | (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                },
                BinaryOp::Xor => match (l, r) {
                    (Some(l), Some(r)) => Some(l != r),
                    _ => None,
                },
                // An absent or false antecedent cannot be violated.
                BinaryOp::Implies => match l {
                    None | Some(false) => Some(true),
                    Some(true) => r,
                },
                _ => None,
            };
            boolean_result(verdict)
        }

        BinaryOp::Equal | BinaryOp::NotEqual => {
            let l = eval(left, root);
            let r = eval(right, root);
            if l.is_empty() || r.is_empty() {
                return Collection::new();
            }
            let equal = collections_equal(&l, &r);
            smallvec![Value::Bool(if op == BinaryOp::Equal {
                equal
            } else {
                !equal
            })]
        }

        BinaryOp::LessThan
        | BinaryOp::LessThanOrEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterThanOrEqual => {
            let l = eval(left, root);
            let r = eval(right, root);
            if l.len() != 1 || r.len() != 1 {
                return Collection::new();
            }
            let Some(ordering) = compare_scalars(&l[0], &r[0]) else {
                return Collection::new();
            };
            let result = match op {
                BinaryOp::LessThan => ordering == Ordering::Less,
                BinaryOp::LessThanOrEqual => ordering != Ordering::Greater,
                BinaryOp::GreaterThan => ordering == Ordering::Greater,
                BinaryOp::GreaterThanOrEqual => ordering != Ordering::Less,
                _ => false,
            };
            smallvec![Value::Bool(result)]
        }

        BinaryOp::In => membership(&eval(left, root), &eval(right, root)),
        BinaryOp::Contains => membership(&eval(right, root), &eval(left, root)),
    }
}

/// `needle in haystack`; an empty or non-singleton needle yields empty.
fn membership(needle: &Collection, haystack: &Collection) -> Collection {
    if needle.len() != 1 {
        return Collection::new();
    }
    let found = haystack.iter().any(|item| item_equals(item, &needle[0]));
    smallvec![Value::Bool(found)]
}

/// A usable indexer operand: a singleton non-negative integer.
fn singleton_index(items: &Collection) -> Option<usize> {
    if items.len() != 1 {
        return None;
    }
    numeric(&items[0]).and_then(|d| d.to_usize())
}

fn boolean_result(verdict: Option<bool>) -> Collection {
    match verdict {
        Some(b) => smallvec![Value::Bool(b)],
        None => Collection::new(),
    }
}

/// Tri-state boolean view of a collection: empty is unknown, a singleton
/// boolean is itself, any other non-empty collection is truthy.
fn to_boolean(items: &Collection) -> Option<bool> {
    match items.len() {
        0 => None,
        1 => match &items[0] {
            Value::Bool(b) => Some(*b),
            _ => Some(true),
        },
        _ => Some(true),
    }
}

fn collections_equal(a: &Collection, b: &Collection) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| item_equals(x, y))
}

/// Scalar equality: numbers compare numerically, everything else by value.
fn item_equals(a: &Value, b: &Value) -> bool {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Ordering for numeric and date-like scalars; incomparable pairs yield
/// `None`, which surfaces as an empty result.
fn compare_scalars(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return Some(x.cmp(&y));
    }
    if let (Value::String(x), Value::String(y)) = (a, b) {
        if let (Ok(dx), Ok(dy)) = (NaiveDate::from_str(x), NaiveDate::from_str(y)) {
            return Some(dx.cmp(&dy));
        }
        return Some(x.cmp(y));
    }
    None
}

fn numeric(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from_i64(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from_u64(u)
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        _ => None,
    }
}
