//! The declarative profile model
//!
//! A profile names a target resource type and constrains one element path
//! per definition: cardinality bounds, a must-support flag, fixed and
//! pattern values, a terminology binding, and invariant constraints.
//! Profiles are loaded once from their JSON representation by a
//! caller-owned registry and treated as read-only configuration
//! afterwards.

use std::fmt;

use cobalt_fhirpath::Expression;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ProfileError;

/// A machine-readable profile: target type plus element rules
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub resource_type: String,
    #[serde(default)]
    pub elements: Vec<ElementDefinition>,
}

/// One element-level rule, addressed by dotted path
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDefinition {
    /// Dotted path; the leading segment addresses the resource root
    /// (e.g. `Observation.status`)
    pub path: String,
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: CardinalityMax,
    #[serde(default)]
    pub must_support: bool,
    /// Expected value, compared by exact string form
    #[serde(default)]
    pub fixed: Option<Value>,
    /// Expected pattern, checked as substring containment on string form
    #[serde(default)]
    pub pattern: Option<Value>,
    #[serde(default)]
    pub binding: Option<Binding>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

/// An invariant attached to a profile element
#[derive(Debug, Clone, Deserialize)]
pub struct Constraint {
    pub key: String,
    #[serde(default)]
    pub human: String,
    pub expression: String,
    pub severity: ConstraintSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintSeverity {
    Error,
    Warning,
}

/// A rule tying a coded element to a value set
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub strength: BindingStrength,
    pub value_set: String,
}

/// Binding strength governs the severity of a membership violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingStrength {
    Required,
    Extensible,
    Preferred,
    Example,
}

/// Upper cardinality bound: a finite count or unbounded (`"*"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalityMax {
    Finite(u32),
    Unbounded,
}

impl Default for CardinalityMax {
    fn default() -> Self {
        Self::Unbounded
    }
}

impl fmt::Display for CardinalityMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Unbounded => write!(f, "*"),
        }
    }
}

impl<'de> Deserialize<'de> for CardinalityMax {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MaxVisitor;

        impl Visitor<'_> for MaxVisitor {
            type Value = CardinalityMax;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"*\", a non-negative integer, or its string form")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CardinalityMax, E> {
                u32::try_from(v)
                    .map(CardinalityMax::Finite)
                    .map_err(|_| E::custom("cardinality max out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CardinalityMax, E> {
                u32::try_from(v)
                    .map(CardinalityMax::Finite)
                    .map_err(|_| E::custom("cardinality max out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CardinalityMax, E> {
                if v == "*" {
                    return Ok(CardinalityMax::Unbounded);
                }
                v.parse::<u32>()
                    .map(CardinalityMax::Finite)
                    .map_err(|_| E::custom(format!("invalid cardinality max '{v}'")))
            }
        }

        deserializer.deserialize_any(MaxVisitor)
    }
}

/// A profile with every constraint expression compiled
///
/// Compilation is where schema-authoring defects surface: a malformed
/// invariant or inconsistent cardinality fails here, once, and is never
/// re-raised per validated resource.
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    pub resource_type: String,
    pub elements: Vec<CompiledElement>,
}

#[derive(Debug, Clone)]
pub struct CompiledElement {
    pub definition: ElementDefinition,
    pub constraints: Vec<CompiledConstraint>,
}

#[derive(Debug, Clone)]
pub struct CompiledConstraint {
    pub key: String,
    pub human: String,
    pub severity: ConstraintSeverity,
    pub expression: Expression,
}

impl Profile {
    pub fn compile(self) -> Result<CompiledProfile, ProfileError> {
        let mut elements = Vec::with_capacity(self.elements.len());

        for definition in self.elements {
            if definition.path.is_empty() {
                return Err(ProfileError::EmptyPath);
            }
            if let CardinalityMax::Finite(max) = definition.max {
                if max < definition.min {
                    return Err(ProfileError::InvalidCardinality {
                        path: definition.path,
                        min: definition.min,
                        max,
                    });
                }
            }

            let mut constraints = Vec::with_capacity(definition.constraints.len());
            for constraint in &definition.constraints {
                let expression = Expression::parse(&constraint.expression).map_err(|source| {
                    ProfileError::InvalidExpression {
                        key: constraint.key.clone(),
                        path: definition.path.clone(),
                        source,
                    }
                })?;
                constraints.push(CompiledConstraint {
                    key: constraint.key.clone(),
                    human: constraint.human.clone(),
                    severity: constraint.severity,
                    expression,
                });
            }

            elements.push(CompiledElement {
                definition,
                constraints,
            });
        }

        Ok(CompiledProfile {
            resource_type: self.resource_type,
            elements,
        })
    }
}
