//! Path accessor
//!
//! Indexed read access by compact address instead of manual tree walking.
//! Absent address elements resolve to the empty string, never an error:
//! partial population is the normal case for clinical messages.
//!
//! The text form is `SEG-F`, `SEG-F.C`, `SEG-F.C.S`, with optional 0-based
//! repeat indexes in parentheses on the segment and field parts, e.g.
//! `OBX(1)-5(2).1`.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::message::Message;

/// A structured address into the parse tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub segment: String,
    /// 0-based occurrence of the segment
    pub segment_repeat: usize,
    /// 1-based HL7 field index
    pub field: usize,
    /// 0-based repetition within the field
    pub field_repeat: usize,
    /// 1-based component index
    pub component: Option<usize>,
    /// 1-based subcomponent index
    pub subcomponent: Option<usize>,
}

impl Query {
    pub fn new(segment: impl Into<String>, field: usize) -> Self {
        Self {
            segment: segment.into(),
            segment_repeat: 0,
            field,
            field_repeat: 0,
            component: None,
            subcomponent: None,
        }
    }

    pub fn segment_repeat(mut self, repeat: usize) -> Self {
        self.segment_repeat = repeat;
        self
    }

    pub fn field_repeat(mut self, repeat: usize) -> Self {
        self.field_repeat = repeat;
        self
    }

    pub fn component(mut self, component: usize) -> Self {
        self.component = Some(component);
        self
    }

    pub fn subcomponent(mut self, subcomponent: usize) -> Self {
        self.subcomponent = Some(subcomponent);
        self
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidQuery {
            query: s.to_string(),
            reason: reason.to_string(),
        };

        let (segment_part, rest) = s
            .split_once('-')
            .ok_or_else(|| invalid("expected '<segment>-<field>'"))?;
        let (segment, segment_repeat) =
            parse_indexed(segment_part).map_err(|reason| invalid(reason))?;
        if segment.chars().count() != 3 {
            return Err(invalid("segment tag must be three characters"));
        }

        let mut parts = rest.split('.');
        let field_part = parts.next().unwrap_or_default();
        let (field_digits, field_repeat) =
            parse_indexed(field_part).map_err(|reason| invalid(reason))?;
        let field = parse_position(field_digits).ok_or_else(|| invalid("bad field index"))?;

        let component = match parts.next() {
            Some(p) => Some(parse_position(p).ok_or_else(|| invalid("bad component index"))?),
            None => None,
        };
        let subcomponent = match parts.next() {
            Some(p) => Some(parse_position(p).ok_or_else(|| invalid("bad subcomponent index"))?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(invalid("too many address parts"));
        }

        Ok(Query {
            segment: segment.to_string(),
            segment_repeat,
            field,
            field_repeat,
            component,
            subcomponent,
        })
    }
}

/// Split `NAME(n)` into the name and its repeat index; no parentheses
/// means repeat 0.
fn parse_indexed(part: &str) -> std::result::Result<(&str, usize), &'static str> {
    match part.split_once('(') {
        None => Ok((part, 0)),
        Some((name, index)) => {
            let index = index.strip_suffix(')').ok_or("unterminated repeat index")?;
            let index = index.parse().map_err(|_| "repeat index must be numeric")?;
            Ok((name, index))
        }
    }
}

/// Parse a 1-based position; zero is not an address.
fn parse_position(digits: &str) -> Option<usize> {
    match digits.parse() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

impl Message {
    /// Resolve a structured address to its value, `""` when any address
    /// element is absent.
    pub fn query(&self, query: &Query) -> String {
        let Some(segment) = self
            .segments()
            .iter()
            .filter(|s| s.id == query.segment)
            .nth(query.segment_repeat)
        else {
            return String::new();
        };
        let Some(field) = segment.field(query.field) else {
            return String::new();
        };

        let Some(component_index) = query.component else {
            return field
                .repeats
                .get(query.field_repeat)
                .cloned()
                .unwrap_or_default();
        };

        let component = if query.field_repeat == 0 {
            field.component(component_index).cloned()
        } else {
            field
                .repeat_components(query.field_repeat, self.separators())
                .and_then(|components| {
                    component_index
                        .checked_sub(1)
                        .and_then(|i| components.get(i).cloned())
                })
        };
        let Some(component) = component else {
            return String::new();
        };

        match query.subcomponent {
            None => component.value,
            Some(sub) => component.subcomponent(sub).to_string(),
        }
    }

    /// Parse and resolve a text-form address.
    pub fn query_str(&self, query: &str) -> Result<String> {
        Ok(self.query(&query.parse::<Query>()?))
    }
}
