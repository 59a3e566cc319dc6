//! The four-level ER7 parse tree
//!
//! message → segment → field → component → subcomponent. Every entity is
//! produced once from an immutable input string and never mutated; equality
//! is value-based. Leaf values keep their wire form — escape decoding is a
//! separate, on-demand step (see [`crate::escape`]).

use crate::error::Result;
use crate::escape;
use crate::parser;
use crate::separators::{Separators, HEADER_ID};

/// A leaf value plus its ordered subcomponents
///
/// A component without subcomponent separators has exactly one
/// subcomponent: itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Raw wire-form value, escapes undecoded
    pub value: String,
    pub subcomponents: Vec<String>,
}

impl Component {
    pub(crate) fn parse(raw: &str, separators: &Separators) -> Self {
        Self {
            value: raw.to_string(),
            subcomponents: raw
                .split(separators.subcomponent)
                .map(str::to_string)
                .collect(),
        }
    }

    /// Wrap a value without splitting it (header fields 1 and 2).
    pub(crate) fn raw(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            subcomponents: vec![value.clone()],
            value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Subcomponent by 1-based index, `""` when absent
    pub fn subcomponent(&self, index: usize) -> &str {
        index
            .checked_sub(1)
            .and_then(|i| self.subcomponents.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Value with escape sequences decoded
    pub fn decoded_value(&self, separators: &Separators) -> String {
        escape::decode(&self.value, separators)
    }
}

/// One field: its raw repetitions and the parsed components of the first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Raw repetitions, wire form, empties retained
    pub repeats: Vec<String>,
    /// Components of the first repetition
    pub components: Vec<Component>,
}

impl Field {
    pub(crate) fn parse(raw: &str, separators: &Separators) -> Self {
        let repeats: Vec<String> = raw
            .split(separators.repetition)
            .map(str::to_string)
            .collect();
        let components = repeats[0]
            .split(separators.component)
            .map(|c| Component::parse(c, separators))
            .collect();
        Self {
            repeats,
            components,
        }
    }

    /// Wrap a value without splitting it (header fields 1 and 2).
    pub(crate) fn raw(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            repeats: vec![value.clone()],
            components: vec![Component::raw(value)],
        }
    }

    /// Raw value of the first repetition
    pub fn value(&self) -> &str {
        self.repeats.first().map(String::as_str).unwrap_or("")
    }

    /// Component by 1-based index within the first repetition
    pub fn component(&self, index: usize) -> Option<&Component> {
        index.checked_sub(1).and_then(|i| self.components.get(i))
    }

    /// Re-split a repetition into components on demand; `None` when the
    /// repetition does not exist.
    pub fn repeat_components(
        &self,
        repeat: usize,
        separators: &Separators,
    ) -> Option<Vec<Component>> {
        let raw = self.repeats.get(repeat)?;
        Some(
            raw.split(separators.component)
                .map(|c| Component::parse(c, separators))
                .collect(),
        )
    }

    /// Wire form: repetitions hold raw text, so joining them is lossless.
    pub fn encode(&self, separators: &Separators) -> String {
        self.repeats.join(&separators.repetition.to_string())
    }
}

/// A segment: three-letter identifier plus its ordered fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: String,
    pub fields: Vec<Field>,
}

impl Segment {
    pub fn is_header(&self) -> bool {
        self.id == HEADER_ID
    }

    /// Field by 1-based HL7 index.
    ///
    /// The identifier is not a field: in ordinary segments the first token
    /// after it is field 2, and field 1 is never populated. The header is
    /// the exception — field 1 is the synthesized separator character and
    /// field 2 the raw encoding-character block.
    pub fn field(&self, index: usize) -> Option<&Field> {
        if self.is_header() {
            index.checked_sub(1).and_then(|i| self.fields.get(i))
        } else {
            index.checked_sub(2).and_then(|i| self.fields.get(i))
        }
    }

    pub fn encode(&self, separators: &Separators) -> String {
        let mut line = self.id.clone();
        let rest = if self.is_header() {
            // Field 1 is the separator itself; field 2 carries the raw
            // encoding block. Neither is recoverable by joining split
            // tokens, so the prefix is reconstructed positionally.
            if let Some(block) = self.fields.get(1) {
                line.push(separators.field);
                line.push_str(block.value());
            }
            self.fields.get(2..).unwrap_or(&[])
        } else {
            &self.fields[..]
        };
        for field in rest {
            line.push(separators.field);
            line.push_str(&field.encode(separators));
        }
        line
    }
}

/// A parsed message: its delimiter set plus ordered segments
///
/// Always has at least one segment and the first is the header; the
/// delimiter set is fixed for the message's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    separators: Separators,
    segments: Vec<Segment>,
}

impl Message {
    /// Parse ER7 text. Fails fast on malformed input (empty text, missing
    /// header tag, unparseable delimiter block) before any segment is
    /// produced.
    pub fn parse(input: &str) -> Result<Message> {
        parser::parse_message(input)
    }

    pub(crate) fn from_parts(separators: Separators, segments: Vec<Segment>) -> Self {
        Self {
            separators,
            segments,
        }
    }

    pub fn separators(&self) -> &Separators {
        &self.separators
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The header segment (always present)
    pub fn header(&self) -> &Segment {
        &self.segments[0]
    }

    /// First segment with the given identifier
    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// All segments with the given identifier, in message order
    pub fn segments_named<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Segment> {
        self.segments.iter().filter(move |s| s.id == id)
    }

    /// Re-encode to wire form, segments joined with carriage returns.
    pub fn encode(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.encode(&self.separators))
            .collect::<Vec<_>>()
            .join("\r")
    }
}
