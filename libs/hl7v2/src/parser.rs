//! Deterministic decomposition of ER7 text into the four-level tree
//!
//! Line-feed, carriage-return and CRLF segment terminators are treated as
//! equivalent, and runs of them collapse so no empty segments are emitted.
//! Empty tokens at every level below that are retained: absence versus
//! empty-string carries distinct meaning in the wire format.

use tracing::debug;

use crate::error::{Error, Result};
use crate::message::{Field, Message, Segment};
use crate::separators::{Separators, HEADER_ID};

pub(crate) fn parse_message(input: &str) -> Result<Message> {
    if input.is_empty() {
        return Err(Error::EmptyMessage);
    }

    let mut lines = input.split(['\r', '\n']).filter(|line| !line.is_empty());
    let header_line = lines.next().ok_or(Error::EmptyMessage)?;
    let separators = Separators::from_header(header_line)?;

    let mut segments = vec![parse_header(header_line, &separators)];
    for line in lines {
        segments.push(parse_segment(line, &separators));
    }

    debug!(segments = segments.len(), "parsed message");
    Ok(Message::from_parts(separators, segments))
}

/// Header segments need positional reconstruction: field 1 is the field
/// separator itself and field 2 the raw encoding block, neither of which
/// survives ordinary splitting.
fn parse_header(line: &str, separators: &Separators) -> Segment {
    let mut fields = vec![
        Field::raw(separators.field.to_string()),
        Field::raw(separators.encoding_characters()),
    ];

    // Ordinary splitting resumes after the encoding block.
    let rest: String = line.chars().skip(8).collect();
    let tokens = match rest.strip_prefix(separators.field) {
        Some(tokens) => Some(tokens),
        // No separator after the encoding block; salvage the remainder.
        None if !rest.is_empty() => Some(rest.as_str()),
        None => None,
    };
    if let Some(tokens) = tokens {
        for token in tokens.split(separators.field) {
            fields.push(Field::parse(token, separators));
        }
    }

    Segment {
        id: HEADER_ID.to_string(),
        fields,
    }
}

fn parse_segment(line: &str, separators: &Separators) -> Segment {
    let mut tokens = line.split(separators.field);
    let id = tokens.next().unwrap_or_default().to_string();
    let fields = tokens
        .map(|token| Field::parse(token, separators))
        .collect();
    Segment { id, fields }
}
