//! ER7 escape sequences
//!
//! Structural parsing keeps wire text verbatim so that tree offsets stay
//! stable; decoding happens at the leaf, on demand. Sequences cover the
//! five delimiter characters (`\F\ \S\ \T\ \R\ \E\`) and hexadecimal data
//! (`\Xhh..\`). Unrecognized or unterminated sequences pass through
//! unchanged rather than erroring: clinical feeds routinely carry stray
//! backslashes.

use crate::separators::Separators;

/// Decode wire-form text into display form.
pub fn decode(text: &str, separators: &Separators) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != separators.escape {
            out.push(c);
            continue;
        }

        let mut seq = String::new();
        let mut closed = false;
        for next in chars.by_ref() {
            if next == separators.escape {
                closed = true;
                break;
            }
            seq.push(next);
        }

        if !closed {
            out.push(separators.escape);
            out.push_str(&seq);
            break;
        }

        match seq.as_str() {
            "F" => out.push(separators.field),
            "S" => out.push(separators.component),
            "T" => out.push(separators.subcomponent),
            "R" => out.push(separators.repetition),
            "E" => out.push(separators.escape),
            _ => match decode_hex(&seq) {
                Some(decoded) => out.push_str(&decoded),
                None => {
                    out.push(separators.escape);
                    out.push_str(&seq);
                    out.push(separators.escape);
                }
            },
        }
    }

    out
}

/// Encode display-form text into wire form.
pub fn encode(text: &str, separators: &Separators) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        let code = if c == separators.field {
            Some('F')
        } else if c == separators.component {
            Some('S')
        } else if c == separators.subcomponent {
            Some('T')
        } else if c == separators.repetition {
            Some('R')
        } else if c == separators.escape {
            Some('E')
        } else {
            None
        };

        match code {
            Some(code) => {
                out.push(separators.escape);
                out.push(code);
                out.push(separators.escape);
            }
            None => out.push(c),
        }
    }

    out
}

/// Decode an `Xhh..` sequence body; pairs of hex digits become bytes.
fn decode_hex(seq: &str) -> Option<String> {
    let digits = seq.strip_prefix('X')?;
    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }

    let mut out = String::with_capacity(digits.len() / 2);
    let bytes = digits.as_bytes();
    for pair in bytes.chunks(2) {
        let pair = std::str::from_utf8(pair).ok()?;
        let byte = u8::from_str_radix(pair, 16).ok()?;
        out.push(byte as char);
    }
    Some(out)
}
