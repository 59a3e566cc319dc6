//! Active delimiter set for a message
//!
//! ER7 messages declare their own delimiters in the header segment: the
//! fourth character is the field separator and the next four characters are
//! the component, repetition, escape and subcomponent separators, in that
//! order. The set is resolved once per message and never re-interpreted
//! mid-stream.

use crate::error::{Error, Result};

/// Segment tag of the message header
pub const HEADER_ID: &str = "MSH";

/// The five separator characters and the escape character of one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    pub field: char,
    pub component: char,
    pub repetition: char,
    pub escape: char,
    pub subcomponent: char,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl Separators {
    /// Resolve the separators from raw message text.
    ///
    /// The input must start with the header tag followed by at least five
    /// delimiter characters. The four-character encoding block after the
    /// field separator is read positionally; it is data, never re-split
    /// with the separators it defines.
    pub fn from_header(input: &str) -> Result<Self> {
        if !input.starts_with(HEADER_ID) {
            return Err(Error::MissingHeader {
                found: input.chars().take(3).collect(),
            });
        }

        let header: Vec<char> = input.chars().take(8).collect();
        if header.len() < 8 {
            return Err(Error::TruncatedHeader { len: header.len() });
        }

        Ok(Self {
            field: header[3],
            component: header[4],
            repetition: header[5],
            escape: header[6],
            subcomponent: header[7],
        })
    }

    /// The raw encoding-character block as it appears in header field 2
    pub fn encoding_characters(&self) -> String {
        let mut block = String::with_capacity(4);
        block.push(self.component);
        block.push(self.repetition);
        block.push(self.escape);
        block.push(self.subcomponent);
        block
    }
}
