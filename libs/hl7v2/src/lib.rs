//! HL7 v2.x ER7 message model
//!
//! Parses pipe-delimited v2.x clinical messages into an immutable
//! four-level hierarchy (message → segment → field → component →
//! subcomponent), re-encodes them losslessly, and resolves compact path
//! addresses. A message declares its own delimiter set in the header
//! segment; the set is resolved once and drives every split below it.
//!
//! ```
//! use cobalt_hl7v2::Message;
//!
//! let msg = Message::parse("MSH|^~\\&|LAB|FAC\rPID|1001||MRN1^^^HOSP").unwrap();
//! assert_eq!(msg.query_str("PID-4.4").unwrap(), "HOSP");
//! assert_eq!(msg.query_str("PID-9").unwrap(), "");
//! ```

pub mod error;
pub mod escape;
pub mod message;
mod parser;
pub mod query;
pub mod separators;

pub use error::{Error, Result};
pub use message::{Component, Field, Message, Segment};
pub use query::Query;
pub use separators::{Separators, HEADER_ID};
