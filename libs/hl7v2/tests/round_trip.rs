//! Round-trip and delimiter-fidelity suite
//!
//! For any successfully parsed message with terminators normalized to
//! carriage returns, re-encoding must reproduce the input exactly.

use cobalt_hl7v2::{Message, Separators};
use quickcheck::{Arbitrary, Gen, QuickCheck};

#[test]
fn test_round_trip_examples() {
    let inputs = [
        "MSH|^~\\&|SENDAPP|SENDFAC|RECVAPP|RECVFAC|20240102||ADT^A01|42|P|2.5",
        "MSH|^~\\&|SENDER|FACILITY\rPID|1001||MRN123^^^HOSP~MRN999||DOE^JOHN&JACOB",
        "MSH|^~\\&|||SENDAPP||X",
        "MSH|^~\\&|",
        "MSH|^~\\&|A\rOBX|1|NM|GLU||95|mg/dL\rOBX|2|NM|NA||140|mmol/L",
        "MSH|^~\\&|A\rNTE|1||free text with \\F\\ escaped pipe",
        "MSH|^~\\&|A\rPID|^^~&&|~~|",
    ];

    for input in inputs {
        let msg = Message::parse(input).unwrap();
        assert_eq!(msg.encode(), input, "round trip failed for {input:?}");
    }
}

#[test]
fn test_round_trip_normalizes_terminators() {
    let msg = Message::parse("MSH|^~\\&|A\nPID|1\r\nOBX|2\r").unwrap();
    assert_eq!(msg.encode(), "MSH|^~\\&|A\rPID|1\rOBX|2");
}

#[test]
fn test_round_trip_nonstandard_delimiters() {
    let input = "MSH$+!?/$SENDER$FAC\rPID$a+b$x!y$p/q";
    let msg = Message::parse(input).unwrap();
    assert_eq!(msg.encode(), input);

    let seps = *msg.separators();
    assert_eq!(
        seps,
        Separators {
            field: '$',
            component: '+',
            repetition: '!',
            escape: '?',
            subcomponent: '/',
        }
    );
}

/// A generated message body: segment tags plus token payloads drawn from an
/// alphabet free of delimiter and terminator characters.
#[derive(Debug, Clone)]
struct WireMessage(String);

const PAYLOAD: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 .-^~&";
const TAGS: &[&str] = &["PID", "PV1", "OBR", "OBX", "NTE", "EVN", "AL1"];

impl Arbitrary for WireMessage {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut text = String::from("MSH|^~\\&");
        let field_count = usize::arbitrary(g) % 6;
        for _ in 0..field_count {
            text.push('|');
            text.push_str(&arbitrary_token(g));
        }

        let segment_count = usize::arbitrary(g) % 5;
        for _ in 0..segment_count {
            text.push('\r');
            text.push_str(TAGS[usize::arbitrary(g) % TAGS.len()]);
            let field_count = usize::arbitrary(g) % 6;
            for _ in 0..field_count {
                text.push('|');
                text.push_str(&arbitrary_token(g));
            }
        }
        WireMessage(text)
    }
}

fn arbitrary_token(g: &mut Gen) -> String {
    let len = usize::arbitrary(g) % 8;
    (0..len)
        .map(|_| PAYLOAD[usize::arbitrary(g) % PAYLOAD.len()] as char)
        .collect()
}

#[test]
fn prop_parse_encode_identity() {
    fn property(message: WireMessage) -> bool {
        let parsed = match Message::parse(&message.0) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        parsed.encode() == message.0
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(property as fn(WireMessage) -> bool);
}

#[test]
fn prop_reparse_is_stable() {
    fn property(message: WireMessage) -> bool {
        let once = match Message::parse(&message.0) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        match Message::parse(&once.encode()) {
            Ok(twice) => once == twice,
            Err(_) => false,
        }
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(property as fn(WireMessage) -> bool);
}
