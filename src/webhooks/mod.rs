//! Webhook intake: signature verification and payload parsing.
//!
//! Verification runs over the raw body before anything is parsed; parsing
//! turns raw JSON into the typed values the handlers work with.

pub mod parser;
pub mod signature;

pub use parser::{parse_record_payload, parse_tracking_update, ParseError, RecordPayload};
pub use signature::{
    compute_signature, format_signature_header, parse_signature_header, verify_signature,
};
