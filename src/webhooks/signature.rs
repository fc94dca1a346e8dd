//! Tracking-webhook signature verification using HMAC-SHA256.
//!
//! The shipment-tracking provider signs each delivery with HMAC-SHA256 over
//! the raw request body using a shared secret, and sends the hex digest in
//! the `X-Shippo-Signature` header (bare hex, no algorithm prefix).
//!
//! Verification is the first step in processing the tracking webhook;
//! invalid signatures are rejected before any parsing or I/O.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Decodes a signature header (bare hex digest) into raw bytes.
///
/// Returns `None` for non-hex or odd-length input. Never panics.
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    hex::decode(header.trim()).ok()
}

/// Computes the HMAC-SHA256 signature of a payload with the given secret.
///
/// Used by tests (and by the provider) to produce expected signatures.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Formats a signature the way the provider sends it: lowercase hex.
pub fn format_signature_header(signature: &[u8]) -> String {
    hex::encode(signature)
}

/// Verifies a webhook signature against the raw payload and secret.
///
/// Returns `true` only for a valid signature. Comparison is constant-time
/// via the HMAC library, so malformed or truncated headers cannot be used
/// as a timing oracle.
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let expected = match parse_signature_header(signature_header) {
        Some(sig) => sig,
        None => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);

    mac.verify_slice(&expected).is_ok()
}
