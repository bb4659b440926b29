//! Small parsing and encoding helpers shared by the scripts.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
}

/// Decode a hex string, tolerating an optional `0x` prefix.
///
/// Receiver, fallback, and call-data flags all arrive hex-encoded on the
/// command line.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, ParseError> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(stripped).map_err(|e| ParseError::InvalidHex(e.to_string()))
}

/// Widen a numeric chain id into the 32-byte big-endian form the protocol
/// uses on the wire.
pub fn normalize_chain_id(chain_id: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&chain_id.to_be_bytes());
    out
}
