//! Reserved flag word carried in submission params.
//!
//! Flags are individual bits of a 32-byte big-endian word: bit `N` lives in
//! byte `31 - N / 8`. Only `SEND_HASHED_DATA` changes client behavior (the
//! call data argument is treated as the payload hash instead of the payload);
//! the rest are interpreted on the destination chain.

/// Unwrap wrapped native currency after the claim.
pub const UNWRAP_NATIVE: u8 = 0;
/// Revert the whole claim if the external call fails.
pub const REVERT_IF_EXTERNAL_FAIL: u8 = 1;
/// Expose the source-chain sender to the called contract.
pub const PROXY_WITH_SENDER: u8 = 2;
/// The supplied call data is already the keccak-256 hash of the payload.
pub const SEND_HASHED_DATA: u8 = 3;
/// Claim directly into the receiver wallet, skipping the external call flow.
pub const DIRECT_WALLET_FLOW: u8 = 31;

/// Flag word of submission params with all bits clear.
pub fn empty() -> [u8; 32] {
    [0u8; 32]
}

/// Set a single flag bit in the reserved word.
pub fn set(word: &mut [u8; 32], flag: u8) {
    word[31 - flag as usize / 8] |= 1 << (flag % 8);
}

/// Test a single flag bit of the reserved word.
pub fn is_set(word: &[u8; 32], flag: u8) -> bool {
    word[31 - flag as usize / 8] & (1 << (flag % 8)) != 0
}

/// Build a flag word from a list of bit positions.
pub fn from_bits(bits: &[u8]) -> [u8; 32] {
    let mut word = empty();
    for bit in bits {
        set(&mut word, *bit);
    }
    word
}
