//! Protocol-wide constants.

use solana_sdk::pubkey::Pubkey;

/// Chain id of Solana itself, used as the source chain of every send.
///
/// Chain ids are 32-byte big-endian values; EVM networks use their numeric
/// chainlist id, Solana is special-cased to the tag `"sol"`.
pub const SOLANA_CHAIN_ID: [u8; 32] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 115,
    111, 108,
];

/// Denominator for fee values expressed in basis points.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Stand-in public key for the submission authority.
///
/// The real authority only exists once the cross-chain message is relayed
/// (the external call hash is part of the submission id), so external
/// instructions are built against this placeholder and patched by the
/// executor at claim time.
pub const SUBMISSION_AUTH_PLACEHOLDER: Pubkey = Pubkey::new_from_array([
    85, 33, 83, 145, 145, 154, 112, 164, 70, 223, 57, 204, 157, 1, 109, 77, 31, 48, 22, 162, 91,
    85, 46, 197, 203, 105, 251, 111, 168, 234, 65, 70,
]);

/// Cost of a single Solana signature in lamports, the floor for external
/// instruction expenses.
pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

/// Default executor reward for the destination-wallet initialization
/// instruction of a transfer external call.
pub const DEFAULT_INIT_WALLET_REWARD: u64 = 100;

/// Default executor reward for the balance-transfer instruction of a
/// transfer external call.
pub const DEFAULT_TRANSFER_REWARD: u64 = 10;
