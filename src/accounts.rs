//! Protocol account data the client reads back from the chain.
//!
//! Accounts are borsh-encoded behind an 8-byte discriminator
//! (`sha256("account:<Name>")[..8]`). Decoding always checks the
//! discriminator first so a wrong address surfaces as a typed error instead
//! of garbage fields.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AccountError {
    #[error("Account data shorter than the discriminator")]
    DataTooShort,

    #[error("Wrong account discriminator")]
    WrongDiscriminator,

    #[error("Failed to deserialize account data: {0}")]
    Deserialize(String),
}

/// Discriminator-framed borsh decoding for protocol accounts.
pub trait ProtocolAccount: BorshDeserialize {
    const DISCRIMINATOR: [u8; 8];

    fn try_from_data(data: &[u8]) -> Result<Self, AccountError> {
        if data.len() < 8 {
            return Err(AccountError::DataTooShort);
        }
        let (discriminator, mut rest) = data.split_at(8);
        if discriminator != Self::DISCRIMINATOR {
            return Err(AccountError::WrongDiscriminator);
        }
        Self::deserialize(&mut rest).map_err(|e| AccountError::Deserialize(e.to_string()))
    }
}

/// Whether the protocol currently accepts sends.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum ProtocolStatus {
    Working,
    Paused,
}

/// Settings-program state: authorities, the fee beneficiary every send pays
/// into, and the global fee defaults.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct State {
    pub status: ProtocolStatus,
    pub protocol_authority: Pubkey,
    /// May stop the protocol but not restart it.
    pub stop_tap: Pubkey,
    pub fee_beneficiary: Pubkey,
    /// Fixed fee in lamports.
    pub global_fixed_fee: u64,
    /// Transfer fee in basis points of the sent amount.
    pub global_transfer_fee_bps: u64,
}

impl ProtocolAccount for State {
    const DISCRIMINATOR: [u8; 8] = [216, 146, 107, 94, 104, 75, 182, 177];
}

/// Per-chain support record with optional fee overrides.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum ChainSupportInfo {
    NotSupported,
    Supported {
        /// Fixed fee in lamports, overriding the global default.
        fixed_fee: Option<u64>,
        /// Transfer fee in bps, overriding the global default.
        transfer_fee_bps: Option<u64>,
        /// Byte length of addresses on this chain.
        chain_address_len: u16,
    },
}

impl ProtocolAccount for ChainSupportInfo {
    const DISCRIMINATOR: [u8; 8] = [175, 59, 40, 127, 55, 33, 200, 203];
}

/// Whether the fixed fee for a bridge+chain pair may be paid in the
/// transferred asset instead of lamports.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct AssetFeeInfo {
    pub asset_fee_bump: u8,
    /// Fee for this chain in the bridged asset; `None` means asset fee is
    /// not available.
    pub asset_chain_fee: Option<u64>,
}

impl ProtocolAccount for AssetFeeInfo {
    const DISCRIMINATOR: [u8; 8] = [201, 172, 65, 1, 230, 159, 183, 126];
}

/// Per-user fee discount.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct DiscountInfo {
    pub discount_fix_bps: u64,
    pub discount_transfer_bps: u64,
}

impl ProtocolAccount for DiscountInfo {
    const DISCRIMINATOR: [u8; 8] = [65, 172, 32, 7, 173, 203, 143, 107];
}
