//! Protocol address resolution.
//!
//! Every account a send touches is a program-derived address of either the
//! bridge program or the settings program. The resolver carries the two
//! program ids (they come from the environment, not hardcoded keys) and
//! derives the rest.

use solana_sdk::pubkey::Pubkey;

use crate::constants::SOLANA_CHAIN_ID;

const BRIDGE_SEED: &[u8] = b"BRIDGE";
const MINT_AUTHORITY_SEED: &[u8] = b"MINT_AUTHORITY";
const STATE_SEED: &[u8] = b"STATE";
const CHAIN_SUPPORT_INFO_SEED: &[u8] = b"CHAIN_SUPPORT_INFO";
const ASSET_FEE_INFO_SEED: &[u8] = b"BRIDGE_FEE_INFO";
const DEFAULT_ASSET_FEE_SEED: &[u8] = b"DEFAULT_BRIDGE_FEE_INFO";
const DISCOUNT_INFO_SEED: &[u8] = b"DISCOUNT_INFO";
const DEFAULT_DISCOUNT_SEED: &[u8] = b"DEFAULT_DISCOUNT_INFO";
const NONCE_STORAGE_SEED: &[u8] = b"NONCE_STORAGE";
const EXTERNAL_CALL_STORAGE_SEED: &[u8] = b"EXTERNAL_CALL_STORAGE";
const EXTERNAL_CALL_META_SEED: &[u8] = b"EXTERNAL_CALL_META";

#[derive(Clone, Copy, Debug)]
pub struct AddressResolver {
    pub bridge_program: Pubkey,
    pub settings_program: Pubkey,
}

impl AddressResolver {
    pub fn new(bridge_program: Pubkey, settings_program: Pubkey) -> Self {
        Self {
            bridge_program,
            settings_program,
        }
    }

    /// Bridge record for a token mint.
    pub fn bridge(&self, token_mint: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[BRIDGE_SEED, token_mint.as_ref()],
            &self.settings_program,
        )
    }

    /// Authority minting and burning wrapped tokens for a bridge.
    pub fn mint_authority(&self, bridge: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[MINT_AUTHORITY_SEED, bridge.as_ref()],
            &self.bridge_program,
        )
    }

    /// Settings-program state account.
    pub fn state(&self) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[STATE_SEED], &self.settings_program)
    }

    /// Support record for a target chain.
    pub fn chain_support_info(&self, chain_id: &[u8; 32]) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[CHAIN_SUPPORT_INFO_SEED, chain_id],
            &self.settings_program,
        )
    }

    /// Asset-fee record for a bridge and target chain.
    pub fn asset_fee_info(&self, bridge: &Pubkey, chain_id: &[u8; 32]) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[ASSET_FEE_INFO_SEED, bridge.as_ref(), chain_id],
            &self.settings_program,
        )
    }

    /// Well-known stand-in when no asset-fee record exists.
    pub fn default_asset_fee(&self) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[DEFAULT_ASSET_FEE_SEED], &self.settings_program)
    }

    /// Fee-discount record of a sender.
    pub fn discount_info(&self, user: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[DISCOUNT_INFO_SEED, user.as_ref()],
            &self.settings_program,
        )
    }

    /// Well-known stand-in when the sender has no discount record.
    pub fn default_discount(&self) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[DEFAULT_DISCOUNT_SEED], &self.settings_program)
    }

    /// Monotonic nonce feeding submission ids.
    pub fn nonce_storage(&self) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[NONCE_STORAGE_SEED], &self.bridge_program)
    }

    /// Buffer holding the external call payload, keyed by its shortcut and
    /// the sending owner.
    pub fn external_call_storage(&self, shortcut: &[u8; 32], owner: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                EXTERNAL_CALL_STORAGE_SEED,
                shortcut,
                owner.as_ref(),
                &SOLANA_CHAIN_ID,
            ],
            &self.bridge_program,
        )
    }

    /// Execution-state record attached to an external call storage.
    pub fn external_call_meta(&self, storage: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[EXTERNAL_CALL_META_SEED, storage.as_ref()],
            &self.bridge_program,
        )
    }
}
