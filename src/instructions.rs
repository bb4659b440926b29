//! Sender-program instruction builders.
//!
//! Instruction data is the 8-byte method discriminator
//! (`sha256("global:<method>")[..8]`) followed by the borsh-serialized
//! arguments; the account list is the send context, verbatim.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use thiserror::Error;

use crate::context::SendAccounts;

#[derive(Error, Debug)]
pub enum InstructionError {
    #[error("Failed to serialize instruction arguments: {0}")]
    Serialize(#[from] std::io::Error),
}

/// Plain token send.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct SendViaBridge {
    /// Amount of sending tokens; fees are taken from it.
    pub amount: u64,
    pub target_chain_id: [u8; 32],
    /// Address receiving the tokens on the target chain.
    pub receiver: Vec<u8>,
    /// Pay the fixed fee in the sent asset instead of lamports.
    pub use_asset_fee: bool,
}

impl SendViaBridge {
    pub const DISCRIMINATOR: [u8; 8] = [198, 127, 105, 164, 129, 49, 128, 8];
}

/// Send where fees are added on top so the receiver gets exactly
/// `exact_amount`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct SendWithExactAmount {
    pub exact_amount: u64,
    pub target_chain_id: [u8; 32],
    pub receiver: Vec<u8>,
    /// Reward for claiming the transfer on the target chain.
    pub execution_fee: u64,
    pub use_asset_fee: bool,
}

impl SendWithExactAmount {
    pub const DISCRIMINATOR: [u8; 8] = [92, 65, 25, 231, 251, 169, 159, 128];
}

/// Send paying the fixed fee in the transferred asset.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct SendWithAssetFixedFee {
    pub amount: u64,
    pub target_chain_id: [u8; 32],
    pub receiver: Vec<u8>,
}

impl SendWithAssetFixedFee {
    pub const DISCRIMINATOR: [u8; 8] = [192, 147, 116, 220, 245, 60, 210, 181];
}

/// Send carrying an external call payload.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct SendWithExternalCall {
    pub amount: u64,
    pub target_chain_id: [u8; 32],
    pub receiver: Vec<u8>,
    pub execution_fee: u64,
    /// Authority on the target chain that may cancel the call and recover
    /// the funds.
    pub fallback_address: Vec<u8>,
    pub external_call: Vec<u8>,
}

impl SendWithExternalCall {
    pub const DISCRIMINATOR: [u8; 8] = [226, 198, 149, 75, 5, 0, 46, 56];
}

/// Zero-liquidity message send.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct SendMessage {
    pub target_chain_id: [u8; 32],
    pub receiver: Vec<u8>,
    pub execution_fee: u64,
    pub fallback_address: Vec<u8>,
    pub external_call: Vec<u8>,
}

impl SendMessage {
    pub const DISCRIMINATOR: [u8; 8] = [57, 40, 34, 178, 189, 10, 65, 26];
}

fn sender_instruction(
    sender_program: &Pubkey,
    discriminator: [u8; 8],
    args: &impl BorshSerialize,
    accounts: &SendAccounts,
) -> Result<Instruction, InstructionError> {
    let mut data = discriminator.to_vec();
    data.extend(borsh::to_vec(args)?);

    Ok(Instruction {
        program_id: *sender_program,
        accounts: accounts.to_account_metas(),
        data,
    })
}

pub fn send_via_bridge(
    sender_program: &Pubkey,
    args: &SendViaBridge,
    accounts: &SendAccounts,
) -> Result<Instruction, InstructionError> {
    sender_instruction(sender_program, SendViaBridge::DISCRIMINATOR, args, accounts)
}

pub fn send_with_exact_amount(
    sender_program: &Pubkey,
    args: &SendWithExactAmount,
    accounts: &SendAccounts,
) -> Result<Instruction, InstructionError> {
    sender_instruction(
        sender_program,
        SendWithExactAmount::DISCRIMINATOR,
        args,
        accounts,
    )
}

pub fn send_with_asset_fixed_fee(
    sender_program: &Pubkey,
    args: &SendWithAssetFixedFee,
    accounts: &SendAccounts,
) -> Result<Instruction, InstructionError> {
    sender_instruction(
        sender_program,
        SendWithAssetFixedFee::DISCRIMINATOR,
        args,
        accounts,
    )
}

pub fn send_with_external_call(
    sender_program: &Pubkey,
    args: &SendWithExternalCall,
    accounts: &SendAccounts,
) -> Result<Instruction, InstructionError> {
    sender_instruction(
        sender_program,
        SendWithExternalCall::DISCRIMINATOR,
        args,
        accounts,
    )
}

pub fn send_message(
    sender_program: &Pubkey,
    args: &SendMessage,
    accounts: &SendAccounts,
) -> Result<Instruction, InstructionError> {
    sender_instruction(sender_program, SendMessage::DISCRIMINATOR, args, accounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_accounts() -> SendAccounts {
        SendAccounts {
            bridge: Pubkey::new_unique(),
            token_mint: Pubkey::new_unique(),
            staking_wallet: Pubkey::new_unique(),
            mint_authority: Pubkey::new_unique(),
            chain_support_info: Pubkey::new_unique(),
            settings_program: Pubkey::new_unique(),
            token_program: spl_token::id(),
            state: Pubkey::new_unique(),
            fee_beneficiary: Pubkey::new_unique(),
            nonce_storage: Pubkey::new_unique(),
            send_from_wallet: Pubkey::new_unique(),
            system_program: solana_sdk::system_program::id(),
            external_call_storage: Pubkey::new_unique(),
            external_call_meta: Pubkey::new_unique(),
            send_from: Pubkey::new_unique(),
            discount_info: Pubkey::new_unique(),
            asset_fee_info: Pubkey::new_unique(),
            bridge_program: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_send_via_bridge_data_layout() {
        let args = SendViaBridge {
            amount: 1000,
            target_chain_id: [13; 32],
            receiver: vec![14; 20],
            use_asset_fee: false,
        };
        let ix = send_via_bridge(&Pubkey::new_unique(), &args, &test_accounts()).unwrap();

        assert_eq!(
            ix.data,
            vec![
                198, 127, 105, 164, 129, 49, 128, 8, 232, 3, 0, 0, 0, 0, 0, 0, 13, 13, 13, 13, 13,
                13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13,
                13, 13, 13, 13, 13, 13, 20, 0, 0, 0, 14, 14, 14, 14, 14, 14, 14, 14, 14, 14, 14,
                14, 14, 14, 14, 14, 14, 14, 14, 14, 0
            ]
        );
    }

    #[test]
    fn test_instruction_carries_full_send_context() {
        let accounts = test_accounts();
        let args = SendMessage {
            target_chain_id: [1; 32],
            receiver: vec![2; 20],
            execution_fee: 100,
            fallback_address: vec![3; 20],
            external_call: vec![4, 5, 6],
        };
        let ix = send_message(&Pubkey::new_unique(), &args, &accounts).unwrap();

        assert_eq!(ix.accounts, accounts.to_account_metas());
        assert_eq!(ix.accounts.len(), SendAccounts::LEN);
        assert!(ix.accounts[14].is_signer);
        assert_eq!(&ix.data[..8], SendMessage::DISCRIMINATOR);
    }

    #[test]
    fn test_method_discriminators_are_distinct() {
        let discriminators = [
            SendViaBridge::DISCRIMINATOR,
            SendWithExactAmount::DISCRIMINATOR,
            SendWithAssetFixedFee::DISCRIMINATOR,
            SendWithExternalCall::DISCRIMINATOR,
            SendMessage::DISCRIMINATOR,
        ];
        for (i, a) in discriminators.iter().enumerate() {
            for b in &discriminators[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
