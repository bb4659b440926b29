//! External call construction.
//!
//! An external call is a sequence of destination-chain instructions executed
//! once the bridge message is claimed. Account ids travel base58
//! string-encoded. Values that cannot be known while the payload is being
//! built (the submission authority's token wallets, the exact claimed
//! balance) are described by substitutions the executor applies right
//! before running each instruction. Indices and offsets are taken at face
//! value here; a substitution pointing outside its instruction only fails on
//! the destination chain.

use borsh::{BorshDeserialize, BorshSerialize};
use sha3::{Digest, Keccak256};
use solana_sdk::{instruction::Instruction, program_error::ProgramError, pubkey::Pubkey};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use thiserror::Error;

use crate::constants::{
    DEFAULT_INIT_WALLET_REWARD, DEFAULT_TRANSFER_REWARD, LAMPORTS_PER_SIGNATURE,
    SUBMISSION_AUTH_PLACEHOLDER,
};

#[derive(Error, Debug)]
pub enum ExternalCallError {
    #[error("Failed to build token instruction: {0}")]
    TokenInstruction(#[from] ProgramError),

    #[error("Failed to serialize external instruction: {0}")]
    Serialize(#[from] std::io::Error),
}

/// Keccak-256 of the payload, the protocol's identifier of an external call.
pub fn external_call_shortcut(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Account reference of an external instruction, with the id string-encoded.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct ExternalAccountMeta {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A destination-chain instruction in the form the external call encoding
/// consumes: string-encoded account ids, raw data bytes, string program id.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct ExternalInstruction {
    pub program_id: String,
    pub keys: Vec<ExternalAccountMeta>,
    pub data: Vec<u8>,
}

impl From<&Instruction> for ExternalInstruction {
    fn from(ix: &Instruction) -> Self {
        Self {
            program_id: ix.program_id.to_string(),
            keys: ix
                .accounts
                .iter()
                .map(|meta| ExternalAccountMeta {
                    pubkey: meta.pubkey.to_string(),
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
            data: ix.data.clone(),
        }
    }
}

/// Overwrite a u64 at `offset` in the instruction data with the balance of
/// the wallet at `account_index` minus `subtraction`, encoded big- or
/// little-endian per the flag.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct AmountSubstitution {
    pub account_index: u64,
    pub is_big_endian: bool,
    pub offset: u64,
    pub subtraction: u64,
}

/// Replace the account at `index` with the associated token account of the
/// execution-time submission authority for `token_mint`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct WalletSubstitution {
    pub token_mint: String,
    pub index: u64,
}

/// An external instruction plus its executor economics and substitutions.
///
/// `reward` is paid from the claimed amount to whoever executes the
/// instruction; `expenses` is its native-currency cost. An instruction whose
/// reward does not cover its expenses can only be executed by the fallback
/// authority.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct ExternalInstructionWrapper {
    pub reward: u64,
    pub expenses: u64,
    pub mandatory: bool,
    pub amount_substitutions: Vec<AmountSubstitution>,
    pub wallet_substitutions: Vec<WalletSubstitution>,
    pub instruction: ExternalInstruction,
}

impl ExternalInstructionWrapper {
    pub fn new(
        reward: u64,
        expenses: u64,
        mandatory: bool,
        amount_substitutions: Vec<AmountSubstitution>,
        wallet_substitutions: Vec<WalletSubstitution>,
        instruction: ExternalInstruction,
    ) -> Self {
        Self {
            reward,
            expenses,
            mandatory,
            amount_substitutions,
            wallet_substitutions,
            instruction,
        }
    }

    /// Serialized wire form of this instruction.
    pub fn serialize(&self) -> Result<Vec<u8>, ExternalCallError> {
        Ok(borsh::to_vec(self)?)
    }
}

/// Concatenate a wrapper sequence into the external call payload.
pub fn serialize_external_call(
    wrappers: &[ExternalInstructionWrapper],
) -> Result<Vec<u8>, ExternalCallError> {
    let mut payload = Vec::new();
    for wrapper in wrappers {
        payload.extend(wrapper.serialize()?);
    }
    Ok(payload)
}

/// Idempotently create `destination`'s token account, paid for by the
/// submission authority.
///
/// The created account sits at position 1 of the instruction; it is marked
/// for wallet substitution so the executor re-points it at the real
/// authority's associated token account. `account_rent` is the rent-exempt
/// balance of a token account, part of the executor's expenses on top of the
/// signature fee.
pub fn init_destination_wallet(
    token_mint: &Pubkey,
    destination: &Pubkey,
    account_rent: u64,
    reward: u64,
) -> ExternalInstructionWrapper {
    let ix = create_associated_token_account_idempotent(
        &SUBMISSION_AUTH_PLACEHOLDER,
        destination,
        token_mint,
        &spl_token::id(),
    );

    ExternalInstructionWrapper::new(
        reward,
        LAMPORTS_PER_SIGNATURE + account_rent,
        false,
        vec![],
        vec![WalletSubstitution {
            token_mint: token_mint.to_string(),
            index: 1,
        }],
        ExternalInstruction::from(&ix),
    )
}

/// Move the entire claimed balance from the submission authority's wallet to
/// `destination`'s token account.
///
/// The source wallet (position 0) is wallet-substituted, since an associated
/// token account computed from the placeholder points nowhere. The
/// placeholder amount of 1 is overwritten with the source wallet's
/// balance: offset 1 skips the token instruction tag, little-endian matches
/// the token program's encoding, zero subtraction claims everything.
pub fn transfer_full_balance(
    token_mint: &Pubkey,
    destination: &Pubkey,
    reward: u64,
) -> Result<ExternalInstructionWrapper, ExternalCallError> {
    let source = get_associated_token_address(&SUBMISSION_AUTH_PLACEHOLDER, token_mint);
    let destination_wallet = get_associated_token_address(destination, token_mint);
    let ix = spl_token::instruction::transfer(
        &spl_token::id(),
        &source,
        &destination_wallet,
        &SUBMISSION_AUTH_PLACEHOLDER,
        &[],
        1,
    )?;

    Ok(ExternalInstructionWrapper::new(
        reward,
        LAMPORTS_PER_SIGNATURE,
        false,
        vec![AmountSubstitution {
            account_index: 0,
            is_big_endian: false,
            offset: 1,
            subtraction: 0,
        }],
        vec![WalletSubstitution {
            token_mint: token_mint.to_string(),
            index: 0,
        }],
        ExternalInstruction::from(&ix),
    ))
}

/// Build the payload that forwards a claimed transfer to a list of
/// destination wallets: for each wallet, initialize its token account, then
/// hand it the claimed remainder.
pub fn build_transfer_external_call(
    token_mint: &Pubkey,
    destinations: &[Pubkey],
    account_rent: u64,
) -> Result<Vec<u8>, ExternalCallError> {
    let mut wrappers = Vec::with_capacity(destinations.len() * 2);
    for destination in destinations {
        wrappers.push(init_destination_wallet(
            token_mint,
            destination,
            account_rent,
            DEFAULT_INIT_WALLET_REWARD,
        ));
        wrappers.push(transfer_full_balance(
            token_mint,
            destination,
            DEFAULT_TRANSFER_REWARD,
        )?);
    }
    serialize_external_call(&wrappers)
}
