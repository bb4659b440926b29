//! Signing, encoding, and submitting the built instruction.

use base64::{engine::general_purpose::STANDARD, Engine};
use log::info;
use solana_sdk::{
    instruction::Instruction,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use thiserror::Error;

use crate::provider::{ProviderError, SolanaProviderTrait};

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Failed to serialize transaction: {0}")]
    Serialize(String),
}

/// Base64 wire encoding of a transaction.
pub fn encode_base64(transaction: &Transaction) -> Result<String, TransactionError> {
    let serialized = bincode::serialize(transaction)
        .map_err(|e| TransactionError::Serialize(e.to_string()))?;
    Ok(STANDARD.encode(serialized))
}

/// Sign the instruction with a fresh blockhash and print the serialized
/// transaction to stdout. With `submit`, also send it and print the
/// signature.
pub async fn sign_print_and_maybe_submit<P: SolanaProviderTrait>(
    provider: &P,
    wallet: &Keypair,
    instruction: Instruction,
    submit: bool,
) -> Result<Option<Signature>, TransactionError> {
    let blockhash = provider.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&wallet.pubkey()),
        &[wallet],
        blockhash,
    );

    println!("{}", encode_base64(&transaction)?);

    if !submit {
        info!("Transaction not submitted; pass --submit to send it");
        return Ok(None);
    }

    let signature = provider.send_transaction(&transaction).await?;
    println!("{signature}");
    info!("Sent transaction: {signature}");
    Ok(Some(signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{pubkey::Pubkey, system_instruction};

    #[test]
    fn test_encode_base64_is_decodable() {
        let payer = Keypair::new();
        let ix = system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1_000);
        let transaction =
            Transaction::new_with_payer(&[ix], Some(&payer.pubkey()));

        let encoded = encode_base64(&transaction).unwrap();
        let decoded: Transaction =
            bincode::deserialize(&STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded.message, transaction.message);
    }
}
