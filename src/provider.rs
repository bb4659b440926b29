//! Thin abstraction over the Solana RPC client.
//!
//! The scripts are single-shot: every call is awaited once and failures
//! propagate to the caller. No retry policy, no failover. The trait exists
//! so context building can be exercised against a mock in tests.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// RPC transport or node-side failure.
    #[error("RPC error: {0}")]
    RpcError(String),

    /// The account does not exist at the queried commitment.
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),
}

/// Chain access required by the send scripts.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait SolanaProviderTrait: Send + Sync {
    /// Retrieves the latest blockhash.
    async fn get_latest_blockhash(&self) -> Result<Hash, ProviderError>;

    /// Retrieves an account, distinguishing "not found" from transport errors.
    async fn get_account(&self, pubkey: &Pubkey) -> Result<Account, ProviderError>;

    /// Retrieves the minimum lamport balance for rent exemption of `data_size` bytes.
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_size: usize,
    ) -> Result<u64, ProviderError>;

    /// Sends a signed transaction to the network.
    async fn send_transaction(&self, transaction: &Transaction)
        -> Result<Signature, ProviderError>;
}

pub struct SolanaProvider {
    client: RpcClient,
}

impl SolanaProvider {
    pub fn new(url: &str) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url.to_string(), CommitmentConfig::confirmed()),
        }
    }
}

#[async_trait]
impl SolanaProviderTrait for SolanaProvider {
    async fn get_latest_blockhash(&self) -> Result<Hash, ProviderError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| ProviderError::RpcError(e.to_string()))
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Account, ProviderError> {
        self.client
            .get_account_with_commitment(pubkey, self.client.commitment())
            .await
            .map_err(|e| ProviderError::RpcError(e.to_string()))?
            .value
            .ok_or(ProviderError::AccountNotFound(*pubkey))
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_size: usize,
    ) -> Result<u64, ProviderError> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_size)
            .await
            .map_err(|e| ProviderError::RpcError(e.to_string()))
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, ProviderError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(|e| ProviderError::RpcError(e.to_string()))
    }
}
