//! Send context assembly.
//!
//! Every send instruction carries the same 18-account list in a fixed
//! order, whichever way the addresses were obtained. `manual` derives
//! everything locally and performs no checks; `client` additionally queries
//! live chain state and validates the request against it. Both modes fall
//! back to the protocol's well-known default accounts when the optional
//! discount or asset-fee records cannot be fetched.

use clap::ValueEnum;
use log::debug;
use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, system_program};
use spl_associated_token_account::get_associated_token_address;
use thiserror::Error;

use crate::{
    accounts::{AccountError, AssetFeeInfo, ChainSupportInfo, DiscountInfo, ProtocolAccount, State},
    external_call::external_call_shortcut,
    fees::FeeEstimator,
    flags,
    pda::AddressResolver,
    provider::{ProviderError, SolanaProviderTrait},
};

#[derive(Error, Debug)]
pub enum ContextError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Failed to decode {account} account: {source}")]
    Account {
        account: &'static str,
        source: AccountError,
    },

    #[error("Target chain is not supported")]
    ChainNotSupported,

    #[error("Receiver length {got} does not match the chain address length {expected}")]
    ReceiverLength { expected: u16, got: usize },

    #[error("Fallback address length {got} does not match the chain address length {expected}")]
    FallbackLength { expected: u16, got: usize },

    #[error("Asset fee is not available for the target chain")]
    AssetFeeNotAvailable,

    #[error("Hashed call data must be 32 bytes, got {0}")]
    InvalidHashedData(usize),
}

/// How protocol addresses are obtained.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// Query and validate live on-chain state.
    #[default]
    Client,
    /// Derive everything locally; no checks are performed.
    Manual,
}

/// External call portion of a send request.
pub struct ExternalCallInput {
    pub data: Vec<u8>,
    /// Reserved flag word; see [`crate::flags`].
    pub flags: [u8; 32],
    pub fallback_address: Vec<u8>,
}

/// Inputs the context builder turns into the account list.
pub struct SendRequest {
    pub sender: Pubkey,
    pub token_mint: Pubkey,
    pub target_chain_id: [u8; 32],
    pub receiver: Vec<u8>,
    pub use_asset_fee: bool,
    pub external_call: Option<ExternalCallInput>,
}

/// The resolved account list of a send, in protocol order.
#[derive(Clone, Debug, PartialEq)]
pub struct SendAccounts {
    pub bridge: Pubkey,
    pub token_mint: Pubkey,
    pub staking_wallet: Pubkey,
    pub mint_authority: Pubkey,
    pub chain_support_info: Pubkey,
    pub settings_program: Pubkey,
    pub token_program: Pubkey,
    pub state: Pubkey,
    pub fee_beneficiary: Pubkey,
    pub nonce_storage: Pubkey,
    pub send_from_wallet: Pubkey,
    pub system_program: Pubkey,
    pub external_call_storage: Pubkey,
    pub external_call_meta: Pubkey,
    pub send_from: Pubkey,
    pub discount_info: Pubkey,
    pub asset_fee_info: Pubkey,
    pub bridge_program: Pubkey,
}

impl SendAccounts {
    pub const LEN: usize = 18;

    /// Account metas in the fixed order and mutability template the bridge
    /// program expects. Only the sender signs.
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.bridge, false),
            AccountMeta::new(self.token_mint, false),
            AccountMeta::new(self.staking_wallet, false),
            AccountMeta::new_readonly(self.mint_authority, false),
            AccountMeta::new_readonly(self.chain_support_info, false),
            AccountMeta::new_readonly(self.settings_program, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new(self.state, false),
            AccountMeta::new(self.fee_beneficiary, false),
            AccountMeta::new(self.nonce_storage, false),
            AccountMeta::new(self.send_from_wallet, false),
            AccountMeta::new_readonly(self.system_program, false),
            AccountMeta::new(self.external_call_storage, false),
            AccountMeta::new(self.external_call_meta, false),
            AccountMeta::new(self.send_from, true),
            AccountMeta::new_readonly(self.discount_info, false),
            AccountMeta::new_readonly(self.asset_fee_info, false),
            AccountMeta::new_readonly(self.bridge_program, false),
        ]
    }
}

pub struct SendContextBuilder<'a, P> {
    provider: &'a P,
    resolver: AddressResolver,
}

impl<'a, P: SolanaProviderTrait> SendContextBuilder<'a, P> {
    pub fn new(provider: &'a P, resolver: AddressResolver) -> Self {
        Self { provider, resolver }
    }

    pub async fn build(
        &self,
        mode: ResolveMode,
        request: &SendRequest,
    ) -> Result<SendAccounts, ContextError> {
        match mode {
            ResolveMode::Manual => self.build_manual(request).await,
            ResolveMode::Client => self.build_with_client(request).await,
        }
    }

    /// Derive every address locally. Only the state account is fetched (the
    /// fee beneficiary lives there); nothing about the request is validated.
    async fn build_manual(&self, request: &SendRequest) -> Result<SendAccounts, ContextError> {
        let shortcut = external_call_shortcut(
            request
                .external_call
                .as_ref()
                .map(|call| call.data.as_slice())
                .unwrap_or_default(),
        );
        let state = self.fetch_state().await?;

        self.assemble(request, state.fee_beneficiary, shortcut).await
    }

    /// Fetch live chain state and validate the request against it before
    /// resolving the same account list as the manual path.
    async fn build_with_client(&self, request: &SendRequest) -> Result<SendAccounts, ContextError> {
        let state = self.fetch_state().await?;
        let chain_support = self.fetch_chain_support(&request.target_chain_id).await?;

        let ChainSupportInfo::Supported {
            chain_address_len, ..
        } = chain_support
        else {
            return Err(ContextError::ChainNotSupported);
        };

        if request.receiver.len() != chain_address_len as usize {
            return Err(ContextError::ReceiverLength {
                expected: chain_address_len,
                got: request.receiver.len(),
            });
        }
        if let Some(call) = &request.external_call {
            if call.fallback_address.len() != chain_address_len as usize {
                return Err(ContextError::FallbackLength {
                    expected: chain_address_len,
                    got: call.fallback_address.len(),
                });
            }
        }

        if request.use_asset_fee {
            let (bridge, _) = self.resolver.bridge(&request.token_mint);
            let info = self
                .fetch_asset_fee(&bridge, &request.target_chain_id)
                .await
                .map_err(|_| ContextError::AssetFeeNotAvailable)?;
            if info.asset_chain_fee.is_none() {
                return Err(ContextError::AssetFeeNotAvailable);
            }
        }

        let shortcut = match &request.external_call {
            Some(call) if flags::is_set(&call.flags, flags::SEND_HASHED_DATA) => call
                .data
                .as_slice()
                .try_into()
                .map_err(|_| ContextError::InvalidHashedData(call.data.len()))?,
            Some(call) => external_call_shortcut(&call.data),
            None => external_call_shortcut(&[]),
        };

        self.assemble(request, state.fee_beneficiary, shortcut).await
    }

    /// Resolve the full account list from derived addresses, the fetched fee
    /// beneficiary, and the optional-account fallbacks.
    async fn assemble(
        &self,
        request: &SendRequest,
        fee_beneficiary: Pubkey,
        shortcut: [u8; 32],
    ) -> Result<SendAccounts, ContextError> {
        let (bridge, _) = self.resolver.bridge(&request.token_mint);
        let (mint_authority, _) = self.resolver.mint_authority(&bridge);
        let (state, _) = self.resolver.state();
        let (chain_support_info, _) = self.resolver.chain_support_info(&request.target_chain_id);
        let (nonce_storage, _) = self.resolver.nonce_storage();
        let (external_call_storage, _) = self
            .resolver
            .external_call_storage(&shortcut, &request.sender);
        let (external_call_meta, _) = self.resolver.external_call_meta(&external_call_storage);

        let discount_info = self.discount_or_default(&request.sender).await;
        let asset_fee_info = self
            .asset_fee_or_default(&bridge, &request.target_chain_id)
            .await;

        Ok(SendAccounts {
            bridge,
            token_mint: request.token_mint,
            staking_wallet: get_associated_token_address(&mint_authority, &request.token_mint),
            mint_authority,
            chain_support_info,
            settings_program: self.resolver.settings_program,
            token_program: spl_token::id(),
            state,
            fee_beneficiary,
            nonce_storage,
            send_from_wallet: get_associated_token_address(&request.sender, &request.token_mint),
            system_program: system_program::id(),
            external_call_storage,
            external_call_meta,
            send_from: request.sender,
            discount_info,
            asset_fee_info,
            bridge_program: self.resolver.bridge_program,
        })
    }

    async fn fetch_state(&self) -> Result<State, ContextError> {
        let (address, _) = self.resolver.state();
        let account = self.provider.get_account(&address).await?;
        State::try_from_data(&account.data).map_err(|source| ContextError::Account {
            account: "state",
            source,
        })
    }

    async fn fetch_chain_support(
        &self,
        target_chain_id: &[u8; 32],
    ) -> Result<ChainSupportInfo, ContextError> {
        let (address, _) = self.resolver.chain_support_info(target_chain_id);
        let account = self
            .provider
            .get_account(&address)
            .await
            .map_err(|_| ContextError::ChainNotSupported)?;
        ChainSupportInfo::try_from_data(&account.data).map_err(|source| ContextError::Account {
            account: "chain support info",
            source,
        })
    }

    async fn fetch_asset_fee(
        &self,
        bridge: &Pubkey,
        target_chain_id: &[u8; 32],
    ) -> Result<AssetFeeInfo, ContextError> {
        let (address, _) = self.resolver.asset_fee_info(bridge, target_chain_id);
        let account = self.provider.get_account(&address).await?;
        AssetFeeInfo::try_from_data(&account.data).map_err(|source| ContextError::Account {
            account: "asset fee info",
            source,
        })
    }

    /// Discount record of the sender, or the no-discount default when it
    /// cannot be fetched or decoded.
    async fn discount_or_default(&self, sender: &Pubkey) -> Pubkey {
        let (discount, _) = self.resolver.discount_info(sender);
        match self.provider.get_account(&discount).await {
            Ok(account) if DiscountInfo::try_from_data(&account.data).is_ok() => discount,
            _ => {
                debug!("No discount record for {sender}, using the default");
                self.resolver.default_discount().0
            }
        }
    }

    /// Asset-fee record for the bridge and chain, or the no-fee default when
    /// it cannot be fetched or decoded.
    async fn asset_fee_or_default(&self, bridge: &Pubkey, target_chain_id: &[u8; 32]) -> Pubkey {
        match self.fetch_asset_fee(bridge, target_chain_id).await {
            Ok(_) => self.resolver.asset_fee_info(bridge, target_chain_id).0,
            Err(_) => {
                debug!("No asset fee record for bridge {bridge}, using the default");
                self.resolver.default_asset_fee().0
            }
        }
    }

    /// Fetch everything [`FeeEstimator`] needs for a mint and target chain.
    pub async fn fetch_fee_estimator(
        &self,
        token_mint: &Pubkey,
        target_chain_id: &[u8; 32],
    ) -> Result<FeeEstimator, ContextError> {
        let state = self.fetch_state().await?;
        let chain_support_info = self.fetch_chain_support(target_chain_id).await?;
        let (bridge, _) = self.resolver.bridge(token_mint);
        let asset_fee_info = self.fetch_asset_fee(&bridge, target_chain_id).await.ok();

        Ok(FeeEstimator {
            state,
            chain_support_info,
            asset_fee_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use solana_sdk::account::Account;

    use crate::{
        accounts::ProtocolStatus,
        provider::MockSolanaProviderTrait,
        utils::normalize_chain_id,
    };

    fn frame<T: ProtocolAccount + borsh::BorshSerialize>(value: &T) -> Vec<u8> {
        let mut data = T::DISCRIMINATOR.to_vec();
        data.extend(borsh::to_vec(value).unwrap());
        data
    }

    fn account_with_data(data: Vec<u8>) -> Account {
        Account {
            lamports: 1_000_000,
            data,
            owner: Pubkey::new_unique(),
            executable: false,
            rent_epoch: 0,
        }
    }

    fn test_state(fee_beneficiary: Pubkey) -> State {
        State {
            status: ProtocolStatus::Working,
            protocol_authority: Pubkey::new_unique(),
            stop_tap: Pubkey::new_unique(),
            fee_beneficiary,
            global_fixed_fee: 1_000_000,
            global_transfer_fee_bps: 10,
        }
    }

    struct Fixture {
        resolver: AddressResolver,
        accounts: HashMap<Pubkey, Account>,
        fee_beneficiary: Pubkey,
        sender: Pubkey,
        token_mint: Pubkey,
        target_chain_id: [u8; 32],
    }

    impl Fixture {
        /// State and a supported 20-byte-address chain; no discount, no
        /// asset fee records.
        fn new() -> Self {
            let resolver = AddressResolver::new(Pubkey::new_unique(), Pubkey::new_unique());
            let fee_beneficiary = Pubkey::new_unique();
            let target_chain_id = normalize_chain_id(137);

            let mut accounts = HashMap::new();
            accounts.insert(
                resolver.state().0,
                account_with_data(frame(&test_state(fee_beneficiary))),
            );
            accounts.insert(
                resolver.chain_support_info(&target_chain_id).0,
                account_with_data(frame(&ChainSupportInfo::Supported {
                    fixed_fee: None,
                    transfer_fee_bps: None,
                    chain_address_len: 20,
                })),
            );

            Self {
                resolver,
                accounts,
                fee_beneficiary,
                sender: Pubkey::new_unique(),
                token_mint: Pubkey::new_unique(),
                target_chain_id,
            }
        }

        fn with_discount(mut self) -> Self {
            self.accounts.insert(
                self.resolver.discount_info(&self.sender).0,
                account_with_data(frame(&DiscountInfo {
                    discount_fix_bps: 100,
                    discount_transfer_bps: 50,
                })),
            );
            self
        }

        fn with_asset_fee(mut self, asset_chain_fee: Option<u64>) -> Self {
            let (bridge, _) = self.resolver.bridge(&self.token_mint);
            self.accounts.insert(
                self.resolver.asset_fee_info(&bridge, &self.target_chain_id).0,
                account_with_data(frame(&AssetFeeInfo {
                    asset_fee_bump: 255,
                    asset_chain_fee,
                })),
            );
            self
        }

        fn provider(&self) -> MockSolanaProviderTrait {
            let accounts = self.accounts.clone();
            let mut provider = MockSolanaProviderTrait::new();
            provider.expect_get_account().returning(move |pubkey| {
                let result = accounts
                    .get(pubkey)
                    .cloned()
                    .ok_or(ProviderError::AccountNotFound(*pubkey));
                Box::pin(async move { result })
            });
            provider
        }

        fn request(&self) -> SendRequest {
            SendRequest {
                sender: self.sender,
                token_mint: self.token_mint,
                target_chain_id: self.target_chain_id,
                receiver: vec![0x11; 20],
                use_asset_fee: false,
                external_call: None,
            }
        }
    }

    #[tokio::test]
    async fn test_manual_and_client_modes_are_positionally_equivalent() {
        let fixture = Fixture::new();
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);

        let manual = builder
            .build(ResolveMode::Manual, &fixture.request())
            .await
            .unwrap();
        let client = builder
            .build(ResolveMode::Client, &fixture.request())
            .await
            .unwrap();

        assert_eq!(manual, client);
        assert_eq!(manual.to_account_metas(), client.to_account_metas());
        assert_eq!(manual.to_account_metas().len(), SendAccounts::LEN);
    }

    #[tokio::test]
    async fn test_account_template_signer_and_writable_flags() {
        let fixture = Fixture::new();
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);

        let accounts = builder
            .build(ResolveMode::Manual, &fixture.request())
            .await
            .unwrap();
        let metas = accounts.to_account_metas();

        let signers: Vec<usize> = metas
            .iter()
            .enumerate()
            .filter(|(_, meta)| meta.is_signer)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(signers, vec![14]);
        assert_eq!(metas[14].pubkey, fixture.sender);

        let writable: Vec<usize> = metas
            .iter()
            .enumerate()
            .filter(|(_, meta)| meta.is_writable)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(writable, vec![0, 1, 2, 7, 8, 9, 10, 12, 13, 14]);

        assert_eq!(metas[8].pubkey, fixture.fee_beneficiary);
        assert_eq!(metas[17].pubkey, fixture.resolver.bridge_program);
    }

    #[tokio::test]
    async fn test_missing_discount_falls_back_to_default() {
        let fixture = Fixture::new();
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);

        let accounts = builder
            .build(ResolveMode::Client, &fixture.request())
            .await
            .unwrap();
        assert_eq!(accounts.discount_info, fixture.resolver.default_discount().0);
        assert_eq!(
            accounts.asset_fee_info,
            fixture.resolver.default_asset_fee().0
        );
    }

    #[tokio::test]
    async fn test_existing_discount_and_asset_fee_records_are_used() {
        let fixture = Fixture::new().with_discount().with_asset_fee(Some(500));
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);

        let accounts = builder
            .build(ResolveMode::Client, &fixture.request())
            .await
            .unwrap();
        assert_eq!(
            accounts.discount_info,
            fixture.resolver.discount_info(&fixture.sender).0
        );
        let (bridge, _) = fixture.resolver.bridge(&fixture.token_mint);
        assert_eq!(
            accounts.asset_fee_info,
            fixture
                .resolver
                .asset_fee_info(&bridge, &fixture.target_chain_id)
                .0
        );
    }

    #[tokio::test]
    async fn test_client_rejects_unsupported_chain() {
        let mut fixture = Fixture::new();
        fixture.accounts.insert(
            fixture.resolver.chain_support_info(&fixture.target_chain_id).0,
            account_with_data(frame(&ChainSupportInfo::NotSupported)),
        );
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);

        let err = builder
            .build(ResolveMode::Client, &fixture.request())
            .await
            .unwrap_err();
        assert!(matches!(err, ContextError::ChainNotSupported));

        // the manual path performs no such check
        builder
            .build(ResolveMode::Manual, &fixture.request())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_client_rejects_wrong_receiver_length() {
        let fixture = Fixture::new();
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);

        let mut request = fixture.request();
        request.receiver = vec![0x11; 32];

        let err = builder
            .build(ResolveMode::Client, &request)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ContextError::ReceiverLength {
                expected: 20,
                got: 32
            }
        ));
    }

    #[tokio::test]
    async fn test_client_requires_asset_fee_when_requested() {
        let fixture = Fixture::new();
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);

        let mut request = fixture.request();
        request.use_asset_fee = true;
        let err = builder
            .build(ResolveMode::Client, &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ContextError::AssetFeeNotAvailable));

        // a record with no fee set is just as unavailable
        let fixture = Fixture::new().with_asset_fee(None);
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);
        let mut request = fixture.request();
        request.use_asset_fee = true;
        let err = builder
            .build(ResolveMode::Client, &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ContextError::AssetFeeNotAvailable));
    }

    #[tokio::test]
    async fn test_hashed_data_flag_changes_shortcut_source() {
        let fixture = Fixture::new();
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);

        let payload = b"call data".to_vec();
        let shortcut = external_call_shortcut(&payload);

        let mut request = fixture.request();
        request.external_call = Some(ExternalCallInput {
            data: shortcut.to_vec(),
            flags: crate::flags::from_bits(&[crate::flags::SEND_HASHED_DATA]),
            fallback_address: vec![0x22; 20],
        });
        let hashed = builder.build(ResolveMode::Client, &request).await.unwrap();

        let mut request = fixture.request();
        request.external_call = Some(ExternalCallInput {
            data: payload,
            flags: crate::flags::empty(),
            fallback_address: vec![0x22; 20],
        });
        let plain = builder.build(ResolveMode::Client, &request).await.unwrap();

        assert_eq!(hashed.external_call_storage, plain.external_call_storage);
        assert_eq!(
            hashed.external_call_storage,
            fixture
                .resolver
                .external_call_storage(&shortcut, &fixture.sender)
                .0
        );
    }

    #[tokio::test]
    async fn test_fee_estimator_fetch() {
        let fixture = Fixture::new().with_asset_fee(Some(500));
        let provider = fixture.provider();
        let builder = SendContextBuilder::new(&provider, fixture.resolver);

        let estimator = builder
            .fetch_fee_estimator(&fixture.token_mint, &fixture.target_chain_id)
            .await
            .unwrap();
        assert_eq!(estimator.transfer_fee_bps().unwrap(), 10);
        assert_eq!(estimator.asset_fixed_fee().unwrap(), 500);
        assert_eq!(estimator.state.fee_beneficiary, fixture.fee_beneficiary);
    }
}
