//! Client-side fee estimation.
//!
//! The sender program applies these same rules on-chain; computing them
//! client-side lets the scripts report the gross amount a send will debit
//! before submitting anything.

use thiserror::Error;

use crate::{
    accounts::{AssetFeeInfo, ChainSupportInfo, State},
    constants::BPS_DENOMINATOR,
};

#[derive(Error, Debug, PartialEq)]
pub enum FeeError {
    #[error("Target chain is not supported")]
    ChainNotSupported,

    #[error("Asset fee is not available for this chain")]
    AssetFeeNotAvailable,

    #[error("Amount too big for sending. Adding fees overflows the maximum amount")]
    AmountOverflow,
}

/// Fee rules for one bridge and target chain, assembled from fetched
/// protocol accounts.
pub struct FeeEstimator {
    pub state: State,
    pub chain_support_info: ChainSupportInfo,
    pub asset_fee_info: Option<AssetFeeInfo>,
}

impl FeeEstimator {
    /// Transfer fee in bps: the chain override when set, the global default
    /// otherwise.
    pub fn transfer_fee_bps(&self) -> Result<u64, FeeError> {
        match &self.chain_support_info {
            ChainSupportInfo::NotSupported => Err(FeeError::ChainNotSupported),
            ChainSupportInfo::Supported {
                transfer_fee_bps, ..
            } => Ok(transfer_fee_bps.unwrap_or(self.state.global_transfer_fee_bps)),
        }
    }

    /// Fixed fee in lamports: the chain override when set, the global
    /// default otherwise.
    pub fn native_fixed_fee(&self) -> u64 {
        match &self.chain_support_info {
            ChainSupportInfo::Supported {
                fixed_fee: Some(fee),
                ..
            } => *fee,
            _ => self.state.global_fixed_fee,
        }
    }

    /// Fixed fee payable in the bridged asset, when the chain offers one.
    pub fn asset_fixed_fee(&self) -> Result<u64, FeeError> {
        self.asset_fee_info
            .as_ref()
            .and_then(|info| info.asset_chain_fee)
            .ok_or(FeeError::AssetFeeNotAvailable)
    }

    /// Gross up `exact_amount` so that the transfer fee leaves exactly that
    /// amount on the other side.
    pub fn with_transfer_fee(&self, exact_amount: u64) -> Result<u64, FeeError> {
        let bps = self.transfer_fee_bps()?;

        u128::from(exact_amount)
            .checked_mul(u128::from(BPS_DENOMINATOR))
            .ok_or(FeeError::AmountOverflow)?
            .checked_div(u128::from(
                BPS_DENOMINATOR
                    .checked_sub(bps)
                    .ok_or(FeeError::AmountOverflow)?,
            ))
            .ok_or(FeeError::AmountOverflow)?
            .try_into()
            .map_err(|_| FeeError::AmountOverflow)
    }

    /// Every fee a send debits on top of `exact_amount`: the execution fee,
    /// the asset fixed fee when paying it in tokens, and the transfer fee on
    /// the whole sum.
    pub fn with_all_fees(
        &self,
        exact_amount: u64,
        execution_fee: u64,
        use_asset_fee: bool,
    ) -> Result<u64, FeeError> {
        let asset_fee = if use_asset_fee {
            self.asset_fixed_fee()?
        } else {
            0
        };

        let net = exact_amount
            .checked_add(execution_fee)
            .and_then(|sum| sum.checked_add(asset_fee))
            .ok_or(FeeError::AmountOverflow)?;

        self.with_transfer_fee(net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    use crate::accounts::ProtocolStatus;

    fn estimator(
        global_transfer_fee_bps: u64,
        chain_support_info: ChainSupportInfo,
        asset_fee_info: Option<AssetFeeInfo>,
    ) -> FeeEstimator {
        FeeEstimator {
            state: State {
                status: ProtocolStatus::Working,
                protocol_authority: Pubkey::new_unique(),
                stop_tap: Pubkey::new_unique(),
                fee_beneficiary: Pubkey::new_unique(),
                global_fixed_fee: 1_000_000,
                global_transfer_fee_bps,
            },
            chain_support_info,
            asset_fee_info,
        }
    }

    fn supported(fixed_fee: Option<u64>, transfer_fee_bps: Option<u64>) -> ChainSupportInfo {
        ChainSupportInfo::Supported {
            fixed_fee,
            transfer_fee_bps,
            chain_address_len: 20,
        }
    }

    #[test]
    fn test_transfer_fee_prefers_chain_override() {
        let est = estimator(10, supported(None, Some(25)), None);
        assert_eq!(est.transfer_fee_bps().unwrap(), 25);

        let est = estimator(10, supported(None, None), None);
        assert_eq!(est.transfer_fee_bps().unwrap(), 10);
    }

    #[test]
    fn test_unsupported_chain_is_an_error() {
        let est = estimator(10, ChainSupportInfo::NotSupported, None);
        assert_eq!(est.transfer_fee_bps(), Err(FeeError::ChainNotSupported));
        // fixed fee still falls back to the global default
        assert_eq!(est.native_fixed_fee(), 1_000_000);
    }

    #[test]
    fn test_gross_up_leaves_exact_amount_after_fee() {
        // 100 bps: 9_900 * 10_000 / 9_900 = 10_000
        let est = estimator(100, supported(None, None), None);
        let gross = est.with_transfer_fee(9_900).unwrap();
        assert_eq!(gross, 10_000);

        // zero fee is the identity
        let est = estimator(0, supported(None, None), None);
        assert_eq!(est.with_transfer_fee(12_345).unwrap(), 12_345);
    }

    #[test]
    fn test_with_all_fees_adds_execution_and_asset_fee() {
        let est = estimator(
            0,
            supported(None, None),
            Some(AssetFeeInfo {
                asset_fee_bump: 255,
                asset_chain_fee: Some(500),
            }),
        );

        assert_eq!(est.with_all_fees(1_000, 100, false).unwrap(), 1_100);
        assert_eq!(est.with_all_fees(1_000, 100, true).unwrap(), 1_600);
    }

    #[test]
    fn test_asset_fee_unavailable_is_an_error() {
        let est = estimator(0, supported(None, None), None);
        assert_eq!(
            est.with_all_fees(1_000, 0, true),
            Err(FeeError::AssetFeeNotAvailable)
        );

        let est = estimator(
            0,
            supported(None, None),
            Some(AssetFeeInfo {
                asset_fee_bump: 255,
                asset_chain_fee: None,
            }),
        );
        assert_eq!(est.asset_fixed_fee(), Err(FeeError::AssetFeeNotAvailable));
    }

    #[test]
    fn test_overflow_is_reported() {
        let est = estimator(100, supported(None, None), None);
        assert_eq!(
            est.with_all_fees(u64::MAX, 1, false),
            Err(FeeError::AmountOverflow)
        );
        assert_eq!(
            est.with_transfer_fee(u64::MAX),
            Err(FeeError::AmountOverflow)
        );
    }
}
