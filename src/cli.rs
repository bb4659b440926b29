//! Shared pieces of the example scripts.

use clap::Args;
use solana_sdk::pubkey::Pubkey;

use crate::{config::Config, context::ResolveMode, logging};

/// Flags every send script takes.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Mint of the token being sent.
    #[arg(long = "mint")]
    pub token_mint: Pubkey,

    /// Hex-encoded receiver address on the target chain.
    #[arg(long)]
    pub receiver: String,

    /// Numeric id of the target chain.
    #[arg(long = "chain")]
    pub target_chain: u64,

    /// How protocol addresses are resolved.
    #[arg(long, value_enum, default_value = "client")]
    pub mode: ResolveMode,

    /// Submit the transaction after printing it.
    #[arg(long)]
    pub submit: bool,
}

/// Script bootstrap: error reports, `.env`, logging, configuration.
pub fn init_script() -> eyre::Result<Config> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    logging::setup_logging();
    Ok(Config::from_env()?)
}
