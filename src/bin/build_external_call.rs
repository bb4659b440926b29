//! Build the external call payload that forwards a claimed transfer to a
//! list of destination wallets, and print it hex-encoded.
//!
//! The payload initializes each destination's token account and hands it the
//! claimed remainder; both steps lean on wallet and amount substitutions
//! because the submission authority and the claimed balance are unknown
//! until execution time.

use bridge_sender::{
    cli,
    external_call::{build_transfer_external_call, external_call_shortcut},
    SolanaProvider, SolanaProviderTrait,
};
use clap::Parser;
use log::info;
use solana_sdk::{program_pack::Pack, pubkey::Pubkey};
use spl_token::state::Account as TokenAccount;

#[derive(Parser, Debug)]
#[command(about = "Build a transfer external call payload")]
struct Args {
    /// Mint of the token being claimed on the destination chain.
    #[arg(long = "mint")]
    token_mint: Pubkey,

    /// Destination wallets receiving the claimed tokens.
    #[arg(long = "dest", required = true, num_args = 1..)]
    destinations: Vec<Pubkey>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    let config = cli::init_script()?;

    // initializing a destination token account is part of the executor's
    // expenses, so the current rent-exempt balance goes into the payload
    let provider = SolanaProvider::new(&config.rpc_url);
    let account_rent = provider
        .get_minimum_balance_for_rent_exemption(TokenAccount::LEN)
        .await?;

    let payload =
        build_transfer_external_call(&args.token_mint, &args.destinations, account_rent)?;
    info!(
        "{} instructions, shortcut {}",
        args.destinations.len() * 2,
        hex::encode(external_call_shortcut(&payload))
    );

    println!("{}", hex::encode(payload));

    Ok(())
}
