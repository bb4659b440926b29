//! Send so that the receiver gets exactly the requested amount.
//!
//! The sender program adds the transfer fee, execution fee, and optional
//! asset fixed fee on top; in client mode the gross amount is estimated and
//! logged before sending.

use bridge_sender::{
    cli::{self, SendArgs},
    context::{ResolveMode, SendContextBuilder, SendRequest},
    instructions::{self, SendWithExactAmount},
    transaction, utils, AddressResolver, SolanaProvider,
};
use clap::Parser;
use log::info;
use solana_sdk::signer::Signer;

#[derive(Parser, Debug)]
#[command(about = "Send tokens with fees added on top of an exact amount")]
struct Args {
    #[command(flatten)]
    send: SendArgs,

    /// Amount the receiver gets on the target chain, in base units.
    #[arg(long)]
    amount: u64,

    /// Reward for claiming the transfer on the target chain.
    #[arg(long = "exec-fee")]
    execution_fee: u64,

    /// Pay the fixed fee in the sent asset instead of lamports.
    #[arg(long = "asset-fee")]
    use_asset_fee: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    let config = cli::init_script()?;

    let provider = SolanaProvider::new(&config.rpc_url);
    let resolver = AddressResolver::new(config.bridge_program, config.settings_program);
    let builder = SendContextBuilder::new(&provider, resolver);

    let request = SendRequest {
        sender: config.wallet.pubkey(),
        token_mint: args.send.token_mint,
        target_chain_id: utils::normalize_chain_id(args.send.target_chain),
        receiver: utils::parse_hex(&args.send.receiver)?,
        use_asset_fee: args.use_asset_fee,
        external_call: None,
    };
    let accounts = builder.build(args.send.mode, &request).await?;

    if args.send.mode == ResolveMode::Client {
        let estimator = builder
            .fetch_fee_estimator(&args.send.token_mint, &request.target_chain_id)
            .await?;
        let gross = estimator.with_all_fees(args.amount, args.execution_fee, args.use_asset_fee)?;
        info!(
            "Sending {} so that {} arrives after fees",
            gross, args.amount
        );
    }

    let instruction = instructions::send_with_exact_amount(
        &config.sender_program,
        &SendWithExactAmount {
            exact_amount: args.amount,
            target_chain_id: request.target_chain_id,
            receiver: request.receiver.clone(),
            execution_fee: args.execution_fee,
            use_asset_fee: args.use_asset_fee,
        },
        &accounts,
    )?;

    transaction::sign_print_and_maybe_submit(&provider, &config.wallet, instruction, args.send.submit)
        .await?;

    Ok(())
}
