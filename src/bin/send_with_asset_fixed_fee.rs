//! Send tokens paying the fixed fee in the transferred asset.

use bridge_sender::{
    cli::{self, SendArgs},
    context::{SendContextBuilder, SendRequest},
    instructions::{self, SendWithAssetFixedFee},
    transaction, utils, AddressResolver, SolanaProvider,
};
use clap::Parser;
use log::info;
use solana_sdk::signer::Signer;

#[derive(Parser, Debug)]
#[command(about = "Send tokens paying the fixed fee in the sent asset")]
struct Args {
    #[command(flatten)]
    send: SendArgs,

    /// Amount of tokens to send, in base units; fees are taken from it.
    #[arg(long)]
    amount: u64,
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
        use_asset_fee: true,
        external_call: None,
    };
    let accounts = builder.build(args.send.mode, &request).await?;
    info!(
        "Sending {} of {} with the fixed fee paid in the asset",
        args.amount, args.send.token_mint
    );

    let instruction = instructions::send_with_asset_fixed_fee(
        &config.sender_program,
        &SendWithAssetFixedFee {
            amount: args.amount,
            target_chain_id: request.target_chain_id,
            receiver: request.receiver.clone(),
        },
        &accounts,
    )?;

    transaction::sign_print_and_maybe_submit(&provider, &config.wallet, instruction, args.send.submit)
        .await?;

    Ok(())
}
