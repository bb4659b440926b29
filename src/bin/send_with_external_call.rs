//! Send tokens together with an external call executed on the target chain
//! after the transfer is claimed.

use bridge_sender::{
    cli::{self, SendArgs},
    context::{ExternalCallInput, SendContextBuilder, SendRequest},
    external_call, flags,
    instructions::{self, SendWithExternalCall},
    transaction, utils, AddressResolver, SolanaProvider,
};
use clap::Parser;
use log::info;
use solana_sdk::signer::Signer;

#[derive(Parser, Debug)]
#[command(about = "Send tokens with an external call on the target chain")]
struct Args {
    #[command(flatten)]
    send: SendArgs,

    /// Amount of tokens to send, in base units; fees are taken from it.
    #[arg(long)]
    amount: u64,

    /// Reward for executing the call on the target chain.
    #[arg(long = "exec-fee")]
    execution_fee: u64,

    /// Hex-encoded authority that may cancel the call and recover the funds.
    #[arg(long)]
    fallback: String,

    /// Hex-encoded external call payload.
    #[arg(long)]
    data: String,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    let config = cli::init_script()?;

    let provider = SolanaProvider::new(&config.rpc_url);
    let resolver = AddressResolver::new(config.bridge_program, config.settings_program);
    let builder = SendContextBuilder::new(&provider, resolver);

    let data = utils::parse_hex(&args.data)?;
    let fallback_address = utils::parse_hex(&args.fallback)?;
    info!(
        "External call of {} bytes, shortcut {}",
        data.len(),
        hex::encode(external_call::external_call_shortcut(&data))
    );

    let request = SendRequest {
        sender: config.wallet.pubkey(),
        token_mint: args.send.token_mint,
        target_chain_id: utils::normalize_chain_id(args.send.target_chain),
        receiver: utils::parse_hex(&args.send.receiver)?,
        use_asset_fee: false,
        external_call: Some(ExternalCallInput {
            data: data.clone(),
            flags: flags::empty(),
            fallback_address: fallback_address.clone(),
        }),
    };
    let accounts = builder.build(args.send.mode, &request).await?;

    let instruction = instructions::send_with_external_call(
        &config.sender_program,
        &SendWithExternalCall {
            amount: args.amount,
            target_chain_id: request.target_chain_id,
            receiver: request.receiver.clone(),
            execution_fee: args.execution_fee,
            fallback_address,
            external_call: data,
        },
        &accounts,
    )?;

    transaction::sign_print_and_maybe_submit(&provider, &config.wallet, instruction, args.send.submit)
        .await?;

    Ok(())
}
