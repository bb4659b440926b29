//! Script configuration loaded from the environment.
//!
//! Every variable is required; a missing or malformed one is a startup
//! error that names the variable. `.env` files are honored by the binaries
//! before this module runs.

use std::env;

use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidVariable { name: &'static str, reason: String },
}

/// Addresses of the protocol programs, the signing wallet, and the RPC
/// endpoint the scripts talk to.
#[derive(Debug)]
pub struct Config {
    pub bridge_program: Pubkey,
    pub settings_program: Pubkey,
    pub sender_program: Pubkey,
    pub wallet: Keypair,
    pub rpc_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bridge_program: required_pubkey("BRIDGE_PROGRAM")?,
            settings_program: required_pubkey("SETTINGS_PROGRAM")?,
            sender_program: required_pubkey("SENDER_PROGRAM")?,
            wallet: required_keypair("WALLET")?,
            rpc_url: required("RPC_URL")?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVariable(name))
}

fn required_pubkey(name: &'static str) -> Result<Pubkey, ConfigError> {
    required(name)?
        .parse()
        .map_err(|e: solana_sdk::pubkey::ParsePubkeyError| ConfigError::InvalidVariable {
            name,
            reason: e.to_string(),
        })
}

/// Parse a hex-encoded 64-byte ed25519 secret key.
fn required_keypair(name: &'static str) -> Result<Keypair, ConfigError> {
    let raw = required(name)?;
    let stripped = raw.strip_prefix("0x").unwrap_or(&raw);
    let bytes = hex::decode(stripped).map_err(|e| ConfigError::InvalidVariable {
        name,
        reason: e.to_string(),
    })?;
    Keypair::from_bytes(&bytes).map_err(|e| ConfigError::InvalidVariable {
        name,
        reason: e.to_string(),
    })
}
