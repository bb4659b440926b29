//! Client-side building blocks for sending tokens and messages through the
//! bridge protocol on Solana.
//!
//! The library half resolves protocol addresses, assembles the account list a
//! send instruction carries, builds external-call payloads (including the
//! substitution descriptions for values that are only known at claim time),
//! and signs and submits the resulting transactions. The binaries under
//! `src/bin` are the example scripts that wire these pieces together.

pub mod accounts;
pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod external_call;
pub mod fees;
pub mod flags;
pub mod instructions;
pub mod logging;
pub mod pda;
pub mod provider;
pub mod transaction;
pub mod utils;

pub use config::Config;
pub use context::{ResolveMode, SendAccounts, SendContextBuilder};
pub use pda::AddressResolver;
pub use provider::{SolanaProvider, SolanaProviderTrait};
