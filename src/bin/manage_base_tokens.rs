//! Base Token Maintenance
//!
//! Purpose:
//!     Adds or removes a base token on the flash-arbitrage contract.
//!     Requires the contract owner's PRIVATE_KEY in the environment.
//!
//! Author: AI-Generated
//! Created: 2026-08-05
//!
//! Usage:
//!     cargo run --bin manage-base-tokens -- --token 0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174
//!     cargo run --bin manage-base-tokens -- --token 0x2791... --remove

use anyhow::{Context, Result};
use clap::Parser;
use ethers::prelude::*;
use flasharb_bot::config::{self, Network};
use flasharb_bot::contracts::FlashArbitrage;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, Level};

/// Add or remove a base token on the flash-arbitrage contract
#[derive(Parser)]
#[command(name = "manage-base-tokens")]
struct Args {
    /// Network to run on (polygon)
    #[arg(short, long, env = "NETWORK", default_value = "polygon")]
    network: String,

    /// Token address to add (or remove with --remove)
    #[arg(short, long)]
    token: Address,

    /// Remove the token instead of adding it
    #[arg(long)]
    remove: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let args = Args::parse();
    let network = Network::from_str(&args.network)?;

    dotenv::dotenv().ok();
    let config = config::load_config(network);

    let rpc_url =
        std::env::var("RPC_URL").unwrap_or_else(|_| "https://polygon-rpc.com".to_string());
    let provider = Provider::<Http>::try_from(rpc_url.as_str()).context("invalid RPC URL")?;

    let wallet: LocalWallet = std::env::var("PRIVATE_KEY")
        .context("PRIVATE_KEY not set")?
        .parse::<LocalWallet>()
        .context("invalid PRIVATE_KEY")?
        .with_chain_id(config.chain_id);
    info!("Signer: {:?}", wallet.address());

    let client = Arc::new(SignerMiddleware::new(provider, wallet));
    let contract = FlashArbitrage::new(config.contract_address, client);

    if args.remove {
        let call = contract.remove_base_token(args.token);
        let pending = call.send().await.context("removeBaseToken failed")?;
        let receipt = pending.await.context("confirmation failed")?;
        info!(
            "Base token removed: {:?} (tx: {:?})",
            args.token,
            receipt.map(|r| r.transaction_hash)
        );
    } else {
        let call = contract.add_base_token(args.token);
        let pending = call.send().await.context("addBaseToken failed")?;
        let receipt = pending.await.context("confirmation failed")?;
        info!(
            "Base token added: {:?} (tx: {:?})",
            args.token,
            receipt.map(|r| r.transaction_hash)
        );
    }

    Ok(())
}
