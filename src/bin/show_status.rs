//! Contract Status Inspector
//!
//! Purpose:
//!     Prints the flash-arbitrage contract's owner and registered base
//!     tokens. Read-only; needs no signer.
//!
//! Author: AI-Generated
//! Created: 2026-08-05
//!
//! Usage:
//!     cargo run --bin show-status -- --network polygon

use anyhow::{Context, Result};
use clap::Parser;
use ethers::prelude::*;
use flasharb_bot::config::{self, Network};
use flasharb_bot::contracts::FlashArbitrage;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, Level};

/// Show flash-arbitrage contract status
#[derive(Parser)]
#[command(name = "show-status")]
struct Args {
    /// Network to inspect (polygon)
    #[arg(short, long, env = "NETWORK", default_value = "polygon")]
    network: String,
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
    let provider = Arc::new(provider);

    let contract = FlashArbitrage::new(config.contract_address, provider);

    let owner = contract.owner().call().await.context("owner() failed")?;
    info!("Owner: {:?}", owner);

    let tokens = contract
        .get_base_tokens()
        .call()
        .await
        .context("getBaseTokens() failed")?;
    info!("Base tokens ({}):", tokens.len());
    for token in tokens {
        info!("  {:?}", token);
    }

    Ok(())
}
