//! Flash-Loan Arbitrage Bot
//!
//! Main entry point. Loads the static per-network configuration,
//! connects to the chain, loads (or resolves and caches) the token
//! combinations, then hands everything to the polling driver:
//! fetch reserves -> select path -> estimate profit -> submit.
//!
//! Startup failures — unknown network, malformed combination cache,
//! unreachable RPC — are fatal and exit non-zero. Everything after the
//! loop starts is recovered per combination, per cycle.
//!
//! Author: AI-Generated
//! Created: 2026-08-03
//! Modified: 2026-08-06 - dry-run default, --live flag for submission

use anyhow::{Context, Result};
use clap::Parser;
use ethers::prelude::*;
use flasharb_bot::arbitrage::{Driver, OnchainFlashContract};
use flasharb_bot::combinations::{self, OnchainResolver};
use flasharb_bot::config::{self, Network};
use flasharb_bot::oracle::PolygonScanOracle;
use flasharb_bot::reserves::{ChainReserveSource, SubgraphClient};
use flasharb_bot::types::AmmKind;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn, Level};

/// Hardhat dev account #0 — placeholder signer for dry runs only.
const DEV_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Flash-Loan Arbitrage Bot — Polygon
#[derive(Parser)]
#[command(name = "flasharb-bot")]
struct Args {
    /// Network to run on (polygon)
    #[arg(short, long, env = "NETWORK", default_value = "polygon")]
    network: String,

    /// Enable live submission (default: dry run)
    #[arg(long)]
    live: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let args = Args::parse();
    let network = Network::from_str(&args.network)?;
    info!("Flash arbitrage bot starting — network: {}", network);

    dotenv::dotenv().ok();
    let config = config::load_config(network);
    info!("Contract: {:?}", config.contract_address);
    info!(
        "Gas: {} wei price, {} limit | min profit: {} USD | concurrency: {}",
        config.gas_price, config.gas_limit, config.minimum_profit_usd, config.concurrency
    );

    // Chain provider
    let rpc_url =
        std::env::var("RPC_URL").unwrap_or_else(|_| "https://polygon-rpc.com".to_string());
    info!("RPC URL: {}", &rpc_url[..40.min(rpc_url.len())]);
    let provider = Provider::<Http>::try_from(rpc_url.as_str()).context("invalid RPC URL")?;
    let provider = Arc::new(provider);

    // Verify connection
    let block = provider
        .get_block_number()
        .await
        .context("RPC connection check failed")?;
    info!("Connected! Current block: {}", block);

    // Combinations: a parseable cache skips resolution entirely
    let resolver = OnchainResolver::new(Arc::clone(&provider), config.clone());
    let cache_path = combinations::cache_file(network);
    let combos = combinations::load_or_resolve(&cache_path, &resolver).await?;
    if combos.is_empty() {
        anyhow::bail!("no usable token combinations for {}", network);
    }
    let v2_count = combos.iter().filter(|c| c.kind == AmmKind::V2).count();
    info!(
        "{} combinations ready ({} V2 pair cycles, {} V3 triangles)",
        combos.len(),
        v2_count,
        combos.len() - v2_count
    );

    // Signer (a throwaway key is fine while submissions are disabled)
    let raw_key = match std::env::var("PRIVATE_KEY") {
        Ok(key) => key,
        Err(_) if !args.live => {
            warn!("PRIVATE_KEY not set — using a placeholder dev key (dry run only)");
            DEV_PRIVATE_KEY.to_string()
        }
        Err(_) => anyhow::bail!("PRIVATE_KEY must be set for --live"),
    };
    let wallet: LocalWallet = raw_key
        .parse::<LocalWallet>()
        .context("invalid PRIVATE_KEY")?
        .with_chain_id(config.chain_id);
    info!("Wallet loaded: {:?}", wallet.address());

    let client = Arc::new(SignerMiddleware::new((*provider).clone(), wallet));
    let contract = OnchainFlashContract::new(config.contract_address, client);

    let subgraph = SubgraphClient::new(config.subgraph_url.clone());
    let reserves = ChainReserveSource::new(Arc::clone(&provider), subgraph);
    let oracle = PolygonScanOracle::new(config.price_oracle_url.clone());

    let mut driver = Driver::new(config, contract, reserves, oracle);
    if args.live {
        driver.set_live(true);
    } else {
        info!("Dry run mode — pass --live to enable submission");
    }

    info!("Start arbitraging");
    driver.run(&combos).await
}
