//! Configuration management
//!
//! Static per-network constant tables (token catalog, AMM factories,
//! contract address, gas and profit parameters) selected by a validated
//! network identifier. Unknown identifiers are rejected at startup, not
//! deep inside a helper. Secrets (RPC_URL, PRIVATE_KEY) come from the
//! environment via dotenv; everything else is compiled in.
//!
//! Author: AI-Generated
//! Created: 2026-08-03
//! Modified: 2026-08-05 - subgraph/oracle endpoints overridable via env

use crate::types::Token;
use ethers::types::{Address, U256};
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;

/// Networks this bot knows how to trade on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Polygon,
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polygon" => Ok(Network::Polygon),
            other => anyhow::bail!("Unsupported network: '{}'. Supported: polygon", other),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Polygon => write!(f, "polygon"),
        }
    }
}

/// Process-wide static configuration, loaded once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub network: Network,
    pub chain_id: u64,
    /// External flash-arbitrage contract.
    pub contract_address: Address,
    /// WMATIC — profit in this token is converted to USD via the oracle.
    pub wrapped_native: Address,
    /// Fixed gas price for submissions, in wei.
    pub gas_price: U256,
    /// Fixed gas limit for submissions.
    pub gas_limit: u64,
    /// Minimum net profit (USD) required before submitting.
    pub minimum_profit_usd: f64,
    /// Concurrent per-combination evaluations per tick.
    pub concurrency: usize,
    pub poll_interval_ms: u64,
    /// Per-combination evaluation timeout; a hung external call forfeits
    /// only that combination's slot for the tick.
    pub fetch_timeout_ms: u64,
    /// V3 fee tiers probed during pool resolution.
    pub v3_fee_tiers: Vec<u32>,
    pub subgraph_url: String,
    pub price_oracle_url: String,
}

fn token(symbol: &str, address: &str) -> Token {
    Token::new(symbol, address.parse().expect("static token address"))
}

static POLYGON_BASE_TOKENS: Lazy<Vec<Token>> = Lazy::new(|| {
    vec![
        token("WMATIC", "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
        token("USDT", "0xc2132D05D31c914a87C6611C10748AEb04B58e8F"),
        token("USDC", "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"),
    ]
});

static POLYGON_QUOTE_TOKENS: Lazy<Vec<Token>> = Lazy::new(|| {
    vec![
        token("LINK", "0x53e0bca35ec356bd5dddfebbd1fc0fd03fabad39"),
        token("ETH", "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619"),
        token("DAI", "0x6b175474e89094c44da98b954eedeac495271d0f"),
        token("AAVE", "0x7fc66500c84a76ad7e9c93437bfc5ac33e2ddae9"),
        token("UNI", "0xb33eaad8d922b1083446dc23f610c2567fb5180f"),
        token("SUSHI", "0x0b3f868e0be5597d5db7feb59e1cadbb0fdda50a"),
        token("QUICK", "0x831753dd7087cac61ab5644b308642cc1c33dc13"),
        token("BUSD", "0xdab529f40e671a1d4bf91361c21bf9f0c9712ab7"),
    ]
});

static POLYGON_V2_FACTORIES: Lazy<Vec<(String, Address)>> = Lazy::new(|| {
    [
        ("quickswap", "0x5757371414417b8C6CAad45bAeF941aBc7d3Ab32"),
        ("apeswap", "0xCf083Be4164828f00cAE704EC15a36D711491284"),
        ("sushiswap", "0xc35DADB65012eC5796536bD9864eD8773aBc74C4"),
        ("dfyn", "0xE7Fb3e833eFE5F9c441105EB65Ef8b261266423B"),
        ("jetswap", "0x668ad0ed2622C62E24f0d5ab6B6Ac1b9D2cD4AC7"),
    ]
    .iter()
    .map(|(name, addr)| {
        (
            name.to_string(),
            addr.parse().expect("static factory address"),
        )
    })
    .collect()
});

static POLYGON_V3_FACTORY: Lazy<Address> = Lazy::new(|| {
    "0x1F98431c8aD98523631AE4a59f267346ea31F984"
        .parse()
        .expect("static V3 factory address")
});

const POLYGON_FLASH_CONTRACT: &str = "0xaDBE79DdAC961a2ea340E5595C94D67675c0b1B7";
const POLYGON_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/uniswap/uniswap-v3-polygon";
const POLYGON_PRICE_ORACLE_URL: &str =
    "https://api.polygonscan.com/api?module=stats&action=maticPrice";

/// Base tokens (loan/settlement currencies) for a network.
pub fn base_tokens(network: Network) -> &'static [Token] {
    match network {
        Network::Polygon => &POLYGON_BASE_TOKENS,
    }
}

/// Quote/intermediate tokens for a network.
pub fn quote_tokens(network: Network) -> &'static [Token] {
    match network {
        Network::Polygon => &POLYGON_QUOTE_TOKENS,
    }
}

/// V2-style AMM factories probed during pair resolution.
pub fn v2_factories(network: Network) -> &'static [(String, Address)] {
    match network {
        Network::Polygon => &POLYGON_V2_FACTORIES,
    }
}

/// V3 factory used for triangle resolution.
pub fn v3_factory(network: Network) -> Address {
    match network {
        Network::Polygon => *POLYGON_V3_FACTORY,
    }
}

/// Build the process-wide configuration for a validated network.
pub fn load_config(network: Network) -> BotConfig {
    match network {
        Network::Polygon => BotConfig {
            network,
            chain_id: 137,
            contract_address: POLYGON_FLASH_CONTRACT
                .parse()
                .expect("static contract address"),
            wrapped_native: POLYGON_BASE_TOKENS[0].address,
            // 200 gwei
            gas_price: U256::from(200u64) * U256::exp10(9),
            gas_limit: 310_000,
            minimum_profit_usd: 10.0,
            concurrency: 50,
            poll_interval_ms: 1_000,
            fetch_timeout_ms: 10_000,
            v3_fee_tiers: vec![3_000],
            subgraph_url: std::env::var("SUBGRAPH_URL")
                .unwrap_or_else(|_| POLYGON_SUBGRAPH_URL.to_string()),
            price_oracle_url: std::env::var("PRICE_ORACLE_URL")
                .unwrap_or_else(|_| POLYGON_PRICE_ORACLE_URL.to_string()),
        },
    }
}
