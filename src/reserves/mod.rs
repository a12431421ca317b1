//! Reserve and liquidity data: on-chain V2 reserves, subgraph-backed
//! V3 position liquidity. Fetched fresh every polling cycle.
//!
//! Author: AI-Generated
//! Created: 2026-08-04

pub mod fetcher;
pub mod subgraph;

pub use fetcher::{ChainReserveSource, ReserveSource};
pub use subgraph::SubgraphClient;
