//! Flash-Loan Arbitrage Bot Library
//!
//! Opportunity discovery and decision loop for cross-exchange flash
//! arbitrage on Polygon: combination generation and pool resolution,
//! reserve/liquidity fetching, integer profit simulation, path
//! selection, and the polling execution driver. The flash-loan
//! accounting itself lives in an external contract consumed through
//! generated bindings.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

pub mod arbitrage;
pub mod combinations;
pub mod config;
pub mod contracts;
pub mod error;
pub mod oracle;
pub mod reserves;
pub mod types;

// Re-export commonly used types
pub use arbitrage::{Driver, FlashContract, OnchainFlashContract};
pub use config::{load_config, BotConfig, Network};
pub use types::{AmmKind, PathResult, ReserveSet, Token, TokenCombination};
