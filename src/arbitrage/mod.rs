//! Arbitrage Module
//!
//! Profit estimation, path selection, and the polling execution driver.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

pub mod driver;
pub mod estimator;
pub mod selector;

pub use driver::{CombinationStats, Driver, FlashContract, OnchainFlashContract};
