//! Combination discovery: generation, pool resolution, and the
//! per-network cache that lets later runs skip resolution.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

pub mod cache;
pub mod generator;
pub mod resolver;

pub use cache::{cache_file, load_or_resolve};
pub use resolver::{OnchainPoolLookup, OnchainResolver, PoolLookup, Resolver};
