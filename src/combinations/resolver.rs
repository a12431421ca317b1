//! Pool Resolver
//!
//! Turns generated token combinations into concrete pool routes by
//! querying AMM factories. A hop resolves only when a factory returns a
//! non-zero pool address; reverted factory calls mean "no pool here",
//! never a hard error. Combinations with any unresolved hop are dropped
//! and never reach the cache.
//!
//! Resolution is slow and rate-limited upstream, which is why the
//! combination cache short-circuits this whole module on later runs.
//!
//! Author: AI-Generated
//! Created: 2026-08-03
//! Modified: 2026-08-05 - pair variant expands venue 2-subsets

use crate::config::{self, BotConfig};
use crate::contracts::{IUniswapV2Factory, IUniswapV3Factory};
use crate::error::{fetch_kind, FetchError};
use crate::types::TokenCombination;
use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::Address;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Factory lookups, abstracted so resolution logic is testable without
/// a chain connection.
#[async_trait]
pub trait PoolLookup: Send + Sync {
    /// `getPair` on a V2 factory. Zero address means no pool.
    async fn v2_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, FetchError>;

    /// `getPool` on the V3 factory for a fee tier. Zero address means
    /// no pool.
    async fn v3_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: u32,
    ) -> Result<Address, FetchError>;
}

/// Live factory lookups over a chain provider.
pub struct OnchainPoolLookup<M> {
    provider: Arc<M>,
    v3_factory: Address,
}

impl<M: Middleware + 'static> OnchainPoolLookup<M> {
    pub fn new(provider: Arc<M>, v3_factory: Address) -> Self {
        Self {
            provider,
            v3_factory,
        }
    }
}

#[async_trait]
impl<M: Middleware + 'static> PoolLookup for OnchainPoolLookup<M> {
    async fn v2_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, FetchError> {
        let contract = IUniswapV2Factory::new(factory, Arc::clone(&self.provider));
        contract
            .get_pair(token_a, token_b)
            .call()
            .await
            .map_err(fetch_kind)
    }

    async fn v3_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: u32,
    ) -> Result<Address, FetchError> {
        let contract = IUniswapV3Factory::new(self.v3_factory, Arc::clone(&self.provider));
        contract
            .get_pool(token_a, token_b, fee)
            .call()
            .await
            .map_err(fetch_kind)
    }
}

/// Resolves every hop of each triangle through the V3 factory, probing
/// the configured fee tiers in order. Keeps a triangle only when all
/// three hops resolve.
pub async fn resolve_triangles<L: PoolLookup>(
    lookup: &L,
    candidates: Vec<TokenCombination>,
    fee_tiers: &[u32],
) -> Vec<TokenCombination> {
    let mut resolved = Vec::new();

    'combos: for mut combo in candidates {
        let hop_count = combo.addresses.len();
        let mut pools = Vec::with_capacity(hop_count);

        for i in 0..hop_count {
            let token_a = combo.addresses[i];
            let token_b = combo.addresses[(i + 1) % hop_count];

            let mut found = None;
            for &fee in fee_tiers {
                match lookup.v3_pool(token_a, token_b, fee).await {
                    Ok(pool) if !pool.is_zero() => {
                        found = Some(pool);
                        break;
                    }
                    Ok(_) => {}
                    Err(FetchError::Revert) => {
                        debug!("{}: getPool reverted at fee {} — no pool", combo.symbols, fee);
                    }
                    Err(e) => {
                        warn!("{}: getPool failed at fee {}: {}", combo.symbols, fee, e);
                    }
                }
            }

            match found {
                Some(pool) => pools.push(pool),
                None => {
                    debug!("{}: hop {} unresolved — dropping combination", combo.symbols, i);
                    continue 'combos;
                }
            }
        }

        combo.pairs = pools;
        resolved.push(combo);
    }

    resolved
}

/// Resolves each `(base, quote)` pair against every V2 factory and
/// expands pairs with at least two venues into all 2-subsets, each a
/// 2-hop cycle across two distinct venues of the same pair.
pub async fn resolve_pairs<L: PoolLookup>(
    lookup: &L,
    candidates: Vec<TokenCombination>,
    factories: &[(String, Address)],
) -> Vec<TokenCombination> {
    let mut resolved = Vec::new();

    for combo in candidates {
        let base = combo.addresses[0];
        let quote = combo.addresses[1];

        let mut venues: Vec<Address> = Vec::new();
        for (name, factory) in factories {
            match lookup.v2_pair(*factory, base, quote).await {
                Ok(pair) if !pair.is_zero() => venues.push(pair),
                Ok(_) => {}
                Err(FetchError::Revert) => {
                    debug!("{}: getPair reverted on {} — no pool", combo.symbols, name);
                }
                Err(e) => {
                    warn!("{}: getPair failed on {}: {}", combo.symbols, name, e);
                }
            }
        }

        if venues.len() < 2 {
            debug!(
                "{}: only {} venue(s) — dropping pair",
                combo.symbols,
                venues.len()
            );
            continue;
        }

        for i in 0..venues.len() {
            for j in (i + 1)..venues.len() {
                resolved.push(TokenCombination {
                    symbols: combo.symbols.clone(),
                    addresses: combo.addresses.clone(),
                    pairs: vec![venues[i], venues[j]],
                    kind: combo.kind,
                });
            }
        }
    }

    resolved
}

/// Full-catalog resolution, behind a trait so the cache layer can prove
/// it never runs when a cache file is present.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve_all(&self) -> anyhow::Result<Vec<TokenCombination>>;
}

/// Live resolver over the static catalog for the configured network.
pub struct OnchainResolver<M> {
    provider: Arc<M>,
    config: BotConfig,
}

impl<M: Middleware + 'static> OnchainResolver<M> {
    pub fn new(provider: Arc<M>, config: BotConfig) -> Self {
        Self { provider, config }
    }
}

#[async_trait]
impl<M: Middleware + 'static> Resolver for OnchainResolver<M> {
    async fn resolve_all(&self) -> anyhow::Result<Vec<TokenCombination>> {
        let network = self.config.network;
        let base = config::base_tokens(network);
        let quotes = config::quote_tokens(network);
        let factories = config::v2_factories(network);

        let lookup = OnchainPoolLookup::new(Arc::clone(&self.provider), config::v3_factory(network));

        info!(
            "Resolving combinations for {}: {} base x {} quote tokens, {} V2 factories",
            network,
            base.len(),
            quotes.len(),
            factories.len()
        );

        let pairs = resolve_pairs(
            &lookup,
            super::generator::pair_combinations(base, quotes),
            factories,
        )
        .await;
        info!("Resolved {} V2 pair cycles", pairs.len());

        let triangles = resolve_triangles(
            &lookup,
            super::generator::triangle_combinations(base, quotes),
            &self.config.v3_fee_tiers,
        )
        .await;
        info!("Resolved {} V3 triangles", triangles.len());

        Ok(pairs.into_iter().chain(triangles).collect())
    }
}
