//! Reserve/Liquidity Fetcher
//!
//! Pulls per-combination reserve data fresh each polling cycle: V2 pool
//! reserves straight from the pair contracts, V3 hop liquidity from the
//! subgraph. Reordering reserves into path-traversal order happens on
//! the snapshot (`PoolSnapshot::ordered_for`) because pool token order
//! is unrelated to the path's direction.
//!
//! Author: AI-Generated
//! Created: 2026-08-04

use crate::contracts::IUniswapV2Pair;
use crate::error::{fetch_kind, FetchError};
use crate::reserves::subgraph::SubgraphClient;
use crate::types::{AmmKind, CombinationSnapshot, PoolSnapshot, PositionRef, TokenCombination};
use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::U256;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Attempts per contract read before the hop fails for this cycle.
const MAX_RETRIES: u32 = 3;

/// Fixed backoff between contract-read attempts.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Source of per-combination reserve snapshots. The driver is generic
/// over this seam so tests can substitute canned data.
#[async_trait]
pub trait ReserveSource: Send + Sync {
    async fn snapshot(&self, combo: &TokenCombination) -> Result<CombinationSnapshot, FetchError>;
}

/// Live implementation: chain RPC for V2 reserves, subgraph for V3
/// position liquidity.
pub struct ChainReserveSource<M> {
    provider: Arc<M>,
    subgraph: SubgraphClient,
}

impl<M: Middleware + 'static> ChainReserveSource<M> {
    pub fn new(provider: Arc<M>, subgraph: SubgraphClient) -> Self {
        Self { provider, subgraph }
    }

    async fn v2_snapshot(&self, combo: &TokenCombination) -> Result<CombinationSnapshot, FetchError> {
        let mut pools = Vec::with_capacity(combo.pairs.len());

        for &pool in &combo.pairs {
            let pair = IUniswapV2Pair::new(pool, Arc::clone(&self.provider));

            let (reserve0, reserve1, _timestamp) = call_with_retries(|| {
                let pair = pair.clone();
                async move { pair.get_reserves().call().await.map_err(fetch_kind) }
            })
            .await?;
            let token0 = call_with_retries(|| {
                let pair = pair.clone();
                async move { pair.token_0().call().await.map_err(fetch_kind) }
            })
            .await?;
            let token1 = call_with_retries(|| {
                let pair = pair.clone();
                async move { pair.token_1().call().await.map_err(fetch_kind) }
            })
            .await?;

            pools.push(PoolSnapshot {
                pool,
                token0,
                token1,
                reserve0: U256::from(reserve0),
                reserve1: U256::from(reserve1),
            });
        }

        Ok(CombinationSnapshot {
            pools,
            positions: Vec::new(),
        })
    }

    async fn v3_snapshot(&self, combo: &TokenCombination) -> Result<CombinationSnapshot, FetchError> {
        let hop_count = combo.addresses.len();
        let mut pools = Vec::with_capacity(hop_count);
        let mut positions = Vec::with_capacity(hop_count);

        for (i, &pool) in combo.pairs.iter().enumerate() {
            let token_in = combo.addresses[i];
            let token_out = combo.addresses[(i + 1) % hop_count];

            match self
                .subgraph
                .position_with_highest_liquidity(pool, token_in, token_out)
                .await?
            {
                Some(position) => {
                    // Both sides approximated by the position liquidity.
                    let (token0, token1) = if position.reversed {
                        (token_out, token_in)
                    } else {
                        (token_in, token_out)
                    };
                    pools.push(PoolSnapshot {
                        pool,
                        token0,
                        token1,
                        reserve0: position.liquidity,
                        reserve1: position.liquidity,
                    });
                    positions.push(position);
                }
                None => {
                    // Hop unusable this cycle: zero liquidity forces the
                    // path to be rejected before estimation.
                    pools.push(PoolSnapshot {
                        pool,
                        token0: token_in,
                        token1: token_out,
                        reserve0: U256::zero(),
                        reserve1: U256::zero(),
                    });
                    positions.push(PositionRef {
                        id: U256::zero(),
                        liquidity: U256::zero(),
                        reversed: false,
                    });
                }
            }
        }

        Ok(CombinationSnapshot { pools, positions })
    }
}

#[async_trait]
impl<M: Middleware + 'static> ReserveSource for ChainReserveSource<M> {
    async fn snapshot(&self, combo: &TokenCombination) -> Result<CombinationSnapshot, FetchError> {
        match combo.kind {
            AmmKind::V2 => self.v2_snapshot(combo).await,
            AmmKind::V3 => self.v3_snapshot(combo).await,
        }
    }
}

/// Bounded retry with fixed backoff for transient contract-read
/// failures. Reverts and malformed data are returned immediately.
async fn call_with_retries<T, F, Fut>(mut call: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < MAX_RETRIES => {
                warn!("contract read failed ({}), attempt {} of {}", e, attempt, MAX_RETRIES);
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let attempts = AtomicU32::new(0);
        let result = call_with_retries(|| {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(FetchError::Transport("flaky".to_string()))
                } else {
                    Ok(42u64)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_revert_is_not_retried() {
        let attempts = AtomicU32::new(0);
        let result: Result<u64, _> = call_with_retries(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move { Err(FetchError::Revert) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::Revert)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_exhausts_after_bound() {
        let attempts = AtomicU32::new(0);
        let result: Result<u64, _> = call_with_retries(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move { Err(FetchError::Transport("down".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), MAX_RETRIES);
    }
}
