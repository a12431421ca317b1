//! Core data structures for the arbitrage decision loop
//!
//! Author: AI-Generated
//! Created: 2026-08-03
//! Modified: 2026-08-04 - PathResult carries the winning rotation index

use ethers::types::{Address, I256, U256};
use serde::{Deserialize, Serialize};

/// One statically-configured token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub address: Address,
}

impl Token {
    pub fn new(symbol: &str, address: Address) -> Self {
        Self {
            symbol: symbol.to_string(),
            address,
        }
    }
}

/// AMM family of the pools in a combination.
///
/// V2 pools expose reserves directly; V3 pools are approximated via the
/// largest-liquidity position reported by the subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmmKind {
    V2,
    V3,
}

/// A candidate cyclic trading route: 2 tokens across 2 V2 venues, or a
/// 3-token triangle across V3 pools.
///
/// `pairs[i]` is the pool trading `addresses[i]` against
/// `addresses[(i + 1) % addresses.len()]`. A combination is usable only
/// when every hop has a pool (`pairs.len() == addresses.len()`);
/// anything else is dropped before caching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCombination {
    pub symbols: String,
    pub addresses: Vec<Address>,
    pub pairs: Vec<Address>,
    pub kind: AmmKind,
}

impl TokenCombination {
    pub fn is_usable(&self) -> bool {
        !self.pairs.is_empty() && self.pairs.len() == self.addresses.len()
    }
}

/// Reserves of one hop, ordered for traversal: `reserve_in` is the side
/// of the token being sold at this hop. Ephemeral — refetched every
/// polling cycle, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveSet {
    pub reserve_in: U256,
    pub reserve_out: U256,
}

impl ReserveSet {
    pub fn new<A: Into<U256>, B: Into<U256>>(reserve_in: A, reserve_out: B) -> Self {
        Self {
            reserve_in: reserve_in.into(),
            reserve_out: reserve_out.into(),
        }
    }
}

/// Raw reserve snapshot of a single pool, in the pool's own token order.
/// Pool token order is NOT guaranteed to match the path's traversal
/// order; `ordered_for` performs the mandatory reorder.
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub pool: Address,
    pub token0: Address,
    pub token1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
}

impl PoolSnapshot {
    /// Reserves reordered so `reserve_in` corresponds to `token_in`.
    /// Returns `None` when `token_in` is not a side of this pool.
    pub fn ordered_for(&self, token_in: Address) -> Option<ReserveSet> {
        if token_in == self.token0 {
            Some(ReserveSet {
                reserve_in: self.reserve0,
                reserve_out: self.reserve1,
            })
        } else if token_in == self.token1 {
            Some(ReserveSet {
                reserve_in: self.reserve1,
                reserve_out: self.reserve0,
            })
        } else {
            None
        }
    }
}

/// Largest-liquidity position backing a V3 hop, from the subgraph.
/// `reversed` marks that the position's token order is the opposite of
/// the path's expected order for that hop.
#[derive(Debug, Clone)]
pub struct PositionRef {
    pub id: U256,
    pub liquidity: U256,
    pub reversed: bool,
}

/// Per-combination reserve data for one polling cycle.
/// `pools` is aligned with `TokenCombination::pairs`; `positions` is
/// populated for V3 combinations only.
#[derive(Debug, Clone, Default)]
pub struct CombinationSnapshot {
    pub pools: Vec<PoolSnapshot>,
    pub positions: Vec<PositionRef>,
}

impl CombinationSnapshot {
    /// True when some hop has no usable liquidity. Paths over such a
    /// snapshot are rejected before profit estimation.
    pub fn has_dead_hop(&self) -> bool {
        self.pools
            .iter()
            .any(|p| p.reserve0.is_zero() || p.reserve1.is_zero())
    }
}

/// Best path found for a combination in one cycle.
/// `profit` is net of the gas-fee estimate, in the starting token's
/// smallest unit; the selector only surfaces strictly positive results.
#[derive(Debug, Clone)]
pub struct PathResult {
    /// Index of the winning cyclic ordering (rotation of the token list).
    pub rotation: usize,
    /// Token addresses in traversal order, starting at the borrow token.
    pub path: Vec<Address>,
    pub borrow_amount: U256,
    pub profit: I256,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn test_ordered_for_reorders_reserves() {
        let snap = PoolSnapshot {
            pool: addr(99),
            token0: addr(1),
            token1: addr(2),
            reserve0: U256::from(100u64),
            reserve1: U256::from(200u64),
        };

        let forward = snap.ordered_for(addr(1)).unwrap();
        assert_eq!(forward.reserve_in, U256::from(100u64));
        assert_eq!(forward.reserve_out, U256::from(200u64));

        let backward = snap.ordered_for(addr(2)).unwrap();
        assert_eq!(backward.reserve_in, U256::from(200u64));
        assert_eq!(backward.reserve_out, U256::from(100u64));

        assert!(snap.ordered_for(addr(3)).is_none());
    }

    #[test]
    fn test_combination_usability() {
        let mut combo = TokenCombination {
            symbols: "WMATIC-UNI-WETH".to_string(),
            addresses: vec![addr(1), addr(2), addr(3)],
            pairs: vec![addr(10), addr(11)],
            kind: AmmKind::V3,
        };
        assert!(!combo.is_usable());

        combo.pairs.push(addr(12));
        assert!(combo.is_usable());

        combo.pairs.clear();
        assert!(!combo.is_usable());
    }

    #[test]
    fn test_dead_hop_detection() {
        let live = PoolSnapshot {
            pool: addr(99),
            token0: addr(1),
            token1: addr(2),
            reserve0: U256::from(100u64),
            reserve1: U256::from(200u64),
        };
        let mut dead = live.clone();
        dead.reserve1 = U256::zero();

        let snapshot = CombinationSnapshot {
            pools: vec![live.clone()],
            positions: Vec::new(),
        };
        assert!(!snapshot.has_dead_hop());

        let snapshot = CombinationSnapshot {
            pools: vec![live, dead],
            positions: Vec::new(),
        };
        assert!(snapshot.has_dead_hop());
    }
}
