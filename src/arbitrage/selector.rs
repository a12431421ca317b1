//! Path Selector
//!
//! Picks the most profitable cyclic ordering of a combination for the
//! current reserve snapshot and sizes the borrow amount.
//!
//! Borrow sizing is a safety-factor linear downward search: borrow =
//! s * min(input-side reserve along the path), with s walked down from
//! 0.45 in steps of 0.05 until the simulated net profit turns positive.
//! The search is a heuristic, not a verified optimum; it preserves the
//! integer-truncation swap semantics of the estimator throughout, and an
//! exhausted search means "no profitable amount this cycle", not an
//! error. V3 triangles, whose reserves are liquidity approximations,
//! instead borrow a fixed 0.9 fraction of the smallest position
//! liquidity and defer the profit decision to the on-chain quote.
//!
//! Author: AI-Generated
//! Created: 2026-08-03
//! Modified: 2026-08-05 - rotation tie-break documented (first examined wins)

use crate::arbitrage::estimator;
use crate::error::PathError;
use crate::types::{CombinationSnapshot, PathResult, PositionRef, ReserveSet, TokenCombination};
use ethers::types::{I256, U256};
use tracing::debug;

/// Starting safety factor, in thousandths (0.45). Half of the 0.9
/// borrow fraction applied to position liquidity, leaving headroom for
/// reserve movement between observation and execution.
const SAFETY_FACTOR_START: u64 = 450;

/// Downward search step, in thousandths (0.05).
const SAFETY_FACTOR_STEP: u64 = 50;

/// Borrow fraction of the smallest position liquidity for V3 paths,
/// in thousandths (0.9).
const MAX_BORROW_FRACTION: u64 = 900;

/// Finds a profitable borrow amount for a cyclic path of 2-3 hops.
///
/// The hop sequence must satisfy the ordering invariant: the final two
/// hops have strictly increasing output/input rate. Violations reject
/// with [`PathError::WrongInputOrder`] rather than producing a negative
/// or nonsensical amount.
///
/// Returns `Ok(None)` when the downward search exhausts without finding
/// a positive net profit.
pub fn optimal_borrow(hops: &[ReserveSet], gas_fee: U256) -> Result<Option<(U256, I256)>, PathError> {
    if hops.len() < 2 || hops.len() > 3 {
        return Err(PathError::UnsupportedPathLength(hops.len()));
    }
    if hops
        .iter()
        .any(|h| h.reserve_in.is_zero() || h.reserve_out.is_zero())
    {
        return Err(PathError::ZeroLiquidity);
    }

    // Ordering invariant over the last two hops: rate must strictly
    // increase, i.e. out[n-2] / in[n-2] < out[n-1] / in[n-1], checked by
    // cross-multiplication to stay in integers.
    let prev = &hops[hops.len() - 2];
    let last = &hops[hops.len() - 1];
    if prev.reserve_out.full_mul(last.reserve_in) >= last.reserve_out.full_mul(prev.reserve_in) {
        return Err(PathError::WrongInputOrder);
    }

    let min_reserve = hops
        .iter()
        .map(|h| h.reserve_in)
        .fold(U256::max_value(), |acc, r| acc.min(r));

    let mut factor = SAFETY_FACTOR_START;
    while factor >= SAFETY_FACTOR_STEP {
        let borrow = min_reserve * U256::from(factor) / U256::from(1000u64);
        if !borrow.is_zero() {
            if let Some(profit) = estimator::cycle_profit(hops, borrow, gas_fee) {
                if profit > I256::zero() {
                    return Ok(Some((borrow, profit)));
                }
            }
        }
        factor -= SAFETY_FACTOR_STEP;
    }

    Ok(None)
}

/// 0.9 of a position's liquidity — the per-hop borrow ceiling for V3
/// paths.
pub fn max_borrow_fraction(liquidity: U256) -> U256 {
    liquidity * U256::from(MAX_BORROW_FRACTION) / U256::from(1000u64)
}

/// Borrow amount for a V3 path: 0.9 of the smallest position liquidity
/// along the cycle. `None` when any hop has no liquidity.
pub fn liquidity_fraction_borrow(positions: &[PositionRef]) -> Option<U256> {
    if positions.is_empty() || positions.iter().any(|p| p.liquidity.is_zero()) {
        return None;
    }
    let min_liquidity = positions
        .iter()
        .map(|p| p.liquidity)
        .fold(U256::max_value(), |acc, l| acc.min(l));
    Some(max_borrow_fraction(min_liquidity))
}

/// Hop reserves for one cyclic ordering (rotation `k` of the token
/// list): hop `j` sells `addresses[(k + j) % n]` into pool
/// `pairs[(k + j) % n]`.
fn rotation_hops(
    combo: &TokenCombination,
    snapshot: &CombinationSnapshot,
    rotation: usize,
) -> Option<Vec<ReserveSet>> {
    let n = combo.addresses.len();
    let mut hops = Vec::with_capacity(n);
    for j in 0..n {
        let idx = (rotation + j) % n;
        let token_in = combo.addresses[idx];
        hops.push(snapshot.pools.get(idx)?.ordered_for(token_in)?);
    }
    Some(hops)
}

/// Token path for a rotation, starting at the borrow token.
pub fn rotation_path(combo: &TokenCombination, rotation: usize) -> Vec<ethers::types::Address> {
    let n = combo.addresses.len();
    (0..n).map(|j| combo.addresses[(rotation + j) % n]).collect()
}

/// Compares every cyclic ordering of the combination and keeps the one
/// with the strictly greatest net profit; ties break to the first
/// ordering examined (declaration order). Orderings violating the
/// reserve-order invariant are skipped, not fatal.
pub fn select_best_path(
    combo: &TokenCombination,
    snapshot: &CombinationSnapshot,
    gas_fee: U256,
) -> Result<Option<PathResult>, PathError> {
    if snapshot.has_dead_hop() {
        return Err(PathError::ZeroLiquidity);
    }

    let mut best: Option<PathResult> = None;
    for rotation in 0..combo.addresses.len() {
        let hops = match rotation_hops(combo, snapshot, rotation) {
            Some(h) => h,
            None => continue,
        };

        match optimal_borrow(&hops, gas_fee) {
            Ok(Some((borrow_amount, profit))) => {
                let better = best
                    .as_ref()
                    .map(|b| profit > b.profit)
                    .unwrap_or(true);
                if better {
                    best = Some(PathResult {
                        rotation,
                        path: rotation_path(combo, rotation),
                        borrow_amount,
                        profit,
                    });
                }
            }
            Ok(None) => {}
            Err(PathError::WrongInputOrder) => {
                debug!(
                    "{}: rotation {} violates reserve order — skipped",
                    combo.symbols, rotation
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(best)
}
