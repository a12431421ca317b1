//! Profit Estimator
//!
//! Simulates a cyclic sequence of constant-product swaps in pure integer
//! arithmetic. Output amounts use floor division with no rounding
//! correction so the simulation reproduces the external contract's math
//! bit-for-bit; re-running identical inputs always yields the identical
//! result. No floating point anywhere on this path.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use crate::types::ReserveSet;
use ethers::types::{I256, U256, U512};

/// Constant-product swap output: `amount_in * reserve_out / (reserve_in
/// + amount_in)`, truncated. The 512-bit intermediate product keeps the
/// multiplication exact for any U256 inputs.
pub fn amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256) -> U256 {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return U256::zero();
    }

    let numerator = amount_in.full_mul(reserve_out);
    let denominator = U512::from(reserve_in) + U512::from(amount_in);
    let quotient = numerator / denominator;

    // Quotient is strictly less than reserve_out, so it always fits.
    U256::try_from(quotient).unwrap_or_else(|_| U256::max_value())
}

/// Runs `borrow` through every hop of the cycle and returns the final
/// amount, denominated in the starting token. `None` when the path is
/// unusable: empty, zero borrow, or any hop with a zero reserve.
pub fn simulate_cycle(hops: &[ReserveSet], borrow: U256) -> Option<U256> {
    if hops.is_empty() || borrow.is_zero() {
        return None;
    }
    if hops
        .iter()
        .any(|h| h.reserve_in.is_zero() || h.reserve_out.is_zero())
    {
        return None;
    }

    let mut amount = borrow;
    for hop in hops {
        amount = amount_out(amount, hop.reserve_in, hop.reserve_out);
    }
    Some(amount)
}

/// Net profit of borrowing `borrow`, running the cycle, and repaying:
/// `final - borrow - gas_fee`, signed and possibly negative. No flooring
/// to zero happens here; callers decide whether a loss is actionable.
///
/// `gas_fee` is `gas_price * gas_limit` in native wei and is treated as
/// commensurate with the starting token; the USD conversion for the
/// profit threshold happens in the driver.
pub fn cycle_profit(hops: &[ReserveSet], borrow: U256, gas_fee: U256) -> Option<I256> {
    let final_amount = simulate_cycle(hops, borrow)?;
    let spend = borrow.saturating_add(gas_fee);
    Some(signed_diff(final_amount, spend))
}

fn signed_diff(a: U256, b: U256) -> I256 {
    if a >= b {
        I256::from_raw(a - b)
    } else {
        -I256::from_raw(b - a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn test_amount_out_truncates() {
        // 100 * 1000 / (1000 + 100) = 90.909... -> 90
        let out = amount_out(U256::from(100u64), U256::from(1000u64), U256::from(1000u64));
        assert_eq!(out, U256::from(90u64));

        // 7 * 13 / (5 + 7) = 91 / 12 = 7.58... -> 7
        let out = amount_out(U256::from(7u64), U256::from(5u64), U256::from(13u64));
        assert_eq!(out, U256::from(7u64));
    }

    #[test]
    fn test_amount_out_zero_cases() {
        let one = U256::from(1u64);
        assert!(amount_out(U256::zero(), one, one).is_zero());
        assert!(amount_out(one, U256::zero(), one).is_zero());
        assert!(amount_out(one, one, U256::zero()).is_zero());
    }

    #[test]
    fn test_amount_out_bounded_by_reserve_out() {
        // Even an absurdly large input cannot drain more than the pool holds
        let out = amount_out(eth(1_000_000_000), eth(10), eth(5000));
        assert!(out < eth(5000));
    }

    #[test]
    fn test_simulate_cycle_reproducible() {
        let hops = vec![
            ReserveSet::new(eth(10), eth(5000)),
            ReserveSet::new(eth(10), eth(6000)),
            ReserveSet::new(eth(10), eth(7000)),
        ];
        let borrow = U256::from(45u64) * U256::exp10(17); // 4.5e18

        let first = simulate_cycle(&hops, borrow).unwrap();
        let second = simulate_cycle(&hops, borrow).unwrap();
        assert_eq!(first, second);

        let p1 = cycle_profit(&hops, borrow, U256::zero()).unwrap();
        let p2 = cycle_profit(&hops, borrow, U256::zero()).unwrap();
        assert_eq!(p1, p2);
        assert!(p1 > I256::zero());
    }

    #[test]
    fn test_cycle_rejects_zero_reserve_hop() {
        let hops = vec![
            ReserveSet::new(eth(10), eth(5000)),
            ReserveSet::new(U256::zero(), eth(6000)),
        ];
        assert!(simulate_cycle(&hops, eth(1)).is_none());
        assert!(cycle_profit(&hops, eth(1), U256::zero()).is_none());
    }

    #[test]
    fn test_losing_cycle_yields_negative_profit() {
        // Every hop pays out at a fraction of the input rate
        let hops = vec![
            ReserveSet::new(eth(5000), eth(10)),
            ReserveSet::new(eth(6000), eth(10)),
        ];
        let profit = cycle_profit(&hops, eth(100), U256::zero()).unwrap();
        assert!(profit < I256::zero());
    }

    #[test]
    fn test_gas_fee_reduces_profit() {
        let hops = vec![
            ReserveSet::new(eth(10), eth(5000)),
            ReserveSet::new(eth(10), eth(6000)),
        ];
        let borrow = eth(1);
        let gross = cycle_profit(&hops, borrow, U256::zero()).unwrap();
        let gas_fee = U256::from(62u64) * U256::exp10(15); // 200 gwei * 310k gas
        let net = cycle_profit(&hops, borrow, gas_fee).unwrap();
        assert_eq!(gross - net, I256::from_raw(gas_fee));
    }
}
