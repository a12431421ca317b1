//! Execution Driver
//!
//! Per combination, per tick: IDLE -> FETCHING -> EVALUATING ->
//! (SUBMITTING | IDLE). Every tick fans out one concurrent task per
//! cached combination (bounded by the configured concurrency) and
//! awaits them all before the next tick's fixed sleep. Each task runs
//! under its own timeout so one hung external call forfeits only that
//! combination's slot for the tick.
//!
//! No state is shared between per-combination tasks beyond read-only
//! config, the external contract/provider handles, and the stats map.
//! Submission failures never halt the driver: reverts and provider
//! rejections are swallowed for the affected combination only,
//! unexpected errors are logged at error level.
//!
//! Author: AI-Generated
//! Created: 2026-08-04
//! Modified: 2026-08-05 - on-chain quote cross-check before submission
//! Modified: 2026-08-06 - per-combination stats via DashMap

use crate::arbitrage::selector;
use crate::config::BotConfig;
use crate::contracts::{FlashArbitrage, PoolData};
use crate::error::{submit_kind, FetchError, PathError, SubmitError};
use crate::oracle::PriceSource;
use crate::reserves::ReserveSource;
use crate::types::{AmmKind, CombinationSnapshot, PathResult, TokenCombination};
use async_trait::async_trait;
use dashmap::DashMap;
use ethers::providers::Middleware;
use ethers::types::{Address, I256, Sign, TxHash, U256};
use futures::StreamExt;
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Call surface of the external flash-arbitrage contract, behind a
/// trait so driver behavior is testable against a recording stub.
#[async_trait]
pub trait FlashContract: Send + Sync {
    /// `getProfit(tokenA, tokenB, gasFee)` — the contract's own view of
    /// the profit for this pair, net of the supplied gas fee.
    async fn quote_profit(
        &self,
        token_a: Address,
        token_b: Address,
        gas_fee: U256,
    ) -> Result<(I256, Address), SubmitError>;

    /// `executeFlashArbitrage` with fixed gas overrides; resolves to
    /// the confirmation hash.
    async fn submit_arbitrage(
        &self,
        paths: [Vec<Address>; 3],
        borrow_amount: U256,
        pool_data: PoolData,
        gas_price: U256,
        gas_limit: u64,
    ) -> Result<TxHash, SubmitError>;
}

/// Live contract handle over the generated bindings.
pub struct OnchainFlashContract<M: Middleware> {
    contract: FlashArbitrage<M>,
}

impl<M: Middleware + 'static> OnchainFlashContract<M> {
    pub fn new(address: Address, client: Arc<M>) -> Self {
        Self {
            contract: FlashArbitrage::new(address, client),
        }
    }
}

#[async_trait]
impl<M: Middleware + 'static> FlashContract for OnchainFlashContract<M> {
    async fn quote_profit(
        &self,
        token_a: Address,
        token_b: Address,
        gas_fee: U256,
    ) -> Result<(I256, Address), SubmitError> {
        self.contract
            .get_profit(token_a, token_b, gas_fee)
            .call()
            .await
            .map_err(submit_kind)
    }

    async fn submit_arbitrage(
        &self,
        paths: [Vec<Address>; 3],
        borrow_amount: U256,
        pool_data: PoolData,
        gas_price: U256,
        gas_limit: u64,
    ) -> Result<TxHash, SubmitError> {
        let [path1, path2, path3] = paths;
        let call = self
            .contract
            .execute_flash_arbitrage(path1, path2, path3, borrow_amount, pool_data)
            .gas_price(gas_price)
            .gas(gas_limit);

        let pending = call.send().await.map_err(submit_kind)?;
        let receipt = pending
            .await
            .map_err(|e| SubmitError::Other(e.to_string()))?;

        match receipt {
            Some(receipt) => Ok(receipt.transaction_hash),
            None => Err(SubmitError::Rejected(
                "transaction dropped from the mempool".to_string(),
            )),
        }
    }
}

/// Per-combination counters, logged periodically.
#[derive(Debug, Default, Clone)]
pub struct CombinationStats {
    pub scans: u64,
    pub profitable: u64,
    pub submissions: u64,
}

/// The polling decision loop.
pub struct Driver<C, R, P> {
    config: BotConfig,
    contract: C,
    reserves: R,
    price: P,
    /// Dry run by default; submissions are logged but never sent.
    live: bool,
    stats: DashMap<String, CombinationStats>,
}

impl<C: FlashContract, R: ReserveSource, P: PriceSource> Driver<C, R, P> {
    pub fn new(config: BotConfig, contract: C, reserves: R, price: P) -> Self {
        Self {
            config,
            contract,
            reserves,
            price,
            live: false,
            stats: DashMap::new(),
        }
    }

    /// Enable or disable live submission.
    pub fn set_live(&mut self, live: bool) {
        self.live = live;
        if live {
            warn!("LIVE SUBMISSION ENABLED - REAL MONEY AT RISK!");
        } else {
            info!("Driver in DRY RUN mode - submissions are logged, not sent");
        }
    }

    pub fn stats_for(&self, symbols: &str) -> Option<CombinationStats> {
        self.stats.get(symbols).map(|entry| entry.clone())
    }

    /// Fixed-interval polling loop; runs until the process exits.
    pub async fn run(&self, combinations: &[TokenCombination]) -> anyhow::Result<()> {
        info!(
            "Start arbitraging: {} combinations, {}ms interval, concurrency {}",
            combinations.len(),
            self.config.poll_interval_ms,
            self.config.concurrency
        );

        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut iteration: u64 = 0;
        loop {
            interval.tick().await;
            iteration += 1;

            self.run_tick(combinations).await;

            if iteration % 60 == 0 {
                let (scans, submissions) = self.totals();
                info!(
                    "Iteration {} | {} combinations | {} scans | {} submissions",
                    iteration,
                    combinations.len(),
                    scans,
                    submissions
                );
            }
        }
    }

    /// One full fan-out over every combination. All tasks complete (or
    /// time out) before this returns; the next tick cannot start early.
    pub async fn run_tick(&self, combinations: &[TokenCombination]) {
        let concurrency = self.config.concurrency.max(1);
        futures::stream::iter(
            combinations
                .iter()
                .map(|combo| self.evaluate_combination(combo)),
        )
        .buffer_unordered(concurrency)
        .collect::<Vec<()>>()
        .await;
    }

    async fn evaluate_combination(&self, combo: &TokenCombination) {
        self.bump(&combo.symbols, |s| s.scans += 1);

        let budget = Duration::from_millis(self.config.fetch_timeout_ms);
        if tokio::time::timeout(budget, self.evaluate_inner(combo))
            .await
            .is_err()
        {
            warn!(
                "{}: evaluation timed out after {:?} — skipping this cycle",
                combo.symbols, budget
            );
        }
    }

    async fn evaluate_inner(&self, combo: &TokenCombination) {
        // FETCHING
        let snapshot = match self.reserves.snapshot(combo).await {
            Ok(snapshot) => snapshot,
            Err(FetchError::Revert) => {
                debug!("{}: reserve read reverted — skipping", combo.symbols);
                return;
            }
            Err(e) => {
                warn!("{}: reserve fetch failed: {} — skipping this cycle", combo.symbols, e);
                return;
            }
        };

        // EVALUATING
        let gas_fee = self.gas_fee();
        match combo.kind {
            AmmKind::V2 => self.evaluate_v2(combo, &snapshot, gas_fee).await,
            AmmKind::V3 => self.evaluate_v3(combo, &snapshot, gas_fee).await,
        }
    }

    async fn evaluate_v2(
        &self,
        combo: &TokenCombination,
        snapshot: &CombinationSnapshot,
        gas_fee: U256,
    ) {
        let best = match selector::select_best_path(combo, snapshot, gas_fee) {
            Ok(Some(best)) => best,
            Ok(None) => {
                debug!("{}: no profitable amount this cycle", combo.symbols);
                return;
            }
            Err(PathError::ZeroLiquidity) => {
                debug!("{}: dead hop — skipping", combo.symbols);
                return;
            }
            Err(e) => {
                debug!("{}: path selection rejected: {}", combo.symbols, e);
                return;
            }
        };

        self.bump(&combo.symbols, |s| s.profitable += 1);

        let net_usd = match self.net_profit_usd(best.profit, best.path[0]).await {
            Ok(value) => value,
            Err(e) => {
                warn!("{}: price oracle failed: {} — skipping", combo.symbols, e);
                return;
            }
        };
        if net_usd <= self.config.minimum_profit_usd {
            debug!(
                "{}: net profit {:.4} USD at or below threshold {:.2}",
                combo.symbols, net_usd, self.config.minimum_profit_usd
            );
            return;
        }

        // On-chain cross-check before committing capital: local reserve
        // data may be a block behind.
        match self
            .contract
            .quote_profit(best.path[0], best.path[1], gas_fee)
            .await
        {
            Ok((quoted, _)) if quoted > I256::zero() => {}
            Ok(_) => {
                debug!("{}: on-chain quote not positive — skipping", combo.symbols);
                return;
            }
            Err(e) => {
                self.log_submit_error(combo, e);
                return;
            }
        }

        // SUBMITTING
        info!(
            "{}: rotation {} | borrow {} | est. net profit {:.2} USD",
            combo.symbols, best.rotation, best.borrow_amount, net_usd
        );
        let paths = v2_paths(&best);
        let pool_data = PoolData {
            pool_addresses: combo.pairs.clone(),
            position_ids: Vec::new(),
            borrow_amounts: vec![best.borrow_amount],
            profits: Vec::new(),
        };
        self.submit(combo, paths, best.borrow_amount, pool_data).await;
    }

    async fn evaluate_v3(
        &self,
        combo: &TokenCombination,
        snapshot: &CombinationSnapshot,
        gas_fee: U256,
    ) {
        // Liquidity approximations cannot be simulated as reserves; the
        // contract quote is the profit authority for triangles.
        let borrow_amount = match selector::liquidity_fraction_borrow(&snapshot.positions) {
            Some(amount) => amount,
            None => {
                debug!("{}: no usable position liquidity — skipping", combo.symbols);
                return;
            }
        };

        let (quoted, quote_base) = match self
            .contract
            .quote_profit(combo.addresses[0], combo.addresses[1], gas_fee)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                self.log_submit_error(combo, e);
                return;
            }
        };
        if quoted <= I256::zero() {
            debug!("{}: quoted profit not positive", combo.symbols);
            return;
        }

        self.bump(&combo.symbols, |s| s.profitable += 1);

        let net_usd = match self.net_profit_usd(quoted, quote_base).await {
            Ok(value) => value,
            Err(e) => {
                warn!("{}: price oracle failed: {} — skipping", combo.symbols, e);
                return;
            }
        };
        if net_usd <= self.config.minimum_profit_usd {
            debug!(
                "{}: quoted net profit {:.4} USD at or below threshold {:.2}",
                combo.symbols, net_usd, self.config.minimum_profit_usd
            );
            return;
        }

        // SUBMITTING
        info!(
            "{}: borrow {} | quoted net profit {:.2} USD",
            combo.symbols, borrow_amount, net_usd
        );
        let paths = v3_paths(combo, snapshot);
        let pool_data = PoolData {
            pool_addresses: combo.pairs.clone(),
            position_ids: snapshot.positions.iter().map(|p| p.id).collect(),
            borrow_amounts: snapshot
                .positions
                .iter()
                .map(|p| selector::max_borrow_fraction(p.liquidity))
                .collect(),
            profits: vec![I256::zero(); snapshot.positions.len()],
        };
        self.submit(combo, paths, borrow_amount, pool_data).await;
    }

    async fn submit(
        &self,
        combo: &TokenCombination,
        paths: [Vec<Address>; 3],
        borrow_amount: U256,
        pool_data: PoolData,
    ) {
        if !self.live {
            info!(
                "{}: DRY RUN — would submit flash arbitrage (borrow {})",
                combo.symbols, borrow_amount
            );
            self.bump(&combo.symbols, |s| s.submissions += 1);
            return;
        }

        match self
            .contract
            .submit_arbitrage(
                paths,
                borrow_amount,
                pool_data,
                self.config.gas_price,
                self.config.gas_limit,
            )
            .await
        {
            Ok(hash) => {
                info!("{}: Tx: {:?}", combo.symbols, hash);
                self.bump(&combo.symbols, |s| s.submissions += 1);
            }
            Err(e) => self.log_submit_error(combo, e),
        }
    }

    /// Profit converted to the common accounting unit (USD). WMATIC
    /// profit converts at the oracle rate; other base tokens are taken
    /// at face value.
    async fn net_profit_usd(&self, profit: I256, base_token: Address) -> Result<f64, FetchError> {
        let price = if base_token == self.config.wrapped_native {
            self.price.native_price_usd().await?.to_f64().unwrap_or(0.0)
        } else {
            1.0
        };
        Ok(ether_value(profit) * price)
    }

    fn log_submit_error(&self, combo: &TokenCombination, err: SubmitError) {
        match err {
            SubmitError::Revert => debug!("{}: reverted — skipping", combo.symbols),
            SubmitError::Rejected(msg) => {
                debug!("{}: provider rejected ({}) — skipping", combo.symbols, msg)
            }
            SubmitError::Other(msg) => {
                error!("{}: unexpected submission error: {}", combo.symbols, msg)
            }
        }
    }

    fn gas_fee(&self) -> U256 {
        self.config.gas_price * U256::from(self.config.gas_limit)
    }

    fn bump<F: FnOnce(&mut CombinationStats)>(&self, symbols: &str, update: F) {
        let mut entry = self.stats.entry(symbols.to_string()).or_default();
        update(&mut entry);
    }

    fn totals(&self) -> (u64, u64) {
        self.stats.iter().fold((0, 0), |(scans, submissions), entry| {
            (scans + entry.scans, submissions + entry.submissions)
        })
    }
}

/// The winning cycle plus its reverse; the third slot stays empty for
/// 2-hop routes.
fn v2_paths(best: &PathResult) -> [Vec<Address>; 3] {
    let forward = best.path.clone();
    let mut backward = best.path.clone();
    backward.reverse();
    [forward, backward, Vec::new()]
}

/// All three rotations of the triangle, each reversed when its backing
/// position's token order is reversed.
fn v3_paths(combo: &TokenCombination, snapshot: &CombinationSnapshot) -> [Vec<Address>; 3] {
    let path_for = |rotation: usize| {
        let mut path = selector::rotation_path(combo, rotation);
        let reversed = snapshot
            .positions
            .get(rotation)
            .map(|p| p.reversed)
            .unwrap_or(false);
        if reversed {
            path.reverse();
        }
        path
    };
    [path_for(0), path_for(1), path_for(2)]
}

/// Ether-denominated value of a signed smallest-unit amount.
fn ether_value(amount: I256) -> f64 {
    let (sign, abs) = amount.into_sign_and_abs();
    let value: f64 = ethers::utils::format_ether(abs).parse().unwrap_or(0.0);
    match sign {
        Sign::Negative => -value,
        Sign::Positive => value,
    }
}
