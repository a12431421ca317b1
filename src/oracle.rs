//! Native-Asset Price Oracle
//!
//! USD price of the chain's wrapped native asset (WMATIC) from a
//! polygonscan-style stats endpoint, with a short TTL cache so the
//! polling loop does not hammer the API once per combination.
//!
//! Author: AI-Generated
//! Created: 2026-08-04

use crate::error::FetchError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a fetched price stays valid.
const CACHE_TTL: Duration = Duration::from_secs(30);

/// Per-request transport timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// USD price source for the chain's native asset. The driver converts
/// WMATIC-denominated profit through this before the minimum-profit
/// comparison; other base tokens are treated as already dollar-valued.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn native_price_usd(&self) -> Result<Decimal, FetchError>;
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    status: String,
    result: StatsResult,
}

#[derive(Debug, Deserialize)]
struct StatsResult {
    #[serde(rename = "maticusd")]
    matic_usd: String,
}

/// Live oracle over the polygonscan `stats/maticPrice` endpoint.
pub struct PolygonScanOracle {
    http: reqwest::Client,
    url: String,
    cache: RwLock<Option<(Instant, Decimal)>>,
}

impl PolygonScanOracle {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            cache: RwLock::new(None),
        }
    }

    async fn fetch(&self) -> Result<Decimal, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let envelope: StatsEnvelope = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        if envelope.status != "1" {
            return Err(FetchError::Malformed(format!(
                "price endpoint returned status {}",
                envelope.status
            )));
        }

        parse_price(&envelope.result.matic_usd)
    }
}

#[async_trait]
impl PriceSource for PolygonScanOracle {
    async fn native_price_usd(&self) -> Result<Decimal, FetchError> {
        if let Some((fetched_at, price)) = *self.cache.read().unwrap() {
            if fetched_at.elapsed() < CACHE_TTL {
                return Ok(price);
            }
        }

        let price = self.fetch().await?;
        debug!("native asset price refreshed: {} USD", price);
        *self.cache.write().unwrap() = Some((Instant::now(), price));
        Ok(price)
    }
}

/// Fixed-price source for tests and offline runs.
pub struct FixedPrice(pub Decimal);

#[async_trait]
impl PriceSource for FixedPrice {
    async fn native_price_usd(&self) -> Result<Decimal, FetchError> {
        Ok(self.0)
    }
}

fn parse_price(raw: &str) -> Result<Decimal, FetchError> {
    Decimal::from_str(raw)
        .map_err(|e| FetchError::Malformed(format!("unparseable price '{}': {}", raw, e)))
}
