//! Subgraph Position Queries (V3 concentrated liquidity)
//!
//! V3 pool reserves are approximated by the liquidity of the largest
//! position at the pool, fetched from a GraphQL subgraph by pool
//! address. Positions are filtered by the path's expected token order
//! and, when none match, retried with the reversed order (the hop's
//! path is then marked reversed). Transient transport errors retry a
//! bounded number of times with a fixed backoff before the hop is given
//! up for this cycle.
//!
//! Author: AI-Generated
//! Created: 2026-08-04

use crate::error::FetchError;
use crate::types::PositionRef;
use ethers::types::{Address, U256};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Attempts per query before the hop is marked unusable for the cycle.
const MAX_RETRIES: u32 = 3;

/// Fixed backoff between attempts.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Per-request transport timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const GET_POSITIONS: &str = r#"
    query GetPositions($poolId: String!) {
        positions(where: { pool: $poolId }) {
            id
            owner
            liquidity
            token0 {
                id
            }
            token1 {
                id
            }
        }
    }
"#;

#[derive(Debug, Deserialize)]
struct GraphResponse {
    data: Option<PositionsData>,
}

#[derive(Debug, Deserialize)]
struct PositionsData {
    positions: Vec<RawPosition>,
}

/// Position record as returned by the subgraph. Numeric fields arrive
/// as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPosition {
    pub id: String,
    pub owner: String,
    pub liquidity: String,
    pub token0: TokenId,
    pub token1: TokenId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenId {
    pub id: String,
}

pub struct SubgraphClient {
    http: reqwest::Client,
    url: String,
}

impl SubgraphClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// The largest-liquidity position at `pool` matching the expected
    /// token order (or its reverse). `None` when the pool has no
    /// position with liquidity in either order.
    pub async fn position_with_highest_liquidity(
        &self,
        pool: Address,
        expected_token0: Address,
        expected_token1: Address,
    ) -> Result<Option<PositionRef>, FetchError> {
        let positions = self.positions(pool).await?;
        let selected = select_position(&positions, expected_token0, expected_token1);
        match &selected {
            Some(p) => debug!(
                "pool {:?}: selected position {} (liquidity {}, reversed: {})",
                pool, p.id, p.liquidity, p.reversed
            ),
            None => debug!("pool {:?}: no position with liquidity in either order", pool),
        }
        Ok(selected)
    }

    async fn positions(&self, pool: Address) -> Result<Vec<RawPosition>, FetchError> {
        let body = serde_json::json!({
            "query": GET_POSITIONS,
            "variables": { "poolId": format!("{:?}", pool) },
        });

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.request(&body).await {
                Ok(positions) => return Ok(positions),
                Err(e) if e.is_transient() && attempt < MAX_RETRIES => {
                    warn!(
                        "subgraph query for {:?} failed ({}), attempt {} of {}",
                        pool, e, attempt, MAX_RETRIES
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn request(&self, body: &serde_json::Value) -> Result<Vec<RawPosition>, FetchError> {
        let response = self
            .http
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let parsed: GraphResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        parsed
            .data
            .map(|d| d.positions)
            .ok_or_else(|| FetchError::Malformed("subgraph response carried no data".to_string()))
    }
}

/// Pure selection logic: liquidity > 0, token order matching `(t0, t1)`
/// first, reversed order as fallback, greatest liquidity wins.
pub fn select_position(
    positions: &[RawPosition],
    expected_token0: Address,
    expected_token1: Address,
) -> Option<PositionRef> {
    let order_matches = |p: &RawPosition, t0: Address, t1: Address| {
        let p0 = p.token0.id.parse::<Address>().ok();
        let p1 = p.token1.id.parse::<Address>().ok();
        p0 == Some(t0) && p1 == Some(t1)
    };
    let liquidity_of =
        |p: &RawPosition| U256::from_dec_str(&p.liquidity).unwrap_or_else(|_| U256::zero());

    let mut reversed = false;
    let mut candidates: Vec<&RawPosition> = positions
        .iter()
        .filter(|p| !liquidity_of(p).is_zero() && order_matches(p, expected_token0, expected_token1))
        .collect();

    if candidates.is_empty() {
        candidates = positions
            .iter()
            .filter(|p| {
                !liquidity_of(p).is_zero() && order_matches(p, expected_token1, expected_token0)
            })
            .collect();
        reversed = true;
    }

    candidates
        .into_iter()
        .max_by_key(|p| liquidity_of(p))
        .map(|p| PositionRef {
            id: U256::from_dec_str(&p.id).unwrap_or_else(|_| U256::zero()),
            liquidity: liquidity_of(p),
            reversed,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_A: &str = "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270";
    const TOKEN_B: &str = "0x7ceb23fd6bc0add59e62ac25578270cff1b9f619";

    fn fixture(id: &str, liquidity: &str, token0: &str, token1: &str) -> RawPosition {
        serde_json::from_str(&format!(
            r#"{{
                "id": "{}",
                "owner": "0x0000000000000000000000000000000000000001",
                "liquidity": "{}",
                "token0": {{ "id": "{}" }},
                "token1": {{ "id": "{}" }}
            }}"#,
            id, liquidity, token0, token1
        ))
        .unwrap()
    }

    fn a() -> Address {
        TOKEN_A.parse().unwrap()
    }

    fn b() -> Address {
        TOKEN_B.parse().unwrap()
    }

    #[test]
    fn test_selects_highest_liquidity_in_expected_order() {
        let positions = vec![
            fixture("1", "1000", TOKEN_A, TOKEN_B),
            fixture("2", "5000", TOKEN_A, TOKEN_B),
            fixture("3", "3000", TOKEN_A, TOKEN_B),
        ];

        let selected = select_position(&positions, a(), b()).unwrap();
        assert_eq!(selected.id, U256::from(2u64));
        assert_eq!(selected.liquidity, U256::from(5000u64));
        assert!(!selected.reversed);
    }

    #[test]
    fn test_falls_back_to_reversed_order() {
        let positions = vec![
            fixture("7", "4000", TOKEN_B, TOKEN_A),
            fixture("8", "9000", TOKEN_B, TOKEN_A),
        ];

        let selected = select_position(&positions, a(), b()).unwrap();
        assert_eq!(selected.id, U256::from(8u64));
        assert!(selected.reversed);
    }

    #[test]
    fn test_zero_liquidity_positions_ignored() {
        let positions = vec![
            fixture("1", "0", TOKEN_A, TOKEN_B),
            fixture("2", "0", TOKEN_B, TOKEN_A),
        ];
        assert!(select_position(&positions, a(), b()).is_none());
        assert!(select_position(&[], a(), b()).is_none());
    }

    #[test]
    fn test_expected_order_preferred_over_reversed() {
        // A reversed position with more liquidity must not shadow a
        // matching position in the expected order.
        let positions = vec![
            fixture("1", "100", TOKEN_A, TOKEN_B),
            fixture("2", "999999", TOKEN_B, TOKEN_A),
        ];

        let selected = select_position(&positions, a(), b()).unwrap();
        assert_eq!(selected.id, U256::from(1u64));
        assert!(!selected.reversed);
    }

    #[test]
    fn test_graph_response_parsing() {
        let raw = format!(
            r#"{{ "data": {{ "positions": [
                {{ "id": "42", "owner": "0x0000000000000000000000000000000000000002",
                   "liquidity": "123456789", "token0": {{ "id": "{}" }}, "token1": {{ "id": "{}" }} }}
            ] }} }}"#,
            TOKEN_A, TOKEN_B
        );
        let parsed: GraphResponse = serde_json::from_str(&raw).unwrap();
        let positions = parsed.data.unwrap().positions;
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].id, "42");
        assert_eq!(positions[0].owner, "0x0000000000000000000000000000000000000002");
    }
}
