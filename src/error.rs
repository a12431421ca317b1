//! Typed error taxonomy for the provider/subgraph boundary
//!
//! The driver's recovery decisions (skip hop, retry, swallow, escalate)
//! key off these kinds rather than matching on error message text, which
//! is not a stable contract across providers.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use ethers::contract::ContractError;
use ethers::providers::Middleware;
use thiserror::Error;

/// Failures while fetching pool/reserve/position data. Categories:
/// reverted reads count as "no data" (recovered locally), transport
/// problems are retried a bounded number of times, malformed payloads
/// are not retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("contract read reverted")]
    Revert,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Transient failures are worth retrying with a fixed backoff;
    /// reverts and malformed payloads are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

/// Failures while submitting or quoting against the flash-arbitrage
/// contract. `Revert` and `Rejected` are swallowed for the affected
/// combination only; `Other` is logged at error level but never halts
/// the driver.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("transaction reverted")]
    Revert,
    #[error("provider rejected submission: {0}")]
    Rejected(String),
    #[error("unexpected submission error: {0}")]
    Other(String),
}

/// Path-selection rejections. `WrongInputOrder` is the explicit signal
/// for reserves supplied in the wrong relative magnitude order — the
/// borrow-amount routine never silently produces a nonsensical amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("wrong input order")]
    WrongInputOrder,
    #[error("zero liquidity on a hop")]
    ZeroLiquidity,
    #[error("unsupported path length: {0}")]
    UnsupportedPathLength(usize),
}

/// Classify a contract read failure at the fetch boundary.
pub fn fetch_kind<M: Middleware>(err: ContractError<M>) -> FetchError {
    if err.is_revert() {
        FetchError::Revert
    } else {
        FetchError::Transport(err.to_string())
    }
}

/// Classify a contract write/quote failure at the submission boundary.
pub fn submit_kind<M: Middleware>(err: ContractError<M>) -> SubmitError {
    if err.is_revert() {
        SubmitError::Revert
    } else {
        SubmitError::Rejected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FetchError::Transport("connection reset".to_string()).is_transient());
        assert!(!FetchError::Revert.is_transient());
        assert!(!FetchError::Malformed("truncated json".to_string()).is_transient());
    }

    #[test]
    fn test_path_error_equality() {
        assert_eq!(PathError::WrongInputOrder, PathError::WrongInputOrder);
        assert_ne!(PathError::WrongInputOrder, PathError::ZeroLiquidity);
    }
}
