//! Combination Cache
//!
//! Persists resolved combinations to a JSON file, one per network, so
//! the slow factory-resolution pass is skipped on subsequent runs. A
//! present, parseable cache short-circuits resolution entirely — there
//! is no staleness check; delete the file to force re-resolution. A
//! present but malformed cache is a fatal startup error.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use crate::combinations::resolver::Resolver;
use crate::config::Network;
use crate::types::TokenCombination;
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Cache file location for a network.
pub fn cache_file(network: Network) -> PathBuf {
    PathBuf::from(format!("combinations-{}.json", network))
}

/// Loads combinations from the cache when present, otherwise runs the
/// resolver once and writes its output. Unusable combinations (hop
/// count mismatch) are filtered before anything is persisted.
pub async fn load_or_resolve<R: Resolver>(
    path: &Path,
    resolver: &R,
) -> Result<Vec<TokenCombination>> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let combinations: Vec<TokenCombination> = serde_json::from_str(&raw)
                .with_context(|| format!("malformed combination cache: {}", path.display()))?;
            info!(
                "Loaded {} combinations from cache {}",
                combinations.len(),
                path.display()
            );
            Ok(combinations)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No combination cache at {} — resolving", path.display());
            let combinations: Vec<TokenCombination> = resolver
                .resolve_all()
                .await?
                .into_iter()
                .filter(TokenCombination::is_usable)
                .collect();

            let serialized = serde_json::to_string_pretty(&combinations)
                .context("serializing combination cache")?;
            fs::write(path, serialized)
                .with_context(|| format!("writing combination cache: {}", path.display()))?;
            info!(
                "Wrote {} combinations to cache {}",
                combinations.len(),
                path.display()
            );
            Ok(combinations)
        }
        Err(e) => {
            Err(e).with_context(|| format!("reading combination cache: {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AmmKind;
    use async_trait::async_trait;
    use ethers::types::Address;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingResolver {
        calls: AtomicU32,
        output: Vec<TokenCombination>,
    }

    impl CountingResolver {
        fn new(output: Vec<TokenCombination>) -> Self {
            Self {
                calls: AtomicU32::new(0),
                output,
            }
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Resolver for CountingResolver {
        async fn resolve_all(&self) -> Result<Vec<TokenCombination>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn combo(symbols: &str, hops: usize, pools: usize) -> TokenCombination {
        TokenCombination {
            symbols: symbols.to_string(),
            addresses: (0..hops).map(|i| addr(1 + i as u64)).collect(),
            pairs: (0..pools).map(|i| addr(100 + i as u64)).collect(),
            kind: AmmKind::V2,
        }
    }

    #[tokio::test]
    async fn test_existing_cache_skips_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combinations-polygon.json");

        let cached = vec![combo("WMATIC-UNI", 2, 2)];
        fs::write(&path, serde_json::to_string_pretty(&cached).unwrap()).unwrap();

        let resolver = CountingResolver::new(vec![combo("SHOULD-NOT-APPEAR", 2, 2)]);
        let loaded = load_or_resolve(&path, &resolver).await.unwrap();

        assert_eq!(resolver.call_count(), 0);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].symbols, "WMATIC-UNI");
    }

    #[tokio::test]
    async fn test_missing_cache_resolves_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combinations-polygon.json");

        let resolver = CountingResolver::new(vec![combo("WMATIC-UNI", 2, 2)]);
        let first = load_or_resolve(&path, &resolver).await.unwrap();
        assert_eq!(resolver.call_count(), 1);
        assert_eq!(first.len(), 1);
        assert!(path.exists());

        // Second run must come from the file, not the resolver.
        let second = load_or_resolve(&path, &resolver).await.unwrap();
        assert_eq!(resolver.call_count(), 1);
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn test_unusable_combinations_never_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combinations-polygon.json");

        let resolver = CountingResolver::new(vec![
            combo("GOOD", 2, 2),
            combo("MISSING-HOP", 3, 2),
            combo("NO-POOLS", 2, 0),
        ]);

        let loaded = load_or_resolve(&path, &resolver).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].symbols, "GOOD");

        let on_disk: Vec<TokenCombination> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk[0].symbols, "GOOD");
    }

    #[tokio::test]
    async fn test_malformed_cache_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combinations-polygon.json");
        fs::write(&path, "{ not valid json").unwrap();

        let resolver = CountingResolver::new(vec![combo("GOOD", 2, 2)]);
        let result = load_or_resolve(&path, &resolver).await;

        assert!(result.is_err());
        // Malformed cache must not fall through to resolution.
        assert_eq!(resolver.call_count(), 0);
    }

    #[test]
    fn test_cache_file_name_per_network() {
        assert_eq!(
            cache_file(Network::Polygon),
            PathBuf::from("combinations-polygon.json")
        );
    }
}
