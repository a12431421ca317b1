//! Combination Generator
//!
//! Enumerates candidate cyclic routes from the static token catalog.
//! Pure functions over config — no chain access here.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use crate::types::{AmmKind, Token, TokenCombination};

/// All ordered triples `(base, quote1, quote2)` with `quote1 != quote2`:
/// exactly `base.len() * quotes.len() * (quotes.len() - 1)` results.
/// Triples differing only by rotation are NOT deduplicated; the
/// redundancy is known and accepted.
pub fn triangle_combinations(base_tokens: &[Token], quote_tokens: &[Token]) -> Vec<TokenCombination> {
    let mut combinations = Vec::new();

    for base in base_tokens {
        for quote1 in quote_tokens {
            for quote2 in quote_tokens {
                if quote1.address == quote2.address {
                    continue;
                }
                combinations.push(TokenCombination {
                    symbols: format!("{}-{}-{}", base.symbol, quote1.symbol, quote2.symbol),
                    addresses: vec![base.address, quote1.address, quote2.address],
                    pairs: Vec::new(),
                    kind: AmmKind::V3,
                });
            }
        }
    }

    combinations
}

/// All `(base, quote)` pairs. Each expands during resolution into 2-hop
/// cycles across distinct V2 venues trading the same pair.
pub fn pair_combinations(base_tokens: &[Token], quote_tokens: &[Token]) -> Vec<TokenCombination> {
    let mut combinations = Vec::new();

    for base in base_tokens {
        for quote in quote_tokens {
            combinations.push(TokenCombination {
                symbols: format!("{}-{}", base.symbol, quote.symbol),
                addresses: vec![base.address, quote.address],
                pairs: Vec::new(),
                kind: AmmKind::V2,
            });
        }
    }

    combinations
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Address;

    fn tokens(prefix: &str, start: u64, count: u64) -> Vec<Token> {
        (0..count)
            .map(|i| Token::new(&format!("{}{}", prefix, i), Address::from_low_u64_be(start + i)))
            .collect()
    }

    #[test]
    fn test_triangle_count_is_m_n_n_minus_1() {
        let base = tokens("B", 1, 3);
        let quotes = tokens("Q", 100, 8);

        let combos = triangle_combinations(&base, &quotes);
        assert_eq!(combos.len(), 3 * 8 * 7);
    }

    #[test]
    fn test_triangle_quotes_always_distinct() {
        let base = tokens("B", 1, 2);
        let quotes = tokens("Q", 100, 4);

        for combo in triangle_combinations(&base, &quotes) {
            assert_eq!(combo.addresses.len(), 3);
            assert_ne!(combo.addresses[1], combo.addresses[2]);
            assert!(combo.pairs.is_empty());
            assert_eq!(combo.kind, AmmKind::V3);
        }
    }

    #[test]
    fn test_triangle_symbols_join_order() {
        let base = tokens("BASE", 1, 1);
        let quotes = tokens("Q", 100, 2);

        let combos = triangle_combinations(&base, &quotes);
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0].symbols, "BASE0-Q0-Q1");
        assert_eq!(combos[1].symbols, "BASE0-Q1-Q0");
    }

    #[test]
    fn test_pair_count_is_m_n() {
        let base = tokens("B", 1, 3);
        let quotes = tokens("Q", 100, 8);

        let combos = pair_combinations(&base, &quotes);
        assert_eq!(combos.len(), 24);
        for combo in combos {
            assert_eq!(combo.addresses.len(), 2);
            assert_eq!(combo.kind, AmmKind::V2);
        }
    }
}
