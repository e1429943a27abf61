//! In-memory readers over fixed data

use async_trait::async_trait;
use market_types::{
    apply_custom_token_data, Address, CustomTokenDataElement, MarketSnapshot, QueryState, TokenId, TokenQuote, U256,
};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};
use tracing::debug;

use super::{AllowanceReader, MarketRead, MarketStateReader, TokenAllowances, TokenQuoteResolver, TokenQuotes};

/// Serves market snapshots keyed by chain and market id
#[derive(Debug, Default)]
pub struct InMemoryMarketReader {
    markets: HashMap<(u64, Address), MarketSnapshot>,
    loading: bool,
}

impl InMemoryMarketReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_market(mut self, chain_id: u64, snapshot: MarketSnapshot) -> Self {
        self.markets.insert((chain_id, snapshot.enriched.market_id), snapshot);
        self
    }

    /// Report every read as in flight
    pub fn always_loading(mut self) -> Self {
        self.loading = true;
        self
    }
}

#[async_trait]
impl MarketStateReader for InMemoryMarketReader {
    async fn read_market(&self, chain_id: u64, market_id: Address) -> MarketRead {
        if self.loading {
            return MarketRead::loading();
        }
        match self.markets.get(&(chain_id, market_id)) {
            Some(snapshot) => MarketRead::ready(snapshot.base.clone(), snapshot.enriched.clone()),
            None => {
                debug!("No market {} on chain {}", market_id, chain_id);
                MarketRead::idle()
            }
        }
    }
}

/// Serves quotes from a fixed table; unknown tokens are left out
#[derive(Debug, Default)]
pub struct InMemoryQuoteResolver {
    quotes: TokenQuotes,
    loading: bool,
}

impl InMemoryQuoteResolver {
    pub fn new(quotes: impl IntoIterator<Item = TokenQuote>) -> Self {
        Self {
            quotes: quotes.into_iter().map(|quote| (quote.token_id.clone(), quote)).collect(),
            loading: false,
        }
    }

    pub fn always_loading(mut self) -> Self {
        self.loading = true;
        self
    }
}

#[async_trait]
impl TokenQuoteResolver for InMemoryQuoteResolver {
    async fn resolve_quotes(
        &self,
        token_ids: &[TokenId],
        custom_token_data: &[CustomTokenDataElement],
    ) -> QueryState<TokenQuotes> {
        if self.loading {
            return QueryState::loading();
        }
        let quotes = token_ids
            .iter()
            .filter_map(|token_id| {
                let quote = self.quotes.get(token_id).cloned().or_else(|| {
                    // Custom data alone is enough to quote an unlisted token
                    custom_token_data
                        .iter()
                        .any(|entry| &entry.token_id == token_id)
                        .then(|| TokenQuote::fallback(token_id, None))
                })?;
                Some((token_id.clone(), apply_custom_token_data(quote, custom_token_data)))
            })
            .collect();
        QueryState::ready(quotes)
    }
}

/// Serves allowances from a fixed table and counts reads
#[derive(Debug, Default)]
pub struct InMemoryAllowanceReader {
    allowances: TokenAllowances,
    loading: bool,
    reads: AtomicUsize,
}

impl InMemoryAllowanceReader {
    pub fn new(allowances: impl IntoIterator<Item = (Address, U256)>) -> Self {
        Self {
            allowances: allowances.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn always_loading(mut self) -> Self {
        self.loading = true;
        self
    }

    /// Number of reads served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AllowanceReader for InMemoryAllowanceReader {
    async fn read_allowances(
        &self,
        _chain_id: u64,
        _owner: Address,
        _spender: Address,
        tokens: &[Address],
    ) -> QueryState<TokenAllowances> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.loading {
            return QueryState::loading();
        }
        QueryState::ready(
            tokens
                .iter()
                .filter_map(|token| self.allowances.get(token).map(|amount| (*token, *amount)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(byte: u8) -> TokenId {
        TokenId::from_parts("1", &Address::repeat_byte(byte))
    }

    #[tokio::test]
    async fn test_quote_resolver_applies_custom_data() {
        let listed = TokenQuote {
            token_id: token(0xaa),
            symbol: "WETH".to_string(),
            decimals: 18,
            price: 2_000.0,
        };
        let resolver = InMemoryQuoteResolver::new(vec![listed]);
        let custom = vec![CustomTokenDataElement {
            token_id: token(0xbb),
            symbol: Some("PTS".to_string()),
            decimals: Some(6),
            price: Some(0.5),
        }];

        let state = resolver.resolve_quotes(&[token(0xaa), token(0xbb), token(0xcc)], &custom).await;
        let quotes = state.resolved().unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[&token(0xaa)].price, 2_000.0);
        assert_eq!(quotes[&token(0xbb)].symbol, "PTS");
        assert_eq!(quotes[&token(0xbb)].decimals, 6);
    }

    #[tokio::test]
    async fn test_allowance_reader_only_returns_requested_tokens() {
        let reader = InMemoryAllowanceReader::new(vec![
            (Address::repeat_byte(1), U256::from(10u64)),
            (Address::repeat_byte(2), U256::from(20u64)),
        ]);
        let state = reader
            .read_allowances(1, Address::ZERO, Address::ZERO, &[Address::repeat_byte(2)])
            .await;
        assert_eq!(state.resolved().unwrap().len(), 1);
        assert_eq!(reader.reads(), 1);
    }
}
