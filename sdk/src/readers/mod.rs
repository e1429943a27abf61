//! Capability contracts for the external reads the action pipeline composes
//!
//! Readers own caching, retries and timeouts. The pipeline only observes the
//! `QueryState` they hand back: data when resolved, a loading flag while a
//! fetch is in flight.

mod fixture;
mod memory;

pub use fixture::*;
pub use memory::*;

use async_trait::async_trait;
use market_types::{
    Address, BaseMarket, CustomTokenDataElement, EnrichedMarket, QueryState, TokenId, TokenQuote, U256,
};
use std::collections::HashMap;

/// Quotes keyed by token id
pub type TokenQuotes = HashMap<TokenId, TokenQuote>;

/// Allowances keyed by token contract address
pub type TokenAllowances = HashMap<Address, U256>;

/// Market snapshot as seen by the pipeline
///
/// Either half may be missing independently of the loading flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketRead {
    pub base_market: Option<BaseMarket>,
    pub enriched_market: Option<EnrichedMarket>,
    pub is_loading: bool,
}

impl MarketRead {
    pub fn ready(base_market: BaseMarket, enriched_market: EnrichedMarket) -> Self {
        Self {
            base_market: Some(base_market),
            enriched_market: Some(enriched_market),
            is_loading: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    /// Read that was never issued
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Current on-chain market parameters and enriched incentive data
#[async_trait]
pub trait MarketStateReader: Send + Sync {
    async fn read_market(&self, chain_id: u64, market_id: Address) -> MarketRead;
}

/// Token prices and metadata
#[async_trait]
pub trait TokenQuoteResolver: Send + Sync {
    /// Quotes for `token_ids`, with `custom_token_data` applied on top
    async fn resolve_quotes(
        &self,
        token_ids: &[TokenId],
        custom_token_data: &[CustomTokenDataElement],
    ) -> QueryState<TokenQuotes>;
}

/// ERC-20 allowances granted by `owner` to `spender`
#[async_trait]
pub trait AllowanceReader: Send + Sync {
    async fn read_allowances(
        &self,
        chain_id: u64,
        owner: Address,
        spender: Address,
        tokens: &[Address],
    ) -> QueryState<TokenAllowances>;
}
