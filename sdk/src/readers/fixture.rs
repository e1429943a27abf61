//! File-backed readers for offline runs
//!
//! A fixture is one JSON document holding the market snapshot in its wire
//! layout, the quotes and allowances to serve, and the action request.

use market_math::parse_uint256;
use market_types::{Address, MarketSnapshot, MarketSnapshotWire, TokenQuote};
use serde::{de::DeserializeOwned, Deserialize};
use std::{collections::HashMap, path::Path};
use tracing::debug;

use super::{InMemoryAllowanceReader, InMemoryMarketReader, InMemoryQuoteResolver};
use crate::SdkResult;

/// Fixture document; `request` holds the action parameters
#[derive(Debug, Clone, Deserialize)]
pub struct ActionFixture<P> {
    pub chain_id: u64,
    pub market: MarketSnapshotWire,
    #[serde(default)]
    pub quotes: Vec<TokenQuote>,
    /// Token address to raw allowance (decimal string)
    #[serde(default)]
    pub allowances: HashMap<Address, String>,
    /// Pinned unix time; wall-clock time when absent
    #[serde(default)]
    pub now: Option<u64>,
    pub request: P,
}

/// Readers serving the contents of a fixture
pub struct FixtureReaders {
    pub market: InMemoryMarketReader,
    pub quotes: InMemoryQuoteResolver,
    pub allowances: InMemoryAllowanceReader,
}

impl<P: DeserializeOwned> ActionFixture<P> {
    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> SdkResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

impl<P> ActionFixture<P> {
    /// Build readers over the fixture data, validating the market snapshot
    pub fn readers(&self) -> SdkResult<FixtureReaders> {
        let snapshot = MarketSnapshot::try_from(self.market.clone())?;
        debug!(
            market_id = %snapshot.enriched.market_id,
            incentives = snapshot.enriched.incentives.len(),
            "Loaded market fixture"
        );

        let allowances = self
            .allowances
            .iter()
            .map(|(token, amount)| Ok((*token, parse_uint256(amount)?)))
            .collect::<SdkResult<Vec<_>>>()?;

        Ok(FixtureReaders {
            market: InMemoryMarketReader::new().with_market(self.chain_id, snapshot),
            quotes: InMemoryQuoteResolver::new(self.quotes.clone()),
            allowances: InMemoryAllowanceReader::new(allowances),
        })
    }
}
