/// Market snapshots and incentive intervals
///
/// Typed snapshots are keyed by token id. The parallel-array layout of the
/// market data source survives only in the `*Wire` structs, which convert
/// into typed snapshots through `TryFrom`.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::{errors::MarketDataError, token::{parse_address, TokenId}};

// ============================================================================
// Market Type
// ============================================================================

/// Kind of market an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Recipe,
    Vault,
}

impl MarketType {
    /// Numeric id used by the market data source
    pub fn id(&self) -> u8 {
        match self {
            MarketType::Recipe => 0,
            MarketType::Vault => 1,
        }
    }
}

// ============================================================================
// Base Market
// ============================================================================

/// On-chain market parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseMarket {
    /// Frontend fee fraction, denominator 10^18
    pub frontend_fee: U256,
    /// Protocol fee fraction, denominator 10^18
    pub protocol_fee: U256,
    pub protocol_fee_recipient: Address,
}

/// Base market as delivered by the market data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseMarketWire {
    pub frontend_fee: String,
    pub protocol_fee: String,
    pub protocol_fee_recipient: String,
}

impl TryFrom<BaseMarketWire> for BaseMarket {
    type Error = MarketDataError;

    fn try_from(wire: BaseMarketWire) -> Result<Self, Self::Error> {
        Ok(Self {
            frontend_fee: parse_uint("frontend_fee", &wire.frontend_fee)?,
            protocol_fee: parse_uint("protocol_fee", &wire.protocol_fee)?,
            protocol_fee_recipient: parse_address(&wire.protocol_fee_recipient).ok_or_else(|| {
                MarketDataError::InvalidAddress {
                    field: "protocol_fee_recipient",
                    value: wire.protocol_fee_recipient.clone(),
                }
            })?,
        })
    }
}

// ============================================================================
// Incentive Intervals
// ============================================================================

/// Current reward interval of one incentive token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveInterval {
    /// Total amount allocated to the interval
    pub amount: U256,
    /// Reward units per second
    pub rate: U256,
    pub start_timestamp: u64,
    pub end_timestamp: u64,
}

/// Incentive intervals keyed by token id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveBook {
    intervals: HashMap<TokenId, IncentiveInterval>,
}

impl IncentiveBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an interval, rejecting a token that is already present
    pub fn insert(
        &mut self,
        token_id: TokenId,
        interval: IncentiveInterval,
    ) -> Result<(), MarketDataError> {
        if self.intervals.contains_key(&token_id) {
            return Err(MarketDataError::DuplicateIncentive(token_id.to_string()));
        }
        self.intervals.insert(token_id, interval);
        Ok(())
    }

    pub fn get(&self, token_id: &TokenId) -> Option<&IncentiveInterval> {
        self.intervals.get(token_id)
    }

    pub fn contains(&self, token_id: &TokenId) -> bool {
        self.intervals.contains_key(token_id)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TokenId, &IncentiveInterval)> {
        self.intervals.iter()
    }
}

/// Later entries replace earlier ones for the same token
impl FromIterator<(TokenId, IncentiveInterval)> for IncentiveBook {
    fn from_iter<I: IntoIterator<Item = (TokenId, IncentiveInterval)>>(iter: I) -> Self {
        Self {
            intervals: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Enriched Market
// ============================================================================

/// Aggregate market data with the current incentive intervals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedMarket {
    /// Vault address; also the spender of incentive approvals
    pub market_id: Address,
    pub input_token_id: TokenId,
    pub incentives: IncentiveBook,
}

/// Enriched market as delivered by the market data source
///
/// All `base_*` arrays are index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedMarketWire {
    pub market_id: String,
    pub input_token_id: String,
    #[serde(default)]
    pub base_incentive_ids: Vec<String>,
    #[serde(default)]
    pub base_incentive_amounts: Vec<String>,
    #[serde(default)]
    pub base_incentive_rates: Vec<String>,
    #[serde(default)]
    pub base_start_timestamps: Vec<String>,
    #[serde(default)]
    pub base_end_timestamps: Vec<String>,
}

impl TryFrom<EnrichedMarketWire> for EnrichedMarket {
    type Error = MarketDataError;

    fn try_from(wire: EnrichedMarketWire) -> Result<Self, Self::Error> {
        let expected = wire.base_incentive_ids.len();
        for (array, actual) in [
            ("base_incentive_amounts", wire.base_incentive_amounts.len()),
            ("base_incentive_rates", wire.base_incentive_rates.len()),
            ("base_start_timestamps", wire.base_start_timestamps.len()),
            ("base_end_timestamps", wire.base_end_timestamps.len()),
        ] {
            if actual != expected {
                return Err(MarketDataError::ArrayLengthMismatch {
                    array,
                    expected,
                    actual,
                });
            }
        }

        let market_id = parse_address(&wire.market_id).ok_or_else(|| MarketDataError::InvalidAddress {
            field: "market_id",
            value: wire.market_id.clone(),
        })?;

        let mut seen = HashSet::with_capacity(expected);
        let mut incentives = IncentiveBook::new();
        for i in 0..expected {
            let token_id = TokenId::new(wire.base_incentive_ids[i].clone());
            if !seen.insert(token_id.clone()) {
                return Err(MarketDataError::DuplicateIncentive(token_id.to_string()));
            }

            let interval = IncentiveInterval {
                amount: parse_uint("base_incentive_amounts", &wire.base_incentive_amounts[i])?,
                rate: parse_uint("base_incentive_rates", &wire.base_incentive_rates[i])?,
                start_timestamp: parse_timestamp("base_start_timestamps", &wire.base_start_timestamps[i])?,
                end_timestamp: parse_timestamp("base_end_timestamps", &wire.base_end_timestamps[i])?,
            };
            incentives.insert(token_id, interval)?;
        }

        Ok(Self {
            market_id,
            input_token_id: TokenId::new(wire.input_token_id),
            incentives,
        })
    }
}

/// Base and enriched market read together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub base: BaseMarket,
    pub enriched: EnrichedMarket,
}

/// Market snapshot as delivered by the market data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshotWire {
    pub base_market: BaseMarketWire,
    pub enriched_market: EnrichedMarketWire,
}

impl TryFrom<MarketSnapshotWire> for MarketSnapshot {
    type Error = MarketDataError;

    fn try_from(wire: MarketSnapshotWire) -> Result<Self, Self::Error> {
        Ok(Self {
            base: wire.base_market.try_into()?,
            enriched: wire.enriched_market.try_into()?,
        })
    }
}

// ============================================================================
// Parsing Helpers
// ============================================================================

fn parse_uint(field: &'static str, value: &str) -> Result<U256, MarketDataError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MarketDataError::InvalidValue {
            field,
            value: value.to_string(),
        });
    }
    U256::from_str_radix(value, 10).map_err(|_| MarketDataError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<u64, MarketDataError> {
    value.parse::<u64>().map_err(|_| MarketDataError::InvalidValue {
        field,
        value: value.to_string(),
    })
}
