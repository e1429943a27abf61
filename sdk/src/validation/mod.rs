//! Market action validation
//!
//! Validators are sequential check pipelines. Each returns the typed
//! per-token records later stages consume, or the first violated rule as a
//! `ValidationError`. `ValidationResult::from` turns either outcome into the
//! `{status, message}` verdict the presentation layer shows.

mod extend;
mod refund;

pub use extend::*;
pub use refund::*;

use market_types::{
    Address, BaseMarket, EnrichedMarket, RequestField, TokenId, ValidationError, ValidationOutcome,
};
use serde::{Deserialize, Serialize};

/// Extend request as entered by the user; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendIncentivesRequest {
    #[serde(default)]
    pub token_ids: Option<Vec<TokenId>>,
    /// Raw amounts as decimal strings
    #[serde(default)]
    pub token_amounts: Option<Vec<String>>,
    /// Unix seconds as decimal strings
    #[serde(default)]
    pub end_timestamps: Option<Vec<String>>,
}

/// Refund request as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundIncentivesRequest {
    #[serde(default)]
    pub token_ids: Option<Vec<TokenId>>,
}

// ============================================================================
// Shared Checks
// ============================================================================

/// Both market snapshots, or `MissingMarket`
pub(crate) fn require_market<'a>(
    base_market: Option<&'a BaseMarket>,
    enriched_market: Option<&'a EnrichedMarket>,
) -> ValidationOutcome<(&'a BaseMarket, &'a EnrichedMarket)> {
    match (base_market, enriched_market) {
        (Some(base), Some(enriched)) => Ok((base, enriched)),
        _ => Err(ValidationError::MissingMarket),
    }
}

/// Present, non-empty token ids
pub(crate) fn require_token_ids(token_ids: Option<&[TokenId]>) -> ValidationOutcome<&[TokenId]> {
    let token_ids = token_ids.ok_or(ValidationError::MissingField(RequestField::IncentiveIds))?;
    if token_ids.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(token_ids)
}

/// Token addresses of every id, in request order
pub(crate) fn token_addresses(token_ids: &[TokenId]) -> ValidationOutcome<Vec<Address>> {
    token_ids
        .iter()
        .map(|token_id| {
            token_id.address().ok_or_else(|| ValidationError::InvalidAddress {
                token_id: token_id.to_string(),
            })
        })
        .collect()
}
