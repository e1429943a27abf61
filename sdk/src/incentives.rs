//! Display-ready incentive amounts
//!
//! Raw amounts are converted with the quoted decimals and priced with the
//! quoted unit price. Tokens the resolver has no quote for fall back to the
//! supported-token directory, then to an unknown 18-decimal token priced at 0.

use market_math::{parse_raw_amount_to_token_amount, parse_token_amount_to_token_amount_usd, parse_uint256};
use market_types::{
    EnrichedMarket, TokenDirectory, TokenId, TokenQuote, ANNUAL_CHANGE_RATIO_UNAVAILABLE,
    PER_INPUT_TOKEN_PLACEHOLDER, U256,
};
use serde::Serialize;

use crate::TokenQuotes;

/// Per-token incentive amounts for one action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncentiveTokenData {
    #[serde(flatten)]
    pub quote: TokenQuote,
    pub raw_amount: String,
    pub token_amount: f64,
    pub token_amount_usd: f64,
    pub per_input_token: f64,
    /// 10^18 when no ratio is available
    pub annual_change_ratio: f64,
}

/// The market input token; amounts are always zero for incentive actions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputTokenData {
    #[serde(flatten)]
    pub quote: TokenQuote,
    pub raw_amount: String,
    pub token_amount: f64,
    pub token_amount_usd: f64,
}

/// Incentive data aligned with the requested token order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncentiveData {
    pub incentive_data: Vec<IncentiveTokenData>,
    pub input_token_data: InputTokenData,
}

/// Quote for a token, falling back to directory metadata
pub fn token_quote(token_id: &TokenId, quotes: Option<&TokenQuotes>, tokens: &TokenDirectory) -> TokenQuote {
    quotes
        .and_then(|quotes| quotes.get(token_id))
        .cloned()
        .unwrap_or_else(|| TokenQuote::fallback(token_id, tokens.get(token_id)))
}

/// Incentive data for an extend request; amounts come from the request
///
/// Entries without a parseable amount count as zero.
pub fn calculate_extend_incentive_data(
    enriched_market: Option<&EnrichedMarket>,
    quotes: Option<&TokenQuotes>,
    tokens: &TokenDirectory,
    token_ids: &[TokenId],
    token_amounts: &[String],
) -> IncentiveData {
    let input_token_data = input_token_data(enriched_market, quotes, tokens);
    let incentive_data = match enriched_market {
        Some(_) => token_ids
            .iter()
            .enumerate()
            .map(|(i, token_id)| {
                let raw = token_amounts
                    .get(i)
                    .and_then(|amount| parse_uint256(amount).ok())
                    .unwrap_or(U256::ZERO);
                incentive_token_data(token_quote(token_id, quotes, tokens), raw)
            })
            .collect(),
        None => Vec::new(),
    };

    IncentiveData {
        incentive_data,
        input_token_data,
    }
}

/// Incentive data for a refund request; amounts come from the existing intervals
pub fn calculate_refund_incentive_data(
    enriched_market: Option<&EnrichedMarket>,
    quotes: Option<&TokenQuotes>,
    tokens: &TokenDirectory,
    token_ids: &[TokenId],
) -> IncentiveData {
    let input_token_data = input_token_data(enriched_market, quotes, tokens);
    let incentive_data = match enriched_market {
        Some(market) => token_ids
            .iter()
            .map(|token_id| {
                let raw = market
                    .incentives
                    .get(token_id)
                    .map(|interval| interval.amount)
                    .unwrap_or(U256::ZERO);
                incentive_token_data(token_quote(token_id, quotes, tokens), raw)
            })
            .collect(),
        None => Vec::new(),
    };

    IncentiveData {
        incentive_data,
        input_token_data,
    }
}

fn incentive_token_data(quote: TokenQuote, raw: U256) -> IncentiveTokenData {
    let token_amount = parse_raw_amount_to_token_amount(raw, quote.decimals);
    let token_amount_usd = parse_token_amount_to_token_amount_usd(token_amount, quote.price);

    IncentiveTokenData {
        quote,
        raw_amount: raw.to_string(),
        token_amount,
        token_amount_usd,
        per_input_token: PER_INPUT_TOKEN_PLACEHOLDER,
        annual_change_ratio: ANNUAL_CHANGE_RATIO_UNAVAILABLE,
    }
}

fn input_token_data(
    enriched_market: Option<&EnrichedMarket>,
    quotes: Option<&TokenQuotes>,
    tokens: &TokenDirectory,
) -> InputTokenData {
    let input_token_id = enriched_market
        .map(|market| market.input_token_id.clone())
        .unwrap_or_else(|| TokenId::new(""));

    InputTokenData {
        quote: token_quote(&input_token_id, quotes, tokens),
        raw_amount: "0".to_string(),
        token_amount: 0.0,
        token_amount_usd: 0.0,
    }
}
