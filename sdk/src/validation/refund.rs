use market_types::{
    Address, BaseMarket, EnrichedMarket, IncentiveInterval, TokenId, ValidationError, ValidationOutcome,
    ValidationResult,
};

use super::{require_market, require_token_ids, token_addresses, RefundIncentivesRequest};

/// A validated refund of one incentive interval that has not started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncentiveRefund {
    pub token_id: TokenId,
    pub token_address: Address,
    pub interval: IncentiveInterval,
}

/// Validate a refund-incentives request against the current market
///
/// A refund is only possible while `now` is before the interval start.
pub fn validate_refund_incentives(
    base_market: Option<&BaseMarket>,
    enriched_market: Option<&EnrichedMarket>,
    request: &RefundIncentivesRequest,
    now: u64,
) -> ValidationOutcome<Vec<IncentiveRefund>> {
    let (_, enriched) = require_market(base_market, enriched_market)?;
    let token_ids = require_token_ids(request.token_ids.as_deref())?;
    let addresses = token_addresses(token_ids)?;

    token_ids
        .iter()
        .zip(addresses)
        .map(|(token_id, token_address)| {
            let interval = enriched
                .incentives
                .get(token_id)
                .ok_or_else(|| ValidationError::TokenNotAdded {
                    token_id: token_id.to_string(),
                })?;
            if now >= interval.start_timestamp {
                return Err(ValidationError::IntervalAlreadyStarted {
                    token_id: token_id.to_string(),
                });
            }
            Ok(IncentiveRefund {
                token_id: token_id.clone(),
                token_address,
                interval: interval.clone(),
            })
        })
        .collect()
}

/// Verdict form of [`validate_refund_incentives`]
pub fn is_refund_incentives_valid(
    base_market: Option<&BaseMarket>,
    enriched_market: Option<&EnrichedMarket>,
    request: &RefundIncentivesRequest,
    now: u64,
) -> ValidationResult {
    ValidationResult::from(&validate_refund_incentives(base_market, enriched_market, request, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use market_types::{MarketSnapshot, RequestField, U256, WAD};

    fn request(ids: &[TokenId]) -> RefundIncentivesRequest {
        RefundIncentivesRequest {
            token_ids: Some(ids.to_vec()),
        }
    }

    fn future_market(start: u64) -> MarketSnapshot {
        MarketFixture::new()
            .with_incentive(incentive_token_id(), interval(WAD, U256::from(7u64), start, start + 1_000))
            .build()
    }

    #[test]
    fn test_refund_before_start_is_valid() {
        let market = future_market(NOW + 1);
        let refunds = validate_refund_incentives(
            Some(&market.base),
            Some(&market.enriched),
            &request(&[incentive_token_id()]),
            NOW,
        )
        .unwrap();
        assert_eq!(refunds.len(), 1);
        assert_eq!(refunds[0].token_address, incentive_token_address());
        assert_eq!(refunds[0].interval.amount, WAD);
    }

    #[test]
    fn test_refund_at_or_after_start_is_rejected() {
        for start in [NOW, NOW - 1] {
            let market = future_market(start);
            let verdict = is_refund_incentives_valid(
                Some(&market.base),
                Some(&market.enriched),
                &request(&[incentive_token_id()]),
                NOW,
            );
            assert!(!verdict.status);
            assert_eq!(
                verdict.message,
                "Interval is already in progress. Incentives cannot be refunded."
            );
        }
    }

    #[test]
    fn test_refund_presence_checks() {
        let market = future_market(NOW + 1);
        assert_eq!(
            validate_refund_incentives(None, None, &request(&[incentive_token_id()]), NOW),
            Err(ValidationError::MissingMarket)
        );
        assert_eq!(
            validate_refund_incentives(
                Some(&market.base),
                Some(&market.enriched),
                &RefundIncentivesRequest::default(),
                NOW
            ),
            Err(ValidationError::MissingField(RequestField::IncentiveIds))
        );
        assert_eq!(
            validate_refund_incentives(Some(&market.base), Some(&market.enriched), &request(&[]), NOW),
            Err(ValidationError::EmptyInput)
        );
        assert!(matches!(
            validate_refund_incentives(
                Some(&market.base),
                Some(&market.enriched),
                &request(&[token_id(0xcc)]),
                NOW
            ),
            Err(ValidationError::TokenNotAdded { .. })
        ));
    }
}
