use market_math::{apply_market_fees, extended_rate, parse_uint256, to_i256, FeeBreakdown};
use market_types::{
    Address, BaseMarket, EnrichedMarket, IncentiveInterval, RequestField, TokenId, ValidationError,
    ValidationOutcome, ValidationResult, I256, ONE_WEEK_SECONDS, U256,
};

use super::{require_market, require_token_ids, token_addresses, ExtendIncentivesRequest};

/// A validated extension of one incentive interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncentiveExtension {
    pub token_id: TokenId,
    pub token_address: Address,
    /// Raw amount added, before fees
    pub amount: U256,
    pub end_timestamp: u64,
    pub fees: FeeBreakdown,
    /// Start of the extended interval: `max(now, existing start)`
    pub new_start: u64,
    pub new_rate: I256,
    pub existing: IncentiveInterval,
}

impl IncentiveExtension {
    pub fn duration(&self) -> u64 {
        self.end_timestamp - self.new_start
    }
}

/// Validate an extend-incentives request against the current market
///
/// Checks run in a fixed order and stop at the first failure:
/// market presence, token ids, token addresses, amounts, array lengths, end
/// timestamps, then per token the interval rules (token added, end moves
/// later, end in the future, one week minimum, rate does not drop).
pub fn validate_extend_incentives(
    base_market: Option<&BaseMarket>,
    enriched_market: Option<&EnrichedMarket>,
    request: &ExtendIncentivesRequest,
    now: u64,
) -> ValidationOutcome<Vec<IncentiveExtension>> {
    let (base, enriched) = require_market(base_market, enriched_market)?;
    let token_ids = require_token_ids(request.token_ids.as_deref())?;
    let addresses = token_addresses(token_ids)?;

    let amounts = parse_amounts(token_ids, request.token_amounts.as_deref())?;
    if token_ids.len() != amounts.len() {
        return Err(ValidationError::LengthMismatch {
            ids: token_ids.len(),
            amounts: amounts.len(),
        });
    }

    let end_timestamps = request
        .end_timestamps
        .as_deref()
        .ok_or(ValidationError::MissingField(RequestField::EndTimestamps))?;
    if token_ids.len() != end_timestamps.len() {
        return Err(ValidationError::TimestampLengthMismatch {
            ids: token_ids.len(),
            end_timestamps: end_timestamps.len(),
        });
    }

    token_ids
        .iter()
        .zip(addresses)
        .zip(amounts)
        .zip(end_timestamps)
        .map(|(((token_id, token_address), amount), end_timestamp)| {
            extend_interval(base, enriched, token_id, token_address, amount, end_timestamp, now)
        })
        .collect()
}

/// Verdict form of [`validate_extend_incentives`]
pub fn is_extend_incentives_valid(
    base_market: Option<&BaseMarket>,
    enriched_market: Option<&EnrichedMarket>,
    request: &ExtendIncentivesRequest,
    now: u64,
) -> ValidationResult {
    ValidationResult::from(&validate_extend_incentives(base_market, enriched_market, request, now))
}

fn parse_amounts(token_ids: &[TokenId], token_amounts: Option<&[String]>) -> ValidationOutcome<Vec<U256>> {
    let token_amounts = token_amounts.ok_or(ValidationError::MissingField(RequestField::IncentiveAmounts))?;

    token_amounts
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let amount = parse_uint256(value).map_err(|_| ValidationError::InvalidAmount {
                value: value.clone(),
            })?;
            if amount.is_zero() {
                return Err(ValidationError::NonPositiveAmount {
                    token_id: token_ids.get(i).map(TokenId::to_string).unwrap_or_default(),
                });
            }
            Ok(amount)
        })
        .collect()
}

fn parse_end_timestamp(value: &str) -> ValidationOutcome<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidTimestamp {
            value: value.to_string(),
        });
    }
    value.parse::<u64>().map_err(|_| ValidationError::InvalidTimestamp {
        value: value.to_string(),
    })
}

fn extend_interval(
    base: &BaseMarket,
    enriched: &EnrichedMarket,
    token_id: &TokenId,
    token_address: Address,
    amount: U256,
    end_timestamp: &str,
    now: u64,
) -> ValidationOutcome<IncentiveExtension> {
    let existing = enriched
        .incentives
        .get(token_id)
        .ok_or_else(|| ValidationError::TokenNotAdded {
            token_id: token_id.to_string(),
        })?;
    let new_end = parse_end_timestamp(end_timestamp)?;

    if new_end <= existing.end_timestamp {
        return Err(ValidationError::EndTimestampNotGreater {
            existing: existing.end_timestamp,
            requested: new_end,
        });
    }
    if new_end <= now {
        return Err(ValidationError::IntervalNotInProgress {
            now,
            requested: new_end,
        });
    }

    let fees = apply_market_fees(amount, base.frontend_fee, base.protocol_fee)?;

    let new_start = now.max(existing.start_timestamp);
    let duration = new_end.saturating_sub(new_start);
    if duration < ONE_WEEK_SECONDS {
        return Err(ValidationError::DurationTooShort { duration });
    }

    let extension = extended_rate(
        fees.rewards_after_fee,
        existing.rate,
        existing.end_timestamp,
        new_start,
        new_end,
    )?;
    if extension.new_rate < to_i256(existing.rate)? {
        return Err(ValidationError::RateNotIncreasing {
            token_id: token_id.to_string(),
        });
    }

    Ok(IncentiveExtension {
        token_id: token_id.clone(),
        token_address,
        amount,
        end_timestamp: new_end,
        fees,
        new_start,
        new_rate: extension.new_rate,
        existing: existing.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use market_types::{MarketSnapshot, WAD};

    fn request(token_id: &TokenId, amount: &str, end: u64) -> ExtendIncentivesRequest {
        ExtendIncentivesRequest {
            token_ids: Some(vec![token_id.clone()]),
            token_amounts: Some(vec![amount.to_string()]),
            end_timestamps: Some(vec![end.to_string()]),
        }
    }

    fn validate(market: &MarketSnapshot, request: &ExtendIncentivesRequest) -> ValidationOutcome<Vec<IncentiveExtension>> {
        validate_extend_incentives(Some(&market.base), Some(&market.enriched), request, NOW)
    }

    fn error_of(market: &MarketSnapshot, request: &ExtendIncentivesRequest) -> ValidationError {
        validate(market, request).unwrap_err()
    }

    #[test]
    fn test_scenario_extension_is_valid() {
        let market = scenario_market(NOW);
        let token = incentive_token_id();
        let extensions = validate(&market, &request(&token, "1000000000000000000", NOW + 2_000_000)).unwrap();

        assert_eq!(extensions.len(), 1);
        let extension = &extensions[0];
        assert_eq!(extension.token_address, incentive_token_address());
        assert_eq!(extension.new_start, NOW);
        assert_eq!(extension.fees.rewards_after_fee, WAD);
        // 1e18 / 2_000_000 seconds
        assert_eq!(extension.new_rate, to_i256(U256::from(500_000_000_000u64)).unwrap());
    }

    #[test]
    fn test_short_extension_reports_duration_message() {
        let market = scenario_market(NOW);
        let verdict = is_extend_incentives_valid(
            Some(&market.base),
            Some(&market.enriched),
            &request(&incentive_token_id(), "1000000000000000000", NOW + 500_000),
            NOW,
        );
        assert!(!verdict.status);
        assert_eq!(verdict.message, "Incentive duration must be at least 1 week");
    }

    #[test]
    fn test_missing_market() {
        let req = request(&incentive_token_id(), "1", NOW + 2_000_000);
        let market = scenario_market(NOW);
        assert_eq!(
            validate_extend_incentives(None, Some(&market.enriched), &req, NOW),
            Err(ValidationError::MissingMarket)
        );
        assert_eq!(
            validate_extend_incentives(Some(&market.base), None, &req, NOW),
            Err(ValidationError::MissingMarket)
        );
    }

    #[test]
    fn test_input_shape_checks_run_in_order() {
        let market = scenario_market(NOW);
        let token = incentive_token_id();

        let mut req = request(&token, "abc", NOW + 2_000_000);
        req.token_ids = Some(vec![TokenId::new("1-0xAAA")]);
        // Address check precedes the amount check
        assert!(matches!(error_of(&market, &req), ValidationError::InvalidAddress { .. }));

        let mut req = request(&token, "1", NOW + 2_000_000);
        req.token_amounts = None;
        assert_eq!(
            error_of(&market, &req),
            ValidationError::MissingField(RequestField::IncentiveAmounts)
        );

        assert!(matches!(
            error_of(&market, &request(&token, "1.5", NOW + 2_000_000)),
            ValidationError::InvalidAmount { .. }
        ));
        assert!(matches!(
            error_of(&market, &request(&token, "-1", NOW + 2_000_000)),
            ValidationError::InvalidAmount { .. }
        ));
        assert!(matches!(
            error_of(&market, &request(&token, "0", NOW + 2_000_000)),
            ValidationError::NonPositiveAmount { .. }
        ));

        let mut req = request(&token, "1", NOW + 2_000_000);
        req.token_amounts = Some(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(
            error_of(&market, &req),
            ValidationError::LengthMismatch { ids: 1, amounts: 2 }
        );

        let mut req = request(&token, "1", NOW + 2_000_000);
        req.end_timestamps = None;
        assert_eq!(
            error_of(&market, &req),
            ValidationError::MissingField(RequestField::EndTimestamps)
        );

        let mut req = request(&token, "1", NOW + 2_000_000);
        req.end_timestamps = Some(vec![]);
        assert!(matches!(
            error_of(&market, &req),
            ValidationError::TimestampLengthMismatch { ids: 1, end_timestamps: 0 }
        ));
    }

    #[test]
    fn test_unknown_token_is_not_added() {
        let market = scenario_market(NOW);
        let other = token_id(0xcc);
        assert!(matches!(
            error_of(&market, &request(&other, "1", NOW + 2_000_000)),
            ValidationError::TokenNotAdded { .. }
        ));
    }

    #[test]
    fn test_end_timestamp_rules() {
        let token = incentive_token_id();
        let market = scenario_market(NOW);
        // Existing interval ends at NOW + 100
        assert_eq!(
            error_of(&market, &request(&token, "1", NOW + 100)),
            ValidationError::EndTimestampNotGreater {
                existing: NOW + 100,
                requested: NOW + 100
            }
        );
        assert!(matches!(
            error_of(&market, &request(&token, "1", 0)),
            ValidationError::EndTimestampNotGreater { .. }
        ));
        assert!(matches!(
            error_of(&market, &request(&token, "soon", NOW + 2_000_000)),
            ValidationError::InvalidTimestamp { .. }
        ));

        // Interval already over: a later end that is still in the past
        let ended = MarketFixture::new()
            .with_incentive(token.clone(), interval(WAD, U256::ZERO, NOW - 1_000, NOW - 500))
            .build();
        assert_eq!(
            error_of(&ended, &request(&token, "1", NOW - 10)),
            ValidationError::IntervalNotInProgress {
                now: NOW,
                requested: NOW - 10
            }
        );
    }

    #[test]
    fn test_one_week_boundary_uses_future_start() {
        let token = incentive_token_id();
        // Interval not started yet: the extension starts at the existing start
        let start = NOW + 10_000;
        let market = MarketFixture::new()
            .with_incentive(token.clone(), interval(WAD, U256::ZERO, start, start + 100))
            .build();

        assert_eq!(
            error_of(&market, &request(&token, "1000000", start + ONE_WEEK_SECONDS - 1)),
            ValidationError::DurationTooShort {
                duration: ONE_WEEK_SECONDS - 1
            }
        );
        let extensions = validate(&market, &request(&token, "1000000", start + ONE_WEEK_SECONDS)).unwrap();
        assert_eq!(extensions[0].new_start, start);
        assert_eq!(extensions[0].duration(), ONE_WEEK_SECONDS);
    }

    #[test]
    fn test_rate_must_not_decrease() {
        let token = incentive_token_id();
        let rate = U256::from(1_000u64);
        let market = MarketFixture::new()
            .with_incentive(token.clone(), interval(WAD, rate, NOW - 100, NOW + 1_000))
            .build();
        let end = NOW + 2 * ONE_WEEK_SECONDS;

        // Remaining 1_000_000 spread over two weeks plus a tiny top-up
        assert_eq!(
            error_of(&market, &request(&token, "1", end)),
            ValidationError::RateNotIncreasing {
                token_id: token.to_string()
            }
        );

        // Enough to keep 1000/s over the whole extended interval
        let needed = 1_000u64 * 2 * ONE_WEEK_SECONDS - 1_000_000;
        let extensions = validate(&market, &request(&token, &needed.to_string(), end)).unwrap();
        assert_eq!(extensions[0].new_rate, to_i256(rate).unwrap());
    }

    #[test]
    fn test_fees_reduce_rewards() {
        let token = incentive_token_id();
        let market = MarketFixture::new()
            .with_fees(WAD / U256::from(100u64), WAD / U256::from(50u64))
            .with_incentive(token.clone(), interval(WAD, U256::ZERO, NOW - 100, NOW + 100))
            .build();
        let extensions = validate(&market, &request(&token, "1000000", NOW + ONE_WEEK_SECONDS)).unwrap();

        let fees = extensions[0].fees;
        assert_eq!(fees.frontend_fee, U256::from(10_000u64));
        assert_eq!(fees.protocol_fee, U256::from(20_000u64));
        assert_eq!(fees.rewards_after_fee, U256::from(970_000u64));
    }

    #[test]
    fn test_fees_above_amount_use_generic_message() {
        let token = incentive_token_id();
        let market = MarketFixture::new()
            .with_fees(WAD, WAD)
            .with_incentive(token.clone(), interval(WAD, U256::ZERO, NOW - 100, NOW + 100))
            .build();
        let verdict = is_extend_incentives_valid(
            Some(&market.base),
            Some(&market.enriched),
            &request(&token, "1000", NOW + ONE_WEEK_SECONDS),
            NOW,
        );
        assert!(!verdict.status);
        assert_eq!(verdict.message, "Invalid market action");
    }

    #[test]
    fn test_existing_interval_found_by_token_not_position() {
        let first = token_id(0xcc);
        let second = incentive_token_id();
        let market = MarketFixture::new()
            .with_incentive(first.clone(), interval(WAD, U256::ZERO, NOW - 100, NOW + 5 * ONE_WEEK_SECONDS))
            .with_incentive(second.clone(), interval(WAD, U256::ZERO, NOW - 100, NOW + 100))
            .build();

        // Only `first` has an end beyond two weeks; the request lists `second` alone
        let extensions = validate(&market, &request(&second, "1000", NOW + 2 * ONE_WEEK_SECONDS)).unwrap();
        assert_eq!(extensions[0].existing.end_timestamp, NOW + 100);
    }
}
