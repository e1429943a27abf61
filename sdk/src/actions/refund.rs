use async_trait::async_trait;
use market_types::{Address, ContractId, CustomTokenData, TokenId, TransactionPlan, ValidationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{quote_token_ids, read_quotes, MarketAction, MarketActionContext, PreparedMarketAction};
use crate::{
    calculate_refund_incentive_data, refund_incentives_options, validate_refund_incentives, IncentiveRefund,
    MarketRead, RefundIncentivesRequest, SdkResult,
};

/// Parameters of a refund-incentives action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundIncentivesParams {
    #[serde(default)]
    pub account: Option<Address>,
    pub chain_id: u64,
    pub market_id: Address,
    #[serde(default)]
    pub token_ids: Option<Vec<TokenId>>,
    #[serde(default)]
    pub custom_token_data: CustomTokenData,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl RefundIncentivesParams {
    pub fn request(&self) -> RefundIncentivesRequest {
        RefundIncentivesRequest {
            token_ids: self.token_ids.clone(),
        }
    }
}

/// Refunds incentive intervals that have not started yet
///
/// Refunds move tokens out of the vault, so no approvals are needed.
pub struct RefundIncentivesAction {
    context: Arc<MarketActionContext>,
}

impl RefundIncentivesAction {
    pub fn new(context: Arc<MarketActionContext>) -> Self {
        Self { context }
    }

    fn build_calls(
        &self,
        chain_id: u64,
        market: &MarketRead,
        refunds: &[IncentiveRefund],
    ) -> SdkResult<TransactionPlan> {
        let Some(enriched) = &market.enriched_market else {
            return Ok(TransactionPlan::empty());
        };
        let vault = self.context.contracts.contract(chain_id, ContractId::WrappedVault)?;
        let actions = refund_incentives_options(chain_id, enriched, &vault, refunds, &self.context.tokens);
        Ok(TransactionPlan::new(Vec::new(), actions))
    }
}

#[async_trait]
impl MarketAction for RefundIncentivesAction {
    type Params = RefundIncentivesParams;

    async fn prepare(&self, params: &RefundIncentivesParams) -> PreparedMarketAction {
        let ctx = &self.context;
        let now = ctx.clock.now();

        let market = if params.enabled {
            ctx.market_reader.read_market(params.chain_id, params.market_id).await
        } else {
            MarketRead::idle()
        };

        let outcome = validate_refund_incentives(
            market.base_market.as_ref(),
            market.enriched_market.as_ref(),
            &params.request(),
            now,
        );
        let is_valid = ValidationResult::from(&outcome);
        debug!(
            market_id = %params.market_id,
            chain_id = params.chain_id,
            valid = is_valid.status,
            message = %is_valid.message,
            "Validated refund incentives"
        );

        let plan = match &outcome {
            Ok(refunds) => self
                .build_calls(params.chain_id, &market, refunds)
                .unwrap_or_else(|e| {
                    warn!(chain_id = params.chain_id, "Cannot build refund incentives calls: {}", e);
                    TransactionPlan::empty()
                }),
            Err(_) => TransactionPlan::empty(),
        };

        let token_ids = params.token_ids.as_deref().unwrap_or_default();
        let quotes = read_quotes(
            ctx,
            is_valid.status && params.enabled,
            quote_token_ids(market.enriched_market.as_ref(), token_ids),
            &params.custom_token_data,
        )
        .await;

        let incentive_data =
            calculate_refund_incentive_data(market.enriched_market.as_ref(), quotes.resolved(), &ctx.tokens, token_ids);

        PreparedMarketAction::assemble(
            is_valid,
            market.is_loading || quotes.is_loading,
            incentive_data,
            plan,
            params.token_ids.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use market_types::{ContractArg, FunctionName, MarketSnapshot, U256, WAD};

    fn params(token_ids: Vec<TokenId>) -> RefundIncentivesParams {
        RefundIncentivesParams {
            account: Some(account_address()),
            chain_id: CHAIN_ID,
            market_id: vault_address(),
            token_ids: Some(token_ids),
            custom_token_data: Vec::new(),
            enabled: true,
        }
    }

    fn pending_market() -> MarketSnapshot {
        MarketFixture::new()
            .with_incentive(incentive_token_id(), interval(WAD, U256::from(3u64), NOW + 60, NOW + 600))
            .build()
    }

    #[tokio::test]
    async fn test_refund_before_start() {
        let harness = TestHarness::new(pending_market(), []).unwrap();
        let action = RefundIncentivesAction::new(harness.context.clone());
        let prepared = action.prepare(&params(vec![incentive_token_id()])).await;

        assert!(prepared.is_valid.status);
        assert!(prepared.is_ready);
        assert!(prepared.can_be_performed_completely);

        let options = prepared.write_contract_options.options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].function_name, FunctionName::RefundRewardsInterval);
        assert_eq!(options[0].args, vec![ContractArg::Address(incentive_token_address())]);
        assert_eq!(prepared.write_contract_options.approvals().count(), 0);

        // Refund amounts come from the existing interval
        assert_eq!(prepared.incentive_data[0].raw_amount, WAD.to_string());
        // Refunds never read allowances
        assert_eq!(harness.allowances.reads(), 0);
    }

    #[tokio::test]
    async fn test_refund_after_start_is_rejected() {
        let harness = TestHarness::new(pending_market(), []).unwrap();
        harness.clock.set(NOW + 60);
        let action = RefundIncentivesAction::new(harness.context.clone());
        let prepared = action.prepare(&params(vec![incentive_token_id()])).await;

        assert!(!prepared.is_valid.status);
        assert_eq!(
            prepared.is_valid.message,
            "Interval is already in progress. Incentives cannot be refunded."
        );
        assert!(!prepared.is_ready);
        // Incentive data is still shown for an invalid request
        assert_eq!(prepared.incentive_data.len(), 1);
    }

    #[tokio::test]
    async fn test_loading_market_is_reported() {
        let harness = TestHarness::builder(pending_market()).market_loading().build().unwrap();
        let action = RefundIncentivesAction::new(harness.context.clone());
        let prepared = action.prepare(&params(vec![incentive_token_id()])).await;

        assert!(prepared.is_loading);
        assert!(!prepared.is_ready);
        assert_eq!(prepared.is_valid.message, "Market is missing");
    }

    #[tokio::test]
    async fn test_loading_quotes_are_reported() {
        let harness = TestHarness::builder(pending_market()).quotes_loading().build().unwrap();
        let action = RefundIncentivesAction::new(harness.context.clone());
        let prepared = action.prepare(&params(vec![incentive_token_id()])).await;

        assert!(prepared.is_valid.status);
        assert!(prepared.is_loading);
        assert!(prepared.is_ready);
    }

    #[tokio::test]
    async fn test_prepared_action_serializes_camel_case() {
        let harness = TestHarness::new(pending_market(), []).unwrap();
        let action = RefundIncentivesAction::new(harness.context.clone());
        let prepared = action.prepare(&params(vec![incentive_token_id()])).await;

        let json = serde_json::to_value(&prepared).unwrap();
        assert_eq!(json["isValid"]["status"], true);
        assert_eq!(json["isReady"], true);
        assert_eq!(json["writeContractOptions"][0]["functionName"], "refundRewardsInterval");
        assert_eq!(json["canBePerformedPartially"], true);
    }
}
