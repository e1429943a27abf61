use async_trait::async_trait;
use market_types::{
    Address, ContractId, CustomTokenData, QueryState, TokenId, TransactionOption, TransactionPlan, ValidationResult,
    NULL_ADDRESS,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{quote_token_ids, read_quotes, MarketAction, MarketActionContext, PreparedMarketAction};
use crate::{
    approval_steps, calculate_extend_incentive_data, extend_incentives_options, refine_transaction_options,
    required_approvals, resolve_fee_recipient, validate_extend_incentives, ApprovalStep, ExtendIncentivesRequest,
    IncentiveExtension, MarketRead, SdkResult, TokenAllowances,
};

/// Parameters of an extend-incentives action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendIncentivesParams {
    /// Connected account; allowances are read for the zero address without one
    #[serde(default)]
    pub account: Option<Address>,
    pub chain_id: u64,
    pub market_id: Address,
    #[serde(default)]
    pub token_ids: Option<Vec<TokenId>>,
    #[serde(default)]
    pub token_amounts: Option<Vec<String>>,
    #[serde(default)]
    pub end_timestamps: Option<Vec<String>>,
    #[serde(default)]
    pub custom_token_data: CustomTokenData,
    #[serde(default)]
    pub frontend_fee_recipient: Option<Address>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl ExtendIncentivesParams {
    pub fn request(&self) -> ExtendIncentivesRequest {
        ExtendIncentivesRequest {
            token_ids: self.token_ids.clone(),
            token_amounts: self.token_amounts.clone(),
            end_timestamps: self.end_timestamps.clone(),
        }
    }
}

/// Extends running incentive intervals of a vault market
pub struct ExtendIncentivesAction {
    context: Arc<MarketActionContext>,
}

impl ExtendIncentivesAction {
    pub fn new(context: Arc<MarketActionContext>) -> Self {
        Self { context }
    }

    /// Vault calls and approval steps for validated extensions
    fn build_calls(
        &self,
        params: &ExtendIncentivesParams,
        market: &MarketRead,
        extensions: &[IncentiveExtension],
    ) -> SdkResult<(Vec<ApprovalStep>, Vec<TransactionOption>)> {
        let (Some(base), Some(enriched)) = (&market.base_market, &market.enriched_market) else {
            return Ok((Vec::new(), Vec::new()));
        };
        let ctx = &self.context;
        let vault = ctx.contracts.contract(params.chain_id, ContractId::WrappedVault)?;
        let erc20 = ctx.contracts.contract(params.chain_id, ContractId::Erc20)?;

        let fee_recipient = resolve_fee_recipient(
            params.frontend_fee_recipient,
            ctx.frontend_fee_recipient,
            base.protocol_fee_recipient,
        );
        let actions =
            extend_incentives_options(params.chain_id, enriched, &vault, extensions, fee_recipient, &ctx.tokens);
        let approvals = approval_steps(
            params.chain_id,
            params.market_id,
            &erc20,
            required_approvals(extensions),
            &ctx.tokens,
        );
        Ok((approvals, actions))
    }
}

#[async_trait]
impl MarketAction for ExtendIncentivesAction {
    type Params = ExtendIncentivesParams;

    async fn prepare(&self, params: &ExtendIncentivesParams) -> PreparedMarketAction {
        let ctx = &self.context;
        let now = ctx.clock.now();

        let market = if params.enabled {
            ctx.market_reader.read_market(params.chain_id, params.market_id).await
        } else {
            MarketRead::idle()
        };

        let outcome = validate_extend_incentives(
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
            "Validated extend incentives"
        );

        let (approvals, actions) = match &outcome {
            Ok(extensions) => match self.build_calls(params, &market, extensions) {
                Ok(calls) => calls,
                Err(e) => {
                    warn!(chain_id = params.chain_id, "Cannot build extend incentives calls: {}", e);
                    (Vec::new(), Vec::new())
                }
            },
            Err(_) => (Vec::new(), Vec::new()),
        };

        let token_ids = params.token_ids.as_deref().unwrap_or_default();
        let quote_ids = quote_token_ids(market.enriched_market.as_ref(), token_ids);
        let approval_tokens: Vec<Address> = approvals.iter().map(|step| step.requirement.token_address).collect();
        let owner = params.account.unwrap_or(NULL_ADDRESS);

        let (quotes, allowances) = tokio::join!(
            read_quotes(ctx, is_valid.status && params.enabled, quote_ids, &params.custom_token_data),
            async {
                if approval_tokens.is_empty() {
                    QueryState::ready(TokenAllowances::new())
                } else {
                    ctx.allowance_reader
                        .read_allowances(params.chain_id, owner, params.market_id, &approval_tokens)
                        .await
                }
            }
        );

        let incentive_data = calculate_extend_incentive_data(
            market.enriched_market.as_ref(),
            quotes.resolved(),
            &ctx.tokens,
            token_ids,
            params.token_amounts.as_deref().unwrap_or_default(),
        );

        // No plan until allowances resolve; a plan without them could omit approvals
        let plan = match allowances.resolved() {
            Some(allowances) => refine_transaction_options(approvals, actions, allowances),
            None => TransactionPlan::empty(),
        };
        debug!(
            market_id = %params.market_id,
            approvals = plan.approvals().count(),
            actions = plan.actions().count(),
            "Prepared extend incentives plan"
        );

        PreparedMarketAction::assemble(
            is_valid,
            market.is_loading || quotes.is_loading || allowances.is_loading,
            incentive_data,
            plan,
            params.token_ids.as_deref(),
        )
    }
}
