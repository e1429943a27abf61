//! Market action preparation
//!
//! Each action reads the market, validates the request, prices the
//! incentives, builds the contract calls and gates them on allowances. The
//! result is a fresh `PreparedMarketAction` per call; nothing is cached here.

mod extend;
mod refund;

pub use extend::*;
pub use refund::*;

use async_trait::async_trait;
use market_types::{
    Address, ContractArg, CustomTokenDataElement, EnrichedMarket, QueryState, TokenDirectory, TokenId,
    TransactionPlan, ValidationResult,
};
use serde::Serialize;
use std::{collections::HashSet, sync::Arc};

use crate::{
    AllowanceReader, Clock, ContractRegistry, IncentiveData, IncentiveTokenData, InputTokenData, MarketStateReader,
    SdkConfig, SystemClock, TokenQuoteResolver, TokenQuotes,
};

// ============================================================================
// Context
// ============================================================================

/// External capabilities shared by all market actions
pub struct MarketActionContext {
    pub market_reader: Arc<dyn MarketStateReader>,
    pub quote_resolver: Arc<dyn TokenQuoteResolver>,
    pub allowance_reader: Arc<dyn AllowanceReader>,
    pub contracts: Arc<dyn ContractRegistry>,
    pub clock: Arc<dyn Clock>,
    /// Supported-token directory used for labels and quote fallbacks
    pub tokens: TokenDirectory,
    /// Configured frontend fee recipient
    pub frontend_fee_recipient: Option<Address>,
}

impl MarketActionContext {
    pub fn new(
        market_reader: Arc<dyn MarketStateReader>,
        quote_resolver: Arc<dyn TokenQuoteResolver>,
        allowance_reader: Arc<dyn AllowanceReader>,
        contracts: Arc<dyn ContractRegistry>,
    ) -> Self {
        Self {
            market_reader,
            quote_resolver,
            allowance_reader,
            contracts,
            clock: Arc::new(SystemClock),
            tokens: TokenDirectory::default(),
            frontend_fee_recipient: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_tokens(mut self, tokens: TokenDirectory) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_frontend_fee_recipient(mut self, recipient: Option<Address>) -> Self {
        self.frontend_fee_recipient = recipient;
        self
    }

    /// Apply the token directory and fee recipient of a config
    pub fn with_config(self, config: &SdkConfig) -> Self {
        self.with_tokens(config.token_directory())
            .with_frontend_fee_recipient(config.frontend_fee_recipient())
    }
}

// ============================================================================
// Prepared Action
// ============================================================================

/// Everything the presentation layer needs to show and submit an action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedMarketAction {
    pub is_valid: ValidationResult,
    /// Any upstream read still in flight
    pub is_loading: bool,
    /// The plan holds at least one call
    pub is_ready: bool,
    pub incentive_data: Vec<IncentiveTokenData>,
    pub input_token_data: InputTokenData,
    pub write_contract_options: TransactionPlan,
    pub can_be_performed_completely: bool,
    pub can_be_performed_partially: bool,
}

impl PreparedMarketAction {
    pub(crate) fn assemble(
        is_valid: ValidationResult,
        is_loading: bool,
        incentive_data: IncentiveData,
        write_contract_options: TransactionPlan,
        requested: Option<&[TokenId]>,
    ) -> Self {
        let is_ready = !write_contract_options.is_empty();
        let (complete, partial) = performability(requested.unwrap_or_default(), &write_contract_options);

        Self {
            is_valid,
            is_loading,
            is_ready,
            incentive_data: incentive_data.incentive_data,
            input_token_data: incentive_data.input_token_data,
            write_contract_options,
            can_be_performed_completely: is_ready && complete,
            can_be_performed_partially: is_ready && partial,
        }
    }
}

/// A market action that can be prepared from request parameters
#[async_trait]
pub trait MarketAction: Send + Sync {
    type Params: Send + Sync;

    async fn prepare(&self, params: &Self::Params) -> PreparedMarketAction;
}

// ============================================================================
// Shared Steps
// ============================================================================

/// Input token followed by the requested tokens, without repeats
pub(crate) fn quote_token_ids(enriched_market: Option<&EnrichedMarket>, token_ids: &[TokenId]) -> Vec<TokenId> {
    let mut seen = HashSet::new();
    enriched_market
        .map(|market| market.input_token_id.clone())
        .into_iter()
        .chain(token_ids.iter().cloned())
        .filter(|token_id| seen.insert(token_id.clone()))
        .collect()
}

/// Quotes are only requested for valid, enabled actions
pub(crate) async fn read_quotes(
    context: &MarketActionContext,
    enabled: bool,
    token_ids: Vec<TokenId>,
    custom_token_data: &[CustomTokenDataElement],
) -> QueryState<TokenQuotes> {
    if !enabled {
        return QueryState::idle();
    }
    context.quote_resolver.resolve_quotes(&token_ids, custom_token_data).await
}

/// Whether every / at least one distinct requested token has an action call
fn performability(requested: &[TokenId], plan: &TransactionPlan) -> (bool, bool) {
    let distinct: HashSet<&TokenId> = requested.iter().collect();
    let covered = distinct
        .iter()
        .filter(|token_id| {
            let address = token_id.address();
            plan.actions().any(|option| {
                option.args.first() == address.map(ContractArg::Address).as_ref()
            })
        })
        .count();

    (!distinct.is_empty() && covered == distinct.len(), covered > 0)
}
