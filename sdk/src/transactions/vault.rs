use market_types::{
    Address, ContractArg, ContractId, EnrichedMarket, FunctionName, MarketType, TokenDirectory, TransactionOption,
    TxStatus,
};

use super::{first_per_token, id_address};
use crate::{ContractInfo, IncentiveExtension, IncentiveRefund};

/// Fee recipient for an extension
///
/// Precedence: the caller's recipient, then the configured frontend
/// recipient, then the market's protocol fee recipient.
pub fn resolve_fee_recipient(explicit: Option<Address>, configured: Option<Address>, market_default: Address) -> Address {
    explicit.or(configured).unwrap_or(market_default)
}

/// `extendRewardsInterval` calls for validated extensions
pub fn extend_incentives_options(
    chain_id: u64,
    market: &EnrichedMarket,
    vault: &ContractInfo,
    extensions: &[IncentiveExtension],
    fee_recipient: Address,
    tokens: &TokenDirectory,
) -> Vec<TransactionOption> {
    first_per_token(extensions, |extension| &extension.token_id)
        .into_iter()
        .filter(|extension| market.incentives.contains(&extension.token_id))
        .map(|extension| TransactionOption {
            contract_id: ContractId::WrappedVault,
            chain_id,
            id: format!("extend_reward_{}", id_address(&extension.token_id, &extension.token_address)),
            label: format!("Extend Reward {}", tokens.label_symbol(&extension.token_id)),
            address: market.market_id,
            abi: vault.abi.clone(),
            function_name: FunctionName::ExtendRewardsInterval,
            market_type: MarketType::Vault,
            args: vec![
                ContractArg::from(extension.token_address),
                ContractArg::from(extension.amount),
                ContractArg::from(extension.end_timestamp),
                ContractArg::from(fee_recipient),
            ],
            tx_status: TxStatus::Idle,
            tx_hash: None,
        })
        .collect()
}

/// `refundRewardsInterval` calls for validated refunds
pub fn refund_incentives_options(
    chain_id: u64,
    market: &EnrichedMarket,
    vault: &ContractInfo,
    refunds: &[IncentiveRefund],
    tokens: &TokenDirectory,
) -> Vec<TransactionOption> {
    first_per_token(refunds, |refund| &refund.token_id)
        .into_iter()
        .filter(|refund| market.incentives.contains(&refund.token_id))
        .map(|refund| TransactionOption {
            contract_id: ContractId::WrappedVault,
            chain_id,
            id: format!("refund_reward_{}", id_address(&refund.token_id, &refund.token_address)),
            label: format!("Refund Reward {}", tokens.label_symbol(&refund.token_id)),
            address: market.market_id,
            abi: vault.abi.clone(),
            function_name: FunctionName::RefundRewardsInterval,
            market_type: MarketType::Vault,
            args: vec![ContractArg::from(refund.token_address)],
            tx_status: TxStatus::Idle,
            tx_hash: None,
        })
        .collect()
}
