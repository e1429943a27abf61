use market_types::{
    Address, ContractArg, ContractId, FunctionName, MarketType, TokenDirectory, TokenId, TransactionOption, TxStatus,
    U256,
};

use super::{first_per_token, id_address};
use crate::{ContractInfo, IncentiveExtension};

/// Allowance a vault needs on one incentive token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredApproval {
    pub token_id: TokenId,
    pub token_address: Address,
    pub amount: U256,
}

/// An approval call together with the allowance it grants
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalStep {
    pub requirement: RequiredApproval,
    pub option: TransactionOption,
}

/// Allowances the extend calls will pull, one per token
pub fn required_approvals(extensions: &[IncentiveExtension]) -> Vec<RequiredApproval> {
    first_per_token(extensions, |extension| &extension.token_id)
        .into_iter()
        .map(|extension| RequiredApproval {
            token_id: extension.token_id.clone(),
            token_address: extension.token_address,
            amount: extension.amount,
        })
        .collect()
}

/// ERC-20 `approve(spender, amount)` calls for the required allowances
pub fn approval_steps(
    chain_id: u64,
    spender: Address,
    erc20: &ContractInfo,
    requirements: Vec<RequiredApproval>,
    tokens: &TokenDirectory,
) -> Vec<ApprovalStep> {
    requirements
        .into_iter()
        .map(|requirement| {
            let option = TransactionOption {
                contract_id: ContractId::Erc20,
                chain_id,
                id: format!("approve_{}", id_address(&requirement.token_id, &requirement.token_address)),
                label: format!("Approve {}", tokens.label_symbol(&requirement.token_id)),
                address: requirement.token_address,
                abi: erc20.abi.clone(),
                function_name: FunctionName::Approve,
                market_type: MarketType::Vault,
                args: vec![ContractArg::from(spender), ContractArg::from(requirement.amount)],
                tx_status: TxStatus::Idle,
                tx_hash: None,
            };
            ApprovalStep { requirement, option }
        })
        .collect()
}
