//! Allowance-aware ordering of approval and action calls

use market_types::{TransactionOption, TransactionPlan, U256};
use tracing::debug;

use crate::{ApprovalStep, TokenAllowances};

/// Whether the current allowance falls short of the required amount
///
/// A token missing from the allowance answer counts as a zero allowance.
pub fn needs_approval(required: U256, allowance: Option<&U256>) -> bool {
    allowance.copied().unwrap_or(U256::ZERO) < required
}

/// Keep the approvals that are still needed and place them before the actions
pub fn refine_transaction_options(
    pre_contract_options: Vec<ApprovalStep>,
    post_contract_options: Vec<TransactionOption>,
    allowances: &TokenAllowances,
) -> TransactionPlan {
    let approvals: Vec<TransactionOption> = pre_contract_options
        .into_iter()
        .filter(|step| {
            let allowance = allowances.get(&step.requirement.token_address);
            let needed = needs_approval(step.requirement.amount, allowance);
            if !needed {
                debug!(
                    token = %step.requirement.token_address,
                    required = %step.requirement.amount,
                    "Allowance sufficient, skipping approval"
                );
            }
            needed
        })
        .map(|step| step.option)
        .collect();

    TransactionPlan::new(approvals, post_contract_options)
}
