/// Contract-call descriptors handed to the transaction execution layer

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

use crate::{constants::*, market::MarketType};

// ============================================================================
// Contract Call Parts
// ============================================================================

/// Contract family a transaction option targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractId {
    WrappedVault,
    Erc20,
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractId::WrappedVault => write!(f, "WrappedVault"),
            ContractId::Erc20 => write!(f, "Erc20"),
        }
    }
}

/// Contract function invoked by a transaction option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionName {
    ExtendRewardsInterval,
    RefundRewardsInterval,
    Approve,
}

impl FunctionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::ExtendRewardsInterval => EXTEND_REWARDS_INTERVAL,
            FunctionName::RefundRewardsInterval => REFUND_REWARDS_INTERVAL,
            FunctionName::Approve => APPROVE,
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed contract call argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContractArg {
    Address(Address),
    Uint(U256),
}

impl From<Address> for ContractArg {
    fn from(value: Address) -> Self {
        ContractArg::Address(value)
    }
}

impl From<U256> for ContractArg {
    fn from(value: U256) -> Self {
        ContractArg::Uint(value)
    }
}

impl From<u64> for ContractArg {
    fn from(value: u64) -> Self {
        ContractArg::Uint(U256::from(value))
    }
}

// ============================================================================
// Transaction Status
// ============================================================================

/// Lifecycle of a submitted option, advanced by the execution layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

impl TxStatus {
    /// Whether `next` is a legal successor of this status
    pub fn can_transition_to(self, next: TxStatus) -> bool {
        matches!(
            (self, next),
            (TxStatus::Idle, TxStatus::Pending)
                | (TxStatus::Pending, TxStatus::Success)
                | (TxStatus::Pending, TxStatus::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TxStatus::Success | TxStatus::Failed)
    }
}

// ============================================================================
// Transaction Option
// ============================================================================

/// One contract call the execution layer can submit and track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOption {
    pub contract_id: ContractId,
    pub chain_id: u64,
    /// Deterministic key, stable across recomputations
    pub id: String,
    pub label: String,
    pub address: Address,
    pub abi: Arc<serde_json::Value>,
    pub function_name: FunctionName,
    pub market_type: MarketType,
    pub args: Vec<ContractArg>,
    pub tx_status: TxStatus,
    pub tx_hash: Option<B256>,
}

impl TransactionOption {
    pub fn is_approval(&self) -> bool {
        self.function_name == FunctionName::Approve
    }

    /// Advance the status; returns false and leaves the option untouched on an illegal move
    pub fn advance(&mut self, next: TxStatus, tx_hash: Option<B256>) -> bool {
        if !self.tx_status.can_transition_to(next) {
            return false;
        }
        self.tx_status = next;
        if tx_hash.is_some() {
            self.tx_hash = tx_hash;
        }
        true
    }
}

// ============================================================================
// Transaction Plan
// ============================================================================

/// Ordered transaction options: approvals first, then the action calls
///
/// Every approval must confirm before any action is submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionPlan {
    options: Vec<TransactionOption>,
}

impl TransactionPlan {
    pub fn new(approvals: Vec<TransactionOption>, actions: Vec<TransactionOption>) -> Self {
        let mut options = approvals;
        options.extend(actions);
        Self { options }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Phase one: approval steps
    pub fn approvals(&self) -> impl Iterator<Item = &TransactionOption> {
        self.options.iter().filter(|option| option.is_approval())
    }

    /// Phase two: the action calls
    pub fn actions(&self) -> impl Iterator<Item = &TransactionOption> {
        self.options.iter().filter(|option| !option.is_approval())
    }

    pub fn options(&self) -> &[TransactionOption] {
        &self.options
    }

    pub fn into_options(self) -> Vec<TransactionOption> {
        self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
