//! Contract address and ABI resolution

use market_types::{Address, ContractId};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

use crate::{SdkConfig, SdkError, SdkResult};

const WRAPPED_VAULT_ABI: &str = include_str!("../abi/WrappedVault.json");
const ERC20_ABI: &str = include_str!("../abi/ERC20.json");

/// Deployment address and ABI of a contract on one chain
#[derive(Debug, Clone, PartialEq)]
pub struct ContractInfo {
    pub address: Address,
    pub abi: Arc<Value>,
}

/// Resolves contract addresses and ABIs per chain
pub trait ContractRegistry: Send + Sync {
    /// Contract deployment on `chain_id`; `UnsupportedChain` when the chain is unknown
    fn contract(&self, chain_id: u64, contract_id: ContractId) -> SdkResult<ContractInfo>;

    fn is_supported(&self, chain_id: u64) -> bool;
}

/// Registry backed by embedded ABIs and configured deployments
#[derive(Debug, Clone)]
pub struct StaticContractRegistry {
    wrapped_vaults: HashMap<u64, Address>,
    wrapped_vault_abi: Arc<Value>,
    erc20_abi: Arc<Value>,
}

impl StaticContractRegistry {
    pub fn new(wrapped_vaults: impl IntoIterator<Item = (u64, Address)>) -> SdkResult<Self> {
        Ok(Self {
            wrapped_vaults: wrapped_vaults.into_iter().collect(),
            wrapped_vault_abi: Arc::new(parse_abi("WrappedVault", WRAPPED_VAULT_ABI)?),
            erc20_abi: Arc::new(parse_abi("ERC20", ERC20_ABI)?),
        })
    }

    /// Registry for the `[[contracts]]` entries of a config
    pub fn from_config(config: &SdkConfig) -> SdkResult<Self> {
        let deployments = config
            .contracts
            .iter()
            .map(|contract| Ok((contract.chain_id, config.wrapped_vault(contract.chain_id)?)))
            .collect::<SdkResult<Vec<_>>>()?;
        Self::new(deployments)
    }
}

impl ContractRegistry for StaticContractRegistry {
    fn contract(&self, chain_id: u64, contract_id: ContractId) -> SdkResult<ContractInfo> {
        let vault = self
            .wrapped_vaults
            .get(&chain_id)
            .ok_or(SdkError::UnsupportedChain(chain_id))?;

        Ok(match contract_id {
            ContractId::WrappedVault => ContractInfo {
                address: *vault,
                abi: self.wrapped_vault_abi.clone(),
            },
            // Token contracts are addressed per call
            ContractId::Erc20 => ContractInfo {
                address: Address::ZERO,
                abi: self.erc20_abi.clone(),
            },
        })
    }

    fn is_supported(&self, chain_id: u64) -> bool {
        self.wrapped_vaults.contains_key(&chain_id)
    }
}

fn parse_abi(contract: &'static str, source: &str) -> SdkResult<Value> {
    let abi: Value = serde_json::from_str(source).map_err(|e| SdkError::Abi {
        contract,
        reason: e.to_string(),
    })?;
    if !abi.is_array() {
        return Err(SdkError::Abi {
            contract,
            reason: "expected a JSON array".to_string(),
        });
    }
    Ok(abi)
}

/// Whether an ABI declares a function with the given name
pub fn abi_has_function(abi: &Value, name: &str) -> bool {
    abi.as_array()
        .map(|entries| {
            entries.iter().any(|entry| {
                entry.get("type").and_then(Value::as_str) == Some("function")
                    && entry.get("name").and_then(Value::as_str) == Some(name)
            })
        })
        .unwrap_or(false)
}
