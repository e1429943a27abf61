//! SDK configuration loaded from TOML

use market_types::{is_valid_address, parse_address, Address, TokenDirectory, TokenId, TokenMetadata};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use validator::Validate;

use crate::{SdkError, SdkResult};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SdkConfig {
    /// Fee recipient used when the caller supplies none
    #[validate(custom = "validate_address")]
    pub frontend_fee_recipient: Option<String>,
    #[validate]
    pub logging: LoggingConfig,
    #[validate]
    pub stats: StatsConfig,
    #[validate]
    pub tokens: Vec<TokenConfig>,
    #[validate]
    pub contracts: Vec<ContractConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    #[validate(custom = "validate_log_level")]
    pub level: String,
    /// Emit JSON log lines
    pub structured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StatsConfig {
    #[validate(range(min = 1, max = 86400))]
    pub stale_time_secs: u64,
}

/// Supported-token directory entry
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenConfig {
    #[validate(custom = "validate_token_id")]
    pub id: String,
    #[validate(length(min = 1, max = 32))]
    pub symbol: String,
    #[validate(range(max = 77))]
    pub decimals: u8,
    #[serde(default)]
    pub name: Option<String>,
}

/// Per-chain contract deployment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContractConfig {
    #[validate(range(min = 1))]
    pub chain_id: u64,
    #[validate(custom = "validate_address")]
    pub wrapped_vault: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            frontend_fee_recipient: None,
            logging: LoggingConfig::default(),
            stats: StatsConfig::default(),
            tokens: Vec::new(),
            contracts: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            structured: false,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { stale_time_secs: 60 }
    }
}

impl SdkConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn frontend_fee_recipient(&self) -> Option<Address> {
        self.frontend_fee_recipient.as_deref().and_then(parse_address)
    }

    pub fn stats_stale_time(&self) -> Duration {
        Duration::from_secs(self.stats.stale_time_secs)
    }

    /// Supported-token directory built from the `[[tokens]]` entries
    pub fn token_directory(&self) -> TokenDirectory {
        TokenDirectory::new(self.tokens.iter().map(|token| TokenMetadata {
            id: TokenId::new(token.id.clone()),
            symbol: token.symbol.clone(),
            decimals: token.decimals,
            name: token.name.clone(),
        }))
    }

    /// WrappedVault deployment for a chain
    pub fn wrapped_vault(&self, chain_id: u64) -> SdkResult<Address> {
        let entry = self
            .contracts
            .iter()
            .find(|contract| contract.chain_id == chain_id)
            .ok_or(SdkError::UnsupportedChain(chain_id))?;
        parse_address(&entry.wrapped_vault)
            .ok_or_else(|| SdkError::Config(format!("invalid wrapped_vault address: {}", entry.wrapped_vault)))
    }
}

fn validate_address(value: &str) -> Result<(), validator::ValidationError> {
    if is_valid_address(value) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_address"))
    }
}

fn validate_token_id(value: &str) -> Result<(), validator::ValidationError> {
    match TokenId::new(value).address_part() {
        Some(address) if is_valid_address(address) => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_token_id")),
    }
}

fn validate_log_level(value: &str) -> Result<(), validator::ValidationError> {
    match value.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_log_level")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
frontend_fee_recipient = "0x2222222222222222222222222222222222222222"

[logging]
level = "debug"
structured = true

[stats]
stale_time_secs = 30

[[tokens]]
id = "1-0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
symbol = "weth"
decimals = 18

[[contracts]]
chain_id = 1
wrapped_vault = "0x3333333333333333333333333333333333333333"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = SdkConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.structured);
        assert_eq!(config.stats_stale_time(), Duration::from_secs(30));
        assert!(config.frontend_fee_recipient().is_some());

        let directory = config.token_directory();
        assert_eq!(
            directory.label_symbol(&TokenId::new("1-0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")),
            "WETH"
        );
        assert!(config.wrapped_vault(1).is_ok());
        assert!(matches!(config.wrapped_vault(10), Err(SdkError::UnsupportedChain(10))));
    }

    #[test]
    fn test_defaults_apply_to_empty_config() {
        let config = SdkConfig::from_toml_str("").unwrap();
        assert!(config.frontend_fee_recipient.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.stats.stale_time_secs, 60);
        assert!(config.tokens.is_empty());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_recipient = "frontend_fee_recipient = \"0x1234\"";
        assert!(matches!(
            SdkConfig::from_toml_str(bad_recipient),
            Err(SdkError::InvalidConfig(_))
        ));

        let bad_level = "[logging]\nlevel = \"loud\"";
        assert!(matches!(
            SdkConfig::from_toml_str(bad_level),
            Err(SdkError::InvalidConfig(_))
        ));

        let bad_token = "[[tokens]]\nid = \"weth\"\nsymbol = \"weth\"\ndecimals = 18";
        assert!(matches!(
            SdkConfig::from_toml_str(bad_token),
            Err(SdkError::InvalidConfig(_))
        ));

        assert!(matches!(
            SdkConfig::from_toml_str("[stats]\nstale_time_secs = \"soon\""),
            Err(SdkError::Toml(_))
        ));
    }
}
