//! SDK error types

use market_types::{MarketDataError, MathError};
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// No contract deployment is registered for the chain
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(u64),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration failed field validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    /// Market data source returned malformed data
    #[error("Invalid market data: {0}")]
    MarketData(#[from] MarketDataError),

    /// Amount conversion failed
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Embedded contract ABI could not be parsed
    #[error("Invalid contract ABI for {contract}: {reason}")]
    Abi { contract: &'static str, reason: String },

    /// Statistics query failed
    #[error("Stats query failed: {0}")]
    Stats(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
