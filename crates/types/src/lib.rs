/// Shared types for vault market incentive actions
///
/// This crate provides the market snapshot model, token identifiers,
/// transaction option records and the error types used by the math
/// helpers and the SDK.

pub mod constants;
pub mod errors;
pub mod market;
pub mod query;
pub mod token;
pub mod transaction;

// Re-export all public types
pub use constants::*;
pub use errors::*;
pub use market::*;
pub use query::*;
pub use token::*;
pub use transaction::*;

pub use alloy_primitives::{Address, B256, I256, U256};

/// Result type alias for fixed-point arithmetic
pub type MathResult<T> = std::result::Result<T, MathError>;

/// Result type alias for market action validation
pub type ValidationOutcome<T> = std::result::Result<T, ValidationError>;
