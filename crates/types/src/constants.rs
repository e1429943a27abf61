/// Protocol constants used across the incentive action pipeline

use alloy_primitives::{Address, U256};

// ============================================================================
// Fixed-Point Constants
// ============================================================================

/// Decimals of the fee fraction fixed-point representation
pub const WAD_DECIMALS: u8 = 18;

/// Fixed-point denominator: 10^18
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Largest decimals value whose power of ten still fits in a U256
pub const MAX_TOKEN_DECIMALS: u8 = 77;

// ============================================================================
// Incentive Interval Constants
// ============================================================================

/// Minimum length of a reward interval in seconds (one week)
pub const ONE_WEEK_SECONDS: u64 = 60 * 60 * 24 * 7;

/// Placeholder for the per-input-token incentive value
pub const PER_INPUT_TOKEN_PLACEHOLDER: f64 = 0.0;

/// Sentinel meaning "annual change ratio not available"
pub const ANNUAL_CHANGE_RATIO_UNAVAILABLE: f64 = 1e18;

// ============================================================================
// Address Constants
// ============================================================================

/// Zero address, used as the allowance owner when no account is connected
pub const NULL_ADDRESS: Address = Address::ZERO;

// ============================================================================
// Contract Function Names
// ============================================================================

pub const EXTEND_REWARDS_INTERVAL: &str = "extendRewardsInterval";
pub const REFUND_REWARDS_INTERVAL: &str = "refundRewardsInterval";
pub const APPROVE: &str = "approve";

/// Symbol used in labels when a token is missing from the directory
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";
