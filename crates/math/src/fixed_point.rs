/// Fee and reward-rate arithmetic on 18-decimal fixed-point values

use alloy_primitives::{I256, U256};
use market_types::{MathError, MathResult, WAD};
use crate::safe::*;

// ============================================================================
// Fee Computation
// ============================================================================

/// Multiply by a fraction expressed over 10^18, truncating
pub fn mul_wad(amount: U256, fraction: U256) -> MathResult<U256> {
    safe_div_u256(safe_mul_u256(amount, fraction)?, WAD)
}

/// Split of an incentive amount into market fees and net rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub frontend_fee: U256,
    pub protocol_fee: U256,
    pub rewards_after_fee: U256,
}

/// Deduct the frontend and protocol fees from an incentive amount
///
/// Fails when `amount * fee_rate` does not fit in 256 bits.
pub fn apply_market_fees(
    amount: U256,
    frontend_fee_rate: U256,
    protocol_fee_rate: U256,
) -> MathResult<FeeBreakdown> {
    let frontend_fee = mul_wad(amount, frontend_fee_rate)?;
    let protocol_fee = mul_wad(amount, protocol_fee_rate)?;
    let rewards_after_fee = safe_sub_u256(safe_sub_u256(amount, frontend_fee)?, protocol_fee)?;

    Ok(FeeBreakdown {
        frontend_fee,
        protocol_fee,
        rewards_after_fee,
    })
}

// ============================================================================
// Reward Rate
// ============================================================================

/// Result of folding new rewards into an existing interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateExtension {
    /// existing_rate * (existing_end - new_start); negative once the interval ended
    pub remaining_rewards: I256,
    /// (rewards_after_fee + remaining_rewards) / (new_end - new_start)
    pub new_rate: I256,
}

/// Rate of an interval extended from `new_start` to `new_end`
///
/// Division truncates toward zero. `new_end` must be after `new_start`.
/// All terms are signed 256-bit values, so `rewards_after_fee` must be below
/// 2^255 and the remaining rewards must not overflow `I256`.
pub fn extended_rate(
    rewards_after_fee: U256,
    existing_rate: U256,
    existing_end: u64,
    new_start: u64,
    new_end: u64,
) -> MathResult<RateExtension> {
    if new_end <= new_start {
        return Err(MathError::DivisionByZero {
            context: format!("interval duration: end {} <= start {}", new_end, new_start),
        });
    }

    let elapsed_remaining = safe_sub_i256(
        timestamp_to_i256(existing_end)?,
        timestamp_to_i256(new_start)?,
    )?;
    let remaining_rewards = safe_mul_i256(to_i256(existing_rate)?, elapsed_remaining)?;

    let numerator = safe_add_i256(to_i256(rewards_after_fee)?, remaining_rewards)?;
    let duration = timestamp_to_i256(new_end - new_start)?;
    let new_rate = safe_div_i256(numerator, duration)?;

    Ok(RateExtension {
        remaining_rewards,
        new_rate,
    })
}
