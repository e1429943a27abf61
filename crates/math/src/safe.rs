/// Checked 256-bit arithmetic
///
/// Thin wrappers over the checked operations of `U256`/`I256` that report
/// the operation and operands on failure.

use alloy_primitives::{I256, U256};
use market_types::{MathError, MathResult, MAX_TOKEN_DECIMALS};

// ============================================================================
// Unsigned Arithmetic
// ============================================================================

/// Safe addition for U256 values
pub fn safe_add_u256(a: U256, b: U256) -> MathResult<U256> {
    a.checked_add(b)
        .ok_or_else(|| MathError::overflow("U256 addition", &[&a, &b]))
}

/// Safe subtraction for U256 values
pub fn safe_sub_u256(a: U256, b: U256) -> MathResult<U256> {
    a.checked_sub(b)
        .ok_or_else(|| MathError::underflow("U256 subtraction", &[&a, &b]))
}

/// Safe multiplication for U256 values
pub fn safe_mul_u256(a: U256, b: U256) -> MathResult<U256> {
    a.checked_mul(b)
        .ok_or_else(|| MathError::overflow("U256 multiplication", &[&a, &b]))
}

/// Safe truncating division for U256 values
pub fn safe_div_u256(a: U256, b: U256) -> MathResult<U256> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero {
            context: format!("U256 division: {} / {}", a, b),
        });
    }
    Ok(a / b)
}

// ============================================================================
// Signed Arithmetic
// ============================================================================

/// Convert an unsigned value into a signed one
pub fn to_i256(value: U256) -> MathResult<I256> {
    I256::try_from(value).map_err(|_| MathError::overflow("U256 to I256 conversion", &[&value]))
}

/// Convert a timestamp into a signed value
pub fn timestamp_to_i256(value: u64) -> MathResult<I256> {
    to_i256(U256::from(value))
}

/// Safe addition for I256 values
pub fn safe_add_i256(a: I256, b: I256) -> MathResult<I256> {
    a.checked_add(b)
        .ok_or_else(|| MathError::overflow("I256 addition", &[&a, &b]))
}

/// Safe subtraction for I256 values
pub fn safe_sub_i256(a: I256, b: I256) -> MathResult<I256> {
    a.checked_sub(b)
        .ok_or_else(|| MathError::underflow("I256 subtraction", &[&a, &b]))
}

/// Safe multiplication for I256 values
pub fn safe_mul_i256(a: I256, b: I256) -> MathResult<I256> {
    a.checked_mul(b)
        .ok_or_else(|| MathError::overflow("I256 multiplication", &[&a, &b]))
}

/// Safe division for I256 values, truncating toward zero
pub fn safe_div_i256(a: I256, b: I256) -> MathResult<I256> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero {
            context: format!("I256 division: {} / {}", a, b),
        });
    }
    a.checked_div(b)
        .ok_or_else(|| MathError::overflow("I256 division", &[&a, &b]))
}

// ============================================================================
// Powers of Ten
// ============================================================================

/// 10^decimals as a U256
pub fn pow10(decimals: u8) -> MathResult<U256> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(MathError::overflow("power of ten", &[&decimals]));
    }
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or_else(|| MathError::overflow("power of ten", &[&decimals]))
}
