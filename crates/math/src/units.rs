/// Conversions between raw integer amounts, decimal token amounts and USD

use alloy_primitives::U256;
use market_types::{MathError, MathResult};
use crate::safe::*;

// ============================================================================
// Integer Parsing
// ============================================================================

/// Parse a non-negative decimal integer that fits in 256 bits
///
/// Only ASCII digits are accepted: no sign, no prefix, no separators.
pub fn parse_uint256(value: &str) -> MathResult<U256> {
    if value.is_empty() {
        return Err(MathError::invalid_number(value, "empty string"));
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MathError::invalid_number(value, "expected decimal digits"));
    }
    U256::from_str_radix(value, 10).map_err(|_| MathError::invalid_number(value, "exceeds uint256"))
}

// ============================================================================
// Exact Decimal Conversion
// ============================================================================

/// Render a raw amount as an exact decimal string (`1500000`, 6 -> `1.5`)
///
/// Whole amounts keep one fractional zero (`1.0`).
pub fn format_units(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    if decimals == 0 {
        return format!("{}.0", digits);
    }

    let decimals = decimals as usize;
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse an exact decimal string into a raw amount
pub fn parse_units(amount: &str, decimals: u8) -> MathResult<U256> {
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(MathError::invalid_number(amount, "empty amount"));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(MathError::PrecisionLoss {
            value: amount.to_string(),
            decimals,
        });
    }

    let whole = if whole.is_empty() { U256::ZERO } else { parse_uint256(whole)? };
    let scaled_whole = safe_mul_u256(whole, pow10(decimals)?)?;

    if fraction.is_empty() {
        return Ok(scaled_whole);
    }
    let fraction_value = parse_uint256(fraction)?;
    let scaled_fraction = safe_mul_u256(fraction_value, pow10(decimals - fraction.len() as u8)?)?;
    safe_add_u256(scaled_whole, scaled_fraction)
}

// ============================================================================
// Display Conversion
// ============================================================================

/// Raw integer amount to a decimal token amount
pub fn parse_raw_amount_to_token_amount(raw: U256, decimals: u8) -> f64 {
    format_units(raw, decimals).parse::<f64>().unwrap_or(0.0)
}

/// Decimal token amount to its USD value
pub fn parse_token_amount_to_token_amount_usd(token_amount: f64, price: f64) -> f64 {
    token_amount * price
}

/// Decimal token amount back to a raw integer, truncated
///
/// Uses the shortest decimal rendering of the float and drops fractional
/// digits beyond `decimals`. Negative and non-finite amounts map to zero.
pub fn token_amount_to_raw_amount(token_amount: f64, decimals: u8) -> MathResult<U256> {
    if !token_amount.is_finite() || token_amount <= 0.0 {
        return Ok(U256::ZERO);
    }

    let text = token_amount.to_string();
    let truncated = match text.split_once('.') {
        Some((whole, fraction)) if fraction.len() > decimals as usize => {
            format!("{}.{}", whole, &fraction[..decimals as usize])
        }
        _ => text,
    };
    parse_units(&truncated, decimals)
}
