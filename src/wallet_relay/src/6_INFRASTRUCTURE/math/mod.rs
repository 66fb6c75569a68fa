//! Pure amount conversions - no I/O, no async
//! Major units (what a human types, `1.5` ICP) <-> minor units (`150_000_000` e8s)

use candid::Nat;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use crate::infrastructure::errors::{Result, CallerError, ValidationError};

/// Largest scale `rust_decimal` can represent
const MAX_DECIMALS: u32 = 28;

/// Convert a decimal major-unit amount into ledger minor units
///
/// Rejects negative amounts and amounts that carry more fractional digits
/// than the token supports (no silent truncation).
pub fn to_minor_units(amount: Decimal, decimals: u32) -> Result<Nat> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid(amount, "amount cannot be negative"));
    }
    if decimals > MAX_DECIMALS {
        return Err(invalid(amount, &format!("token decimals {} exceed {}", decimals, MAX_DECIMALS)));
    }

    let factor = Decimal::from_i128_with_scale(10i128.pow(decimals), 0);
    let scaled = amount
        .checked_mul(factor)
        .ok_or_else(|| invalid(amount, "amount overflows"))?;

    if !scaled.fract().is_zero() {
        return Err(invalid(
            amount,
            &format!("more than {} fractional digits would be truncated", decimals),
        ));
    }

    let minor = scaled
        .trunc()
        .to_u128()
        .ok_or_else(|| invalid(amount, "amount does not fit in u128"))?;

    Ok(Nat::from(minor))
}

/// Convert ledger minor units back into a major-unit decimal
pub fn from_minor_units(minor: u64, decimals: u32) -> Decimal {
    let decimals = decimals.min(MAX_DECIMALS);
    Decimal::from_i128_with_scale(minor as i128, decimals)
}

fn invalid(amount: Decimal, reason: &str) -> CallerError {
    CallerError::Validation(ValidationError::InvalidAmount {
        amount: amount.to_string(),
        reason: reason.to_string(),
    })
}
