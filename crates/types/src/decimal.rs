//! Fixed-point helpers. Every fractional quantity in the engine goes through
//! `rust_decimal`; nothing here touches `f64`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Lift a whole-unit amount into decimal space. `None` once the amount is
/// beyond the 96-bit mantissa `Decimal` can hold.
pub fn to_decimal(amount: u128) -> Option<Decimal> {
    Decimal::from_u128(amount)
}

/// Drop the fractional part. Negative values truncate to zero.
pub fn truncate(value: Decimal) -> u128 {
    if value.is_sign_negative() {
        return 0;
    }
    value.trunc().to_u128().unwrap_or(0)
}

/// `floor(amount * ratio)`, or `None` if the product does not fit.
pub fn mul_floor(amount: u128, ratio: Decimal) -> Option<u128> {
    let product = to_decimal(amount)?.checked_mul(ratio)?;
    if product.is_sign_negative() {
        return Some(0);
    }
    product.floor().to_u128()
}
