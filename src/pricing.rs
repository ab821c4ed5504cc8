//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while converting decimal amounts.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount does not fit in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    Overflow(Decimal),
}

/// Convert a major-unit amount (e.g. `79.99`) into minor units (e.g. `7999`).
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PricingError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or(PricingError::Overflow(amount))
}

/// Express a major-unit amount as money in the given currency.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount does not fit in minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    Ok(Money::from_minor(to_minor_units(amount)?, currency))
}

/// Whole-number markdown percentage of `price` against `original_price`.
///
/// Rounds half away from zero; a price at or above the original gives 0.
pub fn discount_percent(price: Decimal, original_price: Decimal) -> u32 {
    if original_price <= Decimal::ZERO || price >= original_price {
        return 0;
    }

    ((original_price - price) / original_price * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}
