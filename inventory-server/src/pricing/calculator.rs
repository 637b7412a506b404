//! Price Calculator
//!
//! Applies discounts to catalog prices.
//! Uses rust_decimal for precise calculations, stores as f64.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use shared::models::{AppliedDiscount, Discount, DiscountType, PriceQuote};

use super::status::is_active;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation.
///
/// Values past the Decimal range saturate instead of collapsing to zero;
/// NaN becomes zero.
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(if value > 0.0 {
        Decimal::MAX
    } else if value < 0.0 {
        Decimal::MIN
    } else {
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_default()
}

#[inline]
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn discounted(discount_type: DiscountType, value: Decimal, original: Decimal) -> Decimal {
    let current = match discount_type {
        DiscountType::Percentage => original * (Decimal::ONE - value / Decimal::ONE_HUNDRED),
        DiscountType::Fixed => original - value,
    };
    round(current.max(Decimal::ZERO))
}

/// Price after one discount, never below zero
pub fn apply_discount(discount_type: DiscountType, value: f64, original_price: f64) -> f64 {
    to_f64(discounted(
        discount_type,
        to_decimal(value),
        to_decimal(original_price),
    ))
}

/// Quote `original_price` against every candidate discount.
///
/// Candidates outside their date range on `today` are ignored. Among the
/// rest the one saving the most wins, ties going to the lowest id. Discounts
/// never stack.
pub fn quote<'a, I>(original_price: f64, candidates: I, today: NaiveDate) -> PriceQuote
where
    I: IntoIterator<Item = &'a Discount>,
{
    let original = round(to_decimal(original_price));

    let best = candidates
        .into_iter()
        .filter(|d| is_active(d, today))
        .map(|d| {
            let current = discounted(d.discount_type, to_decimal(d.value), original);
            (d, current, original - current)
        })
        .min_by(|(a, _, a_savings), (b, _, b_savings)| {
            b_savings.cmp(a_savings).then(a.id.cmp(&b.id))
        });

    let Some((discount, current, savings)) = best else {
        return PriceQuote::undiscounted(to_f64(original));
    };

    let savings_percentage = if original.is_zero() {
        Decimal::ZERO
    } else {
        savings / original * Decimal::ONE_HUNDRED
    };

    PriceQuote {
        original_price: to_f64(original),
        current_price: to_f64(current),
        savings: to_f64(savings),
        savings_percentage: to_f64(savings_percentage),
        applied_discount: Some(AppliedDiscount::from(discount)),
    }
}
