//! Stock ledger arithmetic
//!
//! A balance is the signed sum of a component's movements. Writes that
//! change a balance are checked against the negative stock policy before
//! they are committed.

use shared::error::{AppError, ErrorCode};
use shared::models::{ComponentRef, MovementType};

use crate::core::NegativeStockPolicy;

/// Effect of one movement on its component's balance
#[inline]
pub fn signed_effect(movement_type: MovementType, quantity: i64) -> i64 {
    movement_type.sign() * quantity
}

/// Pending change to one component's balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    pub component: ComponentRef,
    /// Balance before the write
    pub current: i64,
    /// Net effect of the write
    pub delta: i64,
}

impl BalanceChange {
    /// `None` when the sum leaves the i64 range
    pub fn resulting(&self) -> Option<i64> {
        self.current.checked_add(self.delta)
    }
}

fn quantity_overflow() -> AppError {
    AppError::invalid_field(
        ErrorCode::InvalidQuantity,
        "quantity",
        "quantity is too large for the stock balance",
    )
}

/// Net effect of replacing a movement's effect `old` with `new`
pub fn net_change(old: i64, new: i64) -> Result<i64, AppError> {
    new.checked_sub(old).ok_or_else(quantity_overflow)
}

/// Refuse a change that would leave the balance below zero under `Reject`.
///
/// Changes that do not lower the balance always pass, so a component that
/// is already negative can still be restocked.
pub fn check_policy(policy: NegativeStockPolicy, change: &BalanceChange) -> Result<(), AppError> {
    if policy == NegativeStockPolicy::Allow || change.delta >= 0 {
        return Ok(());
    }
    let resulting = change.resulting().ok_or_else(quantity_overflow)?;
    if resulting >= 0 {
        return Ok(());
    }

    Err(AppError::with_message(
        ErrorCode::InsufficientStock,
        format!(
            "Insufficient stock for {}: {} available, change of {} would leave {}",
            change.component, change.current, change.delta, resulting
        ),
    )
    .with_detail("component", change.component.to_string())
    .with_detail("available", change.current)
    .with_detail("resulting", resulting))
}
