//! Discount Engine Module
//!
//! Prices are computed at read time: every component or server response
//! carries the original catalog price and the price after the best discount
//! active today.

mod calculator;
mod index;
mod status;
mod validate;

pub use calculator::{apply_discount, quote};
pub use index::DiscountIndex;
pub use status::{discount_status, is_active};
pub use validate::{DiscountTerms, validate_terms};
