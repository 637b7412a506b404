//! Data models
//!
//! Shared between inventory-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

/// Largest catalog price or fixed discount accepted, in currency units.
/// Keeps every amount inside the range of the decimal price arithmetic.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

pub mod brand;
pub mod component;
pub mod component_specs;
pub mod discount;
pub mod server;
pub mod stock;
pub mod supplier;

// Re-exports
pub use brand::*;
pub use component::*;
pub use component_specs::*;
pub use discount::*;
pub use server::*;
pub use stock::*;
pub use supplier::*;
