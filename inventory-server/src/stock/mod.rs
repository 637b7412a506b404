//! Stock Ledger Module

mod ledger;

pub use ledger::{BalanceChange, check_policy, net_change, signed_effect};
