//! Discount Model
//!
//! Discounts are dated price reductions attached to a selection of
//! components and/or servers. Their status is never stored: it is derived
//! from the date range and the current day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::component::ComponentSelection;

/// Discount type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum DiscountType {
    /// value is a percentage in (0, 100]
    Percentage,
    /// value is an amount subtracted from the price
    Fixed,
}

/// Where a discount sits relative to today
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatus {
    Scheduled,
    Active,
    Expired,
}

impl DiscountStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for DiscountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            other => Err(format!(
                "invalid status '{other}', expected scheduled, active or expired"
            )),
        }
    }
}

/// Discount entity (折扣)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Discount {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percentage: 20 = 20%, fixed: 50.00 = 50 off
    pub value: f64,
    /// First day the discount applies (inclusive)
    pub start_date: NaiveDate,
    /// Last day the discount applies (inclusive)
    pub end_date: NaiveDate,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Discount with its associations and derived status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountDetail {
    #[serde(flatten)]
    pub discount: Discount,
    pub status: DiscountStatus,
    pub components: ComponentSelection,
    pub servers: BTreeSet<i64>,
}

/// Create discount payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiscountCreate {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub components: ComponentSelection,
    #[serde(default)]
    pub servers: BTreeSet<i64>,
}

/// Update discount payload
///
/// `components` and `servers`, when present, replace the stored selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DiscountUpdate {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub value: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub components: Option<ComponentSelection>,
    pub servers: Option<BTreeSet<i64>>,
}

/// Discount that produced a price quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub id: i64,
    pub name: String,
    pub discount_type: DiscountType,
    pub value: f64,
    pub end_date: NaiveDate,
}

impl From<&Discount> for AppliedDiscount {
    fn from(d: &Discount) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            discount_type: d.discount_type,
            value: d.value,
            end_date: d.end_date,
        }
    }
}

/// Original vs current price of a component or server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub original_price: f64,
    pub current_price: f64,
    pub savings: f64,
    pub savings_percentage: f64,
    pub applied_discount: Option<AppliedDiscount>,
}

impl PriceQuote {
    /// Quote with no discount applied
    pub fn undiscounted(original_price: f64) -> Self {
        Self {
            original_price,
            current_price: original_price,
            savings: 0.0,
            savings_percentage: 0.0,
            applied_discount: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("active".parse::<DiscountStatus>(), Ok(DiscountStatus::Active));
        assert_eq!(
            "expired".parse::<DiscountStatus>(),
            Ok(DiscountStatus::Expired)
        );
        assert!("ACTIVE".parse::<DiscountStatus>().is_err());
    }

    #[test]
    fn test_create_payload_dates_and_selection() {
        let json = r#"{
            "name": "Spring sale",
            "discount_type": "percentage",
            "value": 15,
            "start_date": "2025-03-01",
            "end_date": "2025-03-31",
            "components": {"ram": [1, 2]},
            "servers": [4]
        }"#;
        let payload: DiscountCreate = serde_json::from_str(json).unwrap();
        assert_eq!(payload.discount_type, DiscountType::Percentage);
        assert_eq!(payload.start_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(payload.components.len(), 2);
        assert!(payload.servers.contains(&4));
    }

    #[test]
    fn test_create_payload_rejects_bad_date() {
        let json = r#"{
            "name": "x",
            "discount_type": "fixed",
            "value": 5,
            "start_date": "01/03/2025",
            "end_date": "2025-03-31"
        }"#;
        assert!(serde_json::from_str::<DiscountCreate>(json).is_err());
    }

    #[test]
    fn test_undiscounted_quote() {
        let quote = PriceQuote::undiscounted(120.0);
        assert_eq!(quote.current_price, 120.0);
        assert_eq!(quote.savings, 0.0);
        assert!(quote.applied_discount.is_none());
    }
}
