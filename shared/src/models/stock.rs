//! Stock Model
//!
//! Stock is an append-style ledger of movements. A component's level is the
//! signed sum of its movements; it is never stored.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::component::ComponentRef;

/// Largest quantity a single movement may carry
pub const MAX_MOVEMENT_QUANTITY: i64 = 1_000_000_000;

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum MovementType {
    In,
    Out,
}

impl MovementType {
    /// +1 for in, -1 for out
    pub const fn sign(&self) -> i64 {
        match self {
            Self::In => 1,
            Self::Out => -1,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            other => Err(format!("invalid movement type '{other}', expected in or out")),
        }
    }
}

/// Stock movement entity (出入库记录)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: i64,
    pub component: ComponentRef,
    pub component_name: String,
    /// Always positive; direction comes from `movement_type`
    pub quantity: i64,
    pub movement_type: MovementType,
    pub supplier_id: Option<i64>,
    pub supplier_name: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create payload, also used as the full replacement on update
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StockMovementInput {
    pub component: ComponentRef,
    #[validate(range(
        min = 1,
        max = 1_000_000_000,
        message = "quantity must be between 1 and 1000000000"
    ))]
    pub quantity: i64,
    pub movement_type: MovementType,
    pub supplier_id: Option<i64>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Current balance of one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    pub component: ComponentRef,
    pub component_name: String,
    /// Σ(in) − Σ(out); negative when more went out than came in
    pub quantity: i64,
    pub last_movement_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_type_parse() {
        assert_eq!("IN".parse::<MovementType>(), Ok(MovementType::In));
        assert_eq!("out".parse::<MovementType>(), Ok(MovementType::Out));
        assert!("sideways".parse::<MovementType>().is_err());
    }

    #[test]
    fn test_movement_sign() {
        assert_eq!(MovementType::In.sign(), 1);
        assert_eq!(MovementType::Out.sign(), -1);
    }

    #[test]
    fn test_input_quantity_must_be_positive() {
        let json = r#"{
            "component": {"category": "storage", "id": 2},
            "quantity": 0,
            "movement_type": "out"
        }"#;
        let input: StockMovementInput = serde_json::from_str(json).unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));
    }

    #[test]
    fn test_input_quantity_upper_bound() {
        let input = |quantity: i64| StockMovementInput {
            component: ComponentRef::new(crate::models::ComponentCategory::Storage, 2),
            quantity,
            movement_type: MovementType::In,
            supplier_id: None,
            date: None,
            notes: None,
        };
        assert!(input(MAX_MOVEMENT_QUANTITY).validate().is_ok());
        assert!(input(MAX_MOVEMENT_QUANTITY + 1).validate().is_err());
        assert!(input(i64::MAX).validate().is_err());
    }

    #[test]
    fn test_input_rejects_unknown_movement_type() {
        let json = r#"{
            "component": {"category": "storage", "id": 2},
            "quantity": 1,
            "movement_type": "transfer"
        }"#;
        assert!(serde_json::from_str::<StockMovementInput>(json).is_err());
    }
}
