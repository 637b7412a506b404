//! Server Model
//!
//! A server is sold at its own catalog price and lists the components it is
//! built from (any category, each with a quantity).

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::component::{ComponentCategory, ComponentRef};
use super::discount::PriceQuote;

/// Server entity (服务器整机)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Server {
    pub id: i64,
    pub name: String,
    pub brand_id: i64,
    pub model: Option<String>,
    pub price: f64,
    pub image: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One line of a server's bill of materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ServerComponent {
    pub category: ComponentCategory,
    pub id: i64,
    pub name: String,
    pub quantity: i64,
}

impl ServerComponent {
    pub fn reference(&self) -> ComponentRef {
        ComponentRef::new(self.category, self.id)
    }
}

/// Component line in a create/update payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerComponentInput {
    pub category: ComponentCategory,
    pub id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

impl ServerComponentInput {
    pub fn reference(&self) -> ComponentRef {
        ComponentRef::new(self.category, self.id)
    }
}

/// Server with components and today's price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerDetail {
    #[serde(flatten)]
    pub server: Server,
    pub components: Vec<ServerComponent>,
    pub pricing: PriceQuote,
}

/// Create server payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerCreate {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "brand is required"))]
    pub brand_id: i64,
    #[validate(length(max = 200))]
    pub model: Option<String>,
    #[validate(range(
        min = 0.0,
        max = 1_000_000_000.0,
        message = "price must be between 0 and 1000000000"
    ))]
    pub price: f64,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub components: Vec<ServerComponentInput>,
}

/// Update server payload
///
/// `components`, when present, replaces the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ServerUpdate {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "brand is required"))]
    pub brand_id: Option<i64>,
    #[validate(length(max = 200))]
    pub model: Option<String>,
    #[validate(range(
        min = 0.0,
        max = 1_000_000_000.0,
        message = "price must be between 0 and 1000000000"
    ))]
    pub price: Option<f64>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub components: Option<Vec<ServerComponentInput>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_input_default_quantity() {
        let input: ServerComponentInput =
            serde_json::from_str(r#"{"category": "ram", "id": 3}"#).unwrap();
        assert_eq!(input.quantity, 1);
        assert_eq!(input.reference(), ComponentRef::new(ComponentCategory::Ram, 3));
    }
}
