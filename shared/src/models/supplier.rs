//! Supplier Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Supplier entity (供应商)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create supplier payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupplierCreate {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 120))]
    pub contact_name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Update supplier payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SupplierUpdate {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub contact_name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}
