//! Brand Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Brand entity (品牌)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create brand payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BrandCreate {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(url(message = "website must be a valid URL"))]
    pub website: Option<String>,
    pub image: Option<String>,
}

/// Update brand payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BrandUpdate {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: Option<String>,
    #[validate(url(message = "website must be a valid URL"))]
    pub website: Option<String>,
    pub image: Option<String>,
}
