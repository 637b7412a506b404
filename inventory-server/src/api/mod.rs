//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`upload`] - 图片上传
//! - [`component_types`] - 组件类型表
//! - [`brands`] - 品牌管理接口
//! - [`suppliers`] - 供应商管理接口
//! - [`components`] - 组件管理接口 (含价格)
//! - [`servers`] - 整机管理接口 (含价格)
//! - [`discounts`] - 折扣管理接口
//! - [`stock`] - 出入库记录和库存

pub mod health;
pub mod upload;

// Catalog
pub mod brands;
pub mod component_types;
pub mod components;
pub mod servers;
pub mod suppliers;

// Pricing & stock
pub mod discounts;
pub mod stock;

use std::fmt::Display;
use std::str::FromStr;

use crate::core::ServerState;
use crate::pricing::DiscountIndex;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Parse an optional query filter, reporting failures against `field`
pub(crate) fn parse_filter<T>(value: Option<&str>, field: &str, code: ErrorCode) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e: T::Err| AppError::invalid_field(code, field, e.to_string())),
    }
}

/// Discounts active today, ready to price a response
pub(crate) async fn price_index(state: &ServerState) -> AppResult<DiscountIndex> {
    let index = DiscountIndex::load(
        &state.pool,
        shared::util::today(),
        state.config.discount_cascade_to_components,
    )
    .await?;
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ComponentCategory;

    #[test]
    fn test_parse_filter() {
        let none: Option<ComponentCategory> =
            parse_filter(None, "category", ErrorCode::InvalidRequest).unwrap();
        assert!(none.is_none());

        let blank: Option<ComponentCategory> =
            parse_filter(Some("  "), "category", ErrorCode::InvalidRequest).unwrap();
        assert!(blank.is_none());

        let ram = parse_filter(Some("ram"), "category", ErrorCode::InvalidRequest).unwrap();
        assert_eq!(ram, Some(ComponentCategory::Ram));

        let err = parse_filter::<ComponentCategory>(Some("gpu"), "category", ErrorCode::InvalidRequest)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert!(err.details.unwrap().contains_key("category"));
    }
}
