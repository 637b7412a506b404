//! 分页响应
//!
//! Page numbers start at 1. `last_page` is never below 1, so an empty
//! result is still "page 1 of 1".

use serde::{Deserialize, Serialize};

/// One page of a listing plus the metadata a table footer needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// 数据列表
    pub data: Vec<T>,
    /// 总记录数
    pub total: u64,
    /// 每页数量
    pub per_page: u32,
    /// 当前页码
    pub current_page: u32,
    /// 最后一页页码
    pub last_page: u32,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, current_page: u32, per_page: u32) -> Self {
        Self {
            data,
            total,
            per_page,
            current_page,
            last_page: last_page(total, per_page),
        }
    }
}

/// Number of the last page for `total` rows at `per_page` rows per page
pub fn last_page(total: u64, per_page: u32) -> u32 {
    if per_page == 0 || total == 0 {
        return 1;
    }
    total.div_ceil(per_page as u64) as u32
}

/// Row offset of the first item on `page` (pages below 1 are treated as 1)
pub fn offset(page: u32, per_page: u32) -> u64 {
    (page.max(1) as u64 - 1) * per_page as u64
}
