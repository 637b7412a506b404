//! Inventory Server - 服务器硬件库存与目录管理
//!
//! # 架构概述
//!
//! - **目录** (`api`, `db`): 组件、整机、品牌、供应商的 CRUD
//! - **折扣** (`pricing`): 按日期生效的折扣，读取时计算当前价格
//! - **库存** (`stock`): 出入库流水，库存为流水的带符号求和
//! - **HTTP** (`services`): axum 路由、中间件、方法覆盖
//!
//! # 模块结构
//!
//! ```text
//! inventory-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池和 repository
//! ├── pricing/       # 折扣计算
//! ├── stock/         # 库存流水计算
//! ├── services/      # 路由组装、中间件
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod pricing;
pub mod services;
pub mod stock;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, NegativeStockPolicy, Server, ServerState};
pub use db::DbService;
pub use pricing::DiscountIndex;
pub use services::HttpService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env 并初始化日志
///
/// 必须在 [`Config::from_env`] 之前调用，否则 .env 中的配置不会生效。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
