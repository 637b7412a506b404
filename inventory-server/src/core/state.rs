use std::path::PathBuf;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::{AppError, AppResult};

/// 服务器状态 - 所有处理器共享
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
///
/// 两者都是廉价克隆 (连接池内部为 Arc)。
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self { config, pool }
    }

    /// 初始化服务器状态
    ///
    /// 创建工作目录和图片目录，打开数据库并执行迁移。
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let work_dir = config.work_dir();
        std::fs::create_dir_all(config.images_dir()).map_err(|e| {
            AppError::internal(format!(
                "Failed to create work dir {}: {e}",
                work_dir.display()
            ))
        })?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        tracing::info!(
            work_dir = %work_dir.display(),
            policy = ?config.negative_stock_policy,
            cascade = config.discount_cascade_to_components,
            "Server state initialized"
        );

        Ok(Self::new(config.clone(), db.pool))
    }

    /// 工作目录
    pub fn work_dir(&self) -> PathBuf {
        self.config.work_dir()
    }

    /// 上传图片目录
    pub fn images_dir(&self) -> PathBuf {
        self.config.images_dir()
    }
}
