use std::path::PathBuf;
use std::str::FromStr;

/// 负库存策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NegativeStockPolicy {
    /// Balances may go below zero
    #[default]
    Allow,
    /// Movements that would drive a balance below zero are refused
    Reject,
}

impl FromStr for NegativeStockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown negative stock policy: {other}")),
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、图片) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 默认日志级别 |
/// | LOG_DIR | - | 滚动日志目录 |
/// | STOCK_PAGE_SIZE | 15 | 库存列表每页数量 |
/// | STOCK_NEGATIVE_POLICY | allow | allow / reject |
/// | DISCOUNT_CASCADE_TO_COMPONENTS | false | 整机折扣是否作用于其组件 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/inventory HTTP_PORT=8080 STOCK_NEGATIVE_POLICY=reject cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和上传的图片
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 默认日志级别 (RUST_LOG 优先)
    pub log_level: String,
    /// 日志目录 (存在时启用按天滚动的文件日志)
    pub log_dir: Option<String>,
    /// 库存列表每页数量
    pub stock_page_size: u32,
    /// 负库存策略
    pub negative_stock_policy: NegativeStockPolicy,
    /// 整机折扣是否同时作用于其包含的组件
    pub discount_cascade_to_components: bool,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            stock_page_size: std::env::var("STOCK_PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|n: &u32| *n > 0)
                .unwrap_or(15),
            negative_stock_policy: std::env::var("STOCK_NEGATIVE_POLICY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            discount_cascade_to_components: std::env::var("DISCOUNT_CASCADE_TO_COMPONENTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    /// SQLite 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        self.work_dir().join("inventory.db")
    }

    /// 上传图片目录
    pub fn images_dir(&self) -> PathBuf {
        self.work_dir().join("images")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
