use thiserror::Error;

use crate::utils::AppError;

/// 启动和运行期间的服务器错误
///
/// 请求处理使用 [`AppError`]，这里只覆盖进程级别的失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("初始化失败: {0}")]
    Init(#[from] AppError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
