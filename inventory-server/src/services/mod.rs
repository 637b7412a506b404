//! 服务层 - HTTP 服务
//!
//! - [`HttpService`] - 路由组装和中间件
//! - [`method_override`] - POST 方法覆盖

pub mod http;
pub mod method_override;

pub use self::http::{HttpService, build_app};
