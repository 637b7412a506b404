//! Stock API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/stock/movements | GET, POST | 出入库记录 |
//! | /api/stock/movements/{id} | GET, PUT, DELETE | 单条记录 (PUT 为整体覆盖) |
//! | /api/stock/levels?page=N | GET | 库存分页列表 |
//! | /api/stock/levels/{component_id} | GET | 单个组件库存 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stock", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/movements", get(handler::list).post(handler::create))
        .route(
            "/movements/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route("/levels", get(handler::levels))
        .route("/levels/{component_id}", get(handler::level))
}
