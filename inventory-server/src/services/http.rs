use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Request};
use axum::{Router, middleware};
use http::StatusCode;
use tower::Layer;
use tower::util::{MapRequest, MapRequestLayer};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use super::method_override::override_method;
use crate::api::upload::MAX_FILE_SIZE;
use crate::core::ServerState;

/// Router with method override applied before routing
pub type App = MapRequest<Router, fn(Request) -> Request>;

/// HTTP 请求日志中间件
async fn log_request(request: Request, next: middleware::Next) -> axum::response::Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::upload::router())
        // Catalog
        .merge(crate::api::component_types::router())
        .merge(crate::api::brands::router())
        .merge(crate::api::suppliers::router())
        .merge(crate::api::components::router())
        .merge(crate::api::servers::router())
        // Pricing & stock
        .merge(crate::api::discounts::router())
        .merge(crate::api::stock::router())
}

#[derive(Clone, Debug)]
pub struct HttpService {
    state: ServerState,
}

impl HttpService {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    /// Router bound to state, with all middleware
    pub fn router(&self) -> Router {
        let timeout = Duration::from_millis(self.state.config.request_timeout_ms);

        build_app()
            .with_state(self.state.clone())
            // Multipart 需要略大于文件上限
            .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            ))
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(middleware::from_fn(log_request))
    }

    /// Complete service; method override has to run before the router
    /// picks a route, so it wraps the router instead of being a route layer
    pub fn app(&self) -> App {
        MapRequestLayer::new(override_method as fn(Request) -> Request).layer(self.router())
    }
}
