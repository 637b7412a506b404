//! POST method override
//!
//! HTML forms can only send GET and POST. A POST carrying
//! `X-HTTP-Method-Override: PUT|PATCH|DELETE` or a `_method=` query parameter
//! is dispatched as that method. The header wins over the query parameter.

use axum::extract::{Query, Request};
use http::{Method, Uri};
use serde::Deserialize;

pub const OVERRIDE_HEADER: &str = "x-http-method-override";

/// Methods a POST may be turned into
fn parse_override(value: &str) -> Option<Method> {
    match value.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct OverrideQuery {
    #[serde(rename = "_method")]
    method: Option<String>,
}

fn from_query(uri: &Uri) -> Option<Method> {
    let Query(query) = Query::<OverrideQuery>::try_from_uri(uri).ok()?;
    query.method.as_deref().and_then(parse_override)
}

/// Rewrite the method of an overridden POST; every other request passes through
pub fn override_method(mut request: Request) -> Request {
    if request.method() != Method::POST {
        return request;
    }

    let from_header = request
        .headers()
        .get(OVERRIDE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_override);
    let target = from_header.or_else(|| from_query(request.uri()));

    if let Some(method) = target {
        tracing::debug!(uri = %request.uri(), %method, "Method override");
        *request.method_mut() = method;
    }
    request
}
