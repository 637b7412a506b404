//! Upload Routes
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/image/upload | POST | 上传图片 (multipart 字段 `file`) |
//! | /api/image/{filename} | GET | 读取已上传图片 |

mod handler;

pub use handler::{MAX_FILE_SIZE, UploadResponse};

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use http::header;

use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// Stored image bytes
struct ImageFile(Bytes);

impl IntoResponse for ImageFile {
    fn into_response(self) -> axum::response::Response {
        (
            http::StatusCode::OK,
            [(header::CONTENT_TYPE, "image/jpeg")],
            self.0,
        )
            .into_response()
    }
}

/// Reject anything that could leave the images directory
fn is_safe_filename(filename: &str) -> bool {
    !(filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\'))
}

/// GET /api/image/{filename} - 读取已上传图片
async fn serve_uploaded_file(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> Result<ImageFile, AppError> {
    if !is_safe_filename(&filename) {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Invalid filename",
        ));
    }

    let file_path = state.images_dir().join(&filename);
    match tokio::fs::read(&file_path).await {
        Ok(content) => Ok(ImageFile(content.into())),
        Err(e) => {
            tracing::debug!(filename = %filename, error = %e, "Image not found");
            Err(AppError::not_found(format!("Image {filename}")))
        }
    }
}

/// Build upload router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/image/upload", post(handler::upload))
        .route("/api/image/{filename}", get(serve_uploaded_file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename() {
        assert!(is_safe_filename("ab12.jpg"));
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("../inventory.db"));
        assert!(!is_safe_filename("a/b.jpg"));
        assert!(!is_safe_filename("a\\b.jpg"));
    }
}
