//! Image Upload Handler
//!
//! Supports PNG, JPEG and WebP; every upload is re-encoded as JPEG and
//! stored under its content hash, so identical images share one file.

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;

use crate::core::ServerState;
use crate::utils::error::multipart_error;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

const JPEG_QUALITY: u8 = 85;

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
    pub size: usize,
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate size and extension before decoding
fn validate_upload(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            ),
        )
        .with_detail("max_bytes", MAX_FILE_SIZE));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext_lower,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    Ok(())
}

/// Decode and re-encode as JPEG
fn compress_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}"))
    })?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Failed to compress image: {e}"),
            )
        })?;
    }

    Ok(buffer)
}

fn extension_of(filename: &str) -> Result<String, AppError> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidFileExtension,
                format!("Invalid file extension for: {filename}"),
            )
        })
}

/// POST /api/image/upload - 上传图片
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let original = field.file_name().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?.to_vec();
            upload = Some((original, data));
            break;
        }
    }

    let (original, data) = upload.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    let original = original.ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;
    let ext = extension_of(&original)?;

    validate_upload(&data, &ext)?;
    let compressed = compress_image(&data)?;

    let filename = format!("{}.jpg", calculate_hash(&compressed));
    let images_dir = state.images_dir();
    let file_path = images_dir.join(&filename);

    if tokio::fs::try_exists(&file_path).await.unwrap_or(false) {
        tracing::info!(
            original_name = %original,
            existing_file = %filename,
            "Duplicate image detected, returning existing file"
        );
    } else {
        let storage_error = |e: std::io::Error| {
            AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to save file: {e}"),
            )
        };
        tokio::fs::create_dir_all(&images_dir)
            .await
            .map_err(storage_error)?;
        tokio::fs::write(&file_path, &compressed)
            .await
            .map_err(storage_error)?;

        tracing::info!(
            original_name = %original,
            size = compressed.len(),
            filename = %filename,
            "Image uploaded successfully"
        );
    }

    Ok(ok(UploadResponse {
        url: format!("/api/image/{filename}"),
        size: compressed.len(),
        filename,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_validate_upload() {
        assert!(validate_upload(&[1, 2, 3], "PNG").is_ok());
        assert_eq!(
            validate_upload(&[], "png").unwrap_err().code,
            ErrorCode::EmptyFile
        );
        assert_eq!(
            validate_upload(&[1], "gif").unwrap_err().code,
            ErrorCode::UnsupportedFileFormat
        );
        let big = vec![0u8; MAX_FILE_SIZE + 1];
        assert_eq!(
            validate_upload(&big, "jpg").unwrap_err().code,
            ErrorCode::FileTooLarge
        );
    }

    #[test]
    fn test_compress_image() {
        let jpeg = compress_image(&png_bytes()).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let err = compress_image(b"not an image").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(calculate_hash(b"abc"), calculate_hash(b"abc"));
        assert_eq!(calculate_hash(b"abc").len(), 64);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("rack.webp").unwrap(), "webp");
        assert_eq!(
            extension_of("noext").unwrap_err().code,
            ErrorCode::InvalidFileExtension
        );
    }
}
