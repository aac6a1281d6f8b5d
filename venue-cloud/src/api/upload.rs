//! Venue layout upload
//!
//! POST /api/upload/venue-layout: multipart `file` + `businessId` → validate →
//! S3 `venue-layouts/{businessId}/{unix_ms}.{ext}` → `{ url }`

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
};
use http::StatusCode;
use image::ImageFormat;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};

use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::now_millis;

/// Maximum layout file size (10MB)
pub const MAX_LAYOUT_SIZE: usize = 10 * 1024 * 1024;

/// Accepted content types and the extension stored for each
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("application/pdf", "pdf"),
];

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

fn s3_layout_key(business_id: &str, timestamp: i64, ext: &str) -> String {
    format!("venue-layouts/{business_id}/{timestamp}.{ext}")
}

/// POST /api/upload/venue-layout
pub async fn upload_venue_layout(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServiceError> {
    let mut file: Option<(Option<String>, Vec<u8>)> = None;
    let mut business_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((content_type, data.to_vec()));
            }
            Some("businessId") => {
                business_id = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (content_type, data) = file.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    let business_id = business_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::with_message(ErrorCode::RequiredField, "businessId is required"))?;
    if !is_safe_path_segment(&business_id) {
        return Err(AppError::invalid_request("Invalid businessId").into());
    }

    let (mime, ext) = validate_layout(content_type.as_deref(), &data)?;

    let key = s3_layout_key(&business_id, now_millis(), ext);
    state
        .s3
        .put_object()
        .bucket(&state.upload_s3_bucket)
        .key(&key)
        .body(data.into())
        .content_type(mime)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(key = %key, "S3 put_object failed");
            ServiceError::Storage(e.into())
        })?;

    tracing::info!(business_id = %business_id, key = %key, "Venue layout uploaded");

    Ok(Json(UploadResponse {
        url: format!("{}/{key}", state.upload_public_base_url),
    }))
}

/// Check declared type, size and actual content.
/// Returns the canonical MIME type and the extension to store under.
pub fn validate_layout(
    content_type: Option<&str>,
    data: &[u8],
) -> Result<(&'static str, &'static str), AppError> {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .unwrap_or_default();
    let (mime, ext) = ALLOWED_TYPES
        .iter()
        .copied()
        .find(|(m, _)| *m == declared)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                "Invalid file type. Allowed: JPEG, PNG, WebP, PDF",
            )
        })?;

    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_LAYOUT_SIZE {
        return Err(too_large());
    }

    let content_matches = match mime {
        "application/pdf" => data.starts_with(b"%PDF-"),
        _ => {
            let expected = match ext {
                "jpg" => ImageFormat::Jpeg,
                "png" => ImageFormat::Png,
                _ => ImageFormat::WebP,
            };
            image::guess_format(data).is_ok_and(|f| f == expected)
        }
    };
    if !content_matches {
        return Err(AppError::with_message(
            ErrorCode::InvalidFileContent,
            "File content does not match its type",
        ));
    }

    Ok((mime, ext))
}

fn is_safe_path_segment(s: &str) -> bool {
    s.len() <= 128
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn too_large() -> AppError {
    AppError::with_message(ErrorCode::FileTooLarge, "File too large. Maximum size is 10MB")
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large();
    }
    AppError::invalid_request(format!("Invalid multipart body: {}", e.body_text()))
}
