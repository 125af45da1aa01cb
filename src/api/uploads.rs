//! Image uploads
//!
//! One multipart endpoint per bucket. Keys are server-generated, so a client
//! can never overwrite another object; the original filename only contributes
//! its extension.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::AppState;
use crate::auth::AdminSession;
use crate::error::AppError;
use crate::storage::Bucket;

#[derive(Debug, Serialize)] pub struct UploadResponse { pub url: String }

pub async fn upload(
    State(s): State<AppState>,
    _admin: AdminSession,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let bucket = Bucket::parse(&bucket).ok_or(AppError::NotFound("bucket"))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let extension = field
            .file_name()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .or_else(|| field.content_type().and_then(extension_for_mime))
            .unwrap_or_else(|| "bin".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if data.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".to_string()));
        }

        let key = format!("{}.{}", Uuid::now_v7(), extension);
        let url = s.storage.put(bucket, &key, &data).await?;
        tracing::info!(%bucket, %key, size = data.len(), "stored upload");
        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }

    Err(AppError::Validation("missing multipart field 'file'".to_string()))
}

fn extension_for_mime(mime: &str) -> Option<String> {
    mime_guess::get_mime_extensions_str(mime)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
}
