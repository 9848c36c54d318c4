//! API request handlers

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use tracing::info;

use super::models::{ProcessRequest, UploadResponse};
use super::server::AppState;
use crate::error::PipelineError;

/// Handle health check requests
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "audio-scribe",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Service banner at the root path
pub async fn service_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the audio-scribe API",
        "endpoints": ["/uploadfile/", "/process_audio/", "/health"]
    }))
}

/// Handle audio uploads: persist the file and report its duration.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, PipelineError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| PipelineError::NoFile)?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("upload.bin")
                .to_string();
            let bytes = field.bytes().await.map_err(|_| PipelineError::NoFile)?;
            file = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) = file.ok_or(PipelineError::NoFile)?;
    info!("📥 Upload request: {} ({} bytes)", filename, bytes.len());

    let receipt = state.pipeline.upload(&filename, &bytes).await?;

    Ok(Json(UploadResponse {
        filename: receipt.filename,
        message: "File uploaded successfully".to_string(),
        audio_length: receipt.duration_label,
        audio_length_seconds: receipt.duration_seconds,
    }))
}

/// Handle processing requests: trim, transcribe, and return the
/// rendered transcript as a download.
pub async fn process_audio(
    State(state): State<AppState>,
    Json(payload): Json<ProcessRequest>,
) -> Result<Response, PipelineError> {
    let (filename, start, end) = payload.validated()?;
    info!("🎬 Processing request: {} [{}, {})", filename, start, end);

    let delivered = state.pipeline.process(&filename, start, end).await?;

    let disposition = format!("attachment; filename=\"{}\"", delivered.filename);
    Ok((
        [
            (header::CONTENT_TYPE, delivered.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        delivered.bytes,
    )
        .into_response())
}
