//! API request/response models and error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Success payload of the upload endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub message: String,
    pub audio_length: String,
    pub audio_length_seconds: u64,
}

/// Body of the processing endpoint. Fields are optional so that a
/// missing one maps to a structured 400 instead of a rejection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub filename: Option<String>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl ProcessRequest {
    /// Validate field presence, naming every missing field.
    pub fn validated(self) -> Result<(String, u64, u64), PipelineError> {
        let mut missing = Vec::new();
        if self.filename.is_none() {
            missing.push("filename");
        }
        if self.start_time.is_none() {
            missing.push("start_time");
        }
        if self.end_time.is_none() {
            missing.push("end_time");
        }
        if !missing.is_empty() {
            return Err(PipelineError::MissingRequestFields(missing.join(", ")));
        }

        // Negative inputs clamp to zero; fractions truncate to whole seconds
        let start = self.start_time.unwrap_or_default().max(0.0) as u64;
        let end = self.end_time.unwrap_or_default().max(0.0) as u64;

        Ok((self.filename.unwrap_or_default(), start, end))
    }
}

/// Error payload shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match &self {
            PipelineError::NoFile | PipelineError::MissingRequestFields(_) => {
                StatusCode::BAD_REQUEST
            }
            PipelineError::SourceNotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::DecodeFailed(_)
            | PipelineError::MissingCredential
            | PipelineError::RemoteFailure(_)
            | PipelineError::WriteFailed(_)
            | PipelineError::FormatFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_request_missing_fields_named() {
        let request: ProcessRequest =
            serde_json::from_str(r#"{"filename": "interview.mp3", "end_time": 90}"#).unwrap();

        match request.validated() {
            Err(PipelineError::MissingRequestFields(fields)) => {
                assert_eq!(fields, "start_time");
            }
            other => panic!("expected MissingRequestFields, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_process_request_all_fields_missing() {
        let request = ProcessRequest::default();

        match request.validated() {
            Err(PipelineError::MissingRequestFields(fields)) => {
                assert_eq!(fields, "filename, start_time, end_time");
            }
            other => panic!("expected MissingRequestFields, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_process_request_truncates_and_clamps() {
        let request: ProcessRequest = serde_json::from_str(
            r#"{"filename": "interview.mp3", "start_time": -3.0, "end_time": 90.9}"#,
        )
        .unwrap();

        let (filename, start, end) = request.validated().unwrap();
        assert_eq!(filename, "interview.mp3");
        assert_eq!(start, 0);
        assert_eq!(end, 90);
    }

    #[test]
    fn test_upload_response_shape() {
        let response = UploadResponse {
            filename: "interview.mp3".to_string(),
            message: "File uploaded successfully".to_string(),
            audio_length: "0h 1m 30s".to_string(),
            audio_length_seconds: 90,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["audio_length_seconds"], 90);
        assert_eq!(json["audio_length"], "0h 1m 30s");
    }
}
