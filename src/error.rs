use thiserror::Error;

/// Failure kinds for the upload/trim/transcribe/format pipeline.
///
/// Every stage failure is terminal for its invocation: no retries, no
/// partial results. The API layer maps each kind to an HTTP status class.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The upload carried no file payload.
    #[error("no file uploaded")]
    NoFile,

    /// The audio collaborator could not decode the file.
    #[error("failed to decode audio: {0}")]
    DecodeFailed(String),

    /// The referenced upload no longer resolves to a readable file.
    #[error("audio file not found: {0}")]
    SourceNotFound(String),

    /// No transcription credential is configured.
    #[error("transcription API key is not configured")]
    MissingCredential,

    /// The remote transcription call failed (transport or API error).
    #[error("remote transcription failed: {0}")]
    RemoteFailure(String),

    /// A processing request omitted required fields.
    #[error("missing request fields: {0}")]
    MissingRequestFields(String),

    /// Writing an upload or artifact to disk failed.
    #[error("failed to write file: {0}")]
    WriteFailed(String),

    /// Rendering the transcript artifact failed.
    #[error("failed to render transcript: {0}")]
    FormatFailed(String),
}

impl PipelineError {
    /// Stable slug used in error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::NoFile => "no_file",
            PipelineError::DecodeFailed(_) => "decode_failed",
            PipelineError::SourceNotFound(_) => "source_not_found",
            PipelineError::MissingCredential => "missing_credential",
            PipelineError::RemoteFailure(_) => "remote_failure",
            PipelineError::MissingRequestFields(_) => "missing_request_fields",
            PipelineError::WriteFailed(_) => "write_failed",
            PipelineError::FormatFailed(_) => "format_failed",
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        PipelineError::RemoteFailure(err.to_string())
    }
}
