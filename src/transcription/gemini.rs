//! Remote transcription via the Google generative-language API.
//!
//! Two calls per invocation: a multipart file upload, then a single
//! `generateContent` call carrying the uploaded file handle and a fixed
//! instruction prompt. One attempt only; any transport or API error
//! aborts the pipeline.

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{parse_transcript, Transcribe, TranscriptTurn};
use crate::config::TranscriptionConfig;
use crate::error::PipelineError;

/// Instruction prompt sent with every generation call.
const TRANSCRIPTION_PROMPT: &str = "Transcribe this interview recording. \
Translate all speech to English, even if it was originally spoken in \
another language. Label each utterance with a single-letter speaker code \
followed by a colon: 'M:' for the moderator and 'R:' for the responder. \
Merge consecutive lines from the same speaker into one block. Preserve \
apostrophes as-is, without escaping. Output only English script.";

/// Transcription client backed by the generative-language API.
pub struct GeminiTranscriber {
    config: TranscriptionConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "fileData", skip_serializing_if = "Option::is_none")]
    file_data: Option<GeminiFileData>,
}

#[derive(Debug, Serialize)]
struct GeminiFileData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    #[serde(rename = "fileUri")]
    file_uri: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Option<Vec<GeminiResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileUploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    uri: String,
}

impl GeminiTranscriber {
    pub fn new(config: TranscriptionConfig) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PipelineError::RemoteFailure(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Upload trimmed audio bytes, returning the remote file handle.
    async fn upload_audio(
        &self,
        api_key: &str,
        audio_path: &Path,
    ) -> Result<GeminiFileData, PipelineError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|_| PipelineError::SourceNotFound(audio_path.display().to_string()))?;

        let display_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();
        let mime_type = mime_type_for(&display_name);

        let metadata = serde_json::json!({
            "file": { "display_name": display_name.clone() }
        });

        let form = multipart::Form::new()
            .part(
                "metadata",
                multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(|e| PipelineError::RemoteFailure(e.to_string()))?,
            )
            .part(
                "file",
                multipart::Part::bytes(bytes)
                    .file_name(display_name)
                    .mime_str(mime_type)
                    .map_err(|e| PipelineError::RemoteFailure(e.to_string()))?,
            );

        let url = format!(
            "{}/upload/v1beta/files?key={}",
            self.config.endpoint, api_key
        );

        debug!("📤 Uploading audio to generative-language file API");

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Upload-Protocol", "multipart")
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::RemoteFailure(format!(
                "file upload error {}: {}",
                status, text
            )));
        }

        let uploaded: FileUploadResponse = response.json().await?;

        Ok(GeminiFileData {
            mime_type: mime_type.to_string(),
            file_uri: uploaded.file.uri,
        })
    }

    /// Single generation call against the uploaded audio handle.
    async fn generate(
        &self,
        api_key: &str,
        file_data: GeminiFileData,
    ) -> Result<String, PipelineError> {
        let request = GenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart {
                        text: None,
                        file_data: Some(file_data),
                    },
                    GeminiPart {
                        text: Some(TRANSCRIPTION_PROMPT.to_string()),
                        file_data: None,
                    },
                ],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, api_key
        );

        debug!("🎤 Requesting transcription from {}", self.config.model);

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::RemoteFailure(format!(
                "generation error {}: {}",
                status, text
            )));
        }

        let generated: GenerateResponse = response.json().await?;

        let text = generated
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text)
    }
}

#[async_trait]
impl Transcribe for GeminiTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscriptTurn>, PipelineError> {
        // Credential absence is a configuration failure, reported before
        // any file or network I/O is attempted.
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                error!("❌ No transcription API key configured");
                return Err(PipelineError::MissingCredential);
            }
        };

        let file_data = self.upload_audio(&api_key, audio_path).await?;
        let raw = self.generate(&api_key, file_data).await?;

        let turns = parse_transcript(&raw);
        info!(
            "✅ Transcribed {}: {} raw turns",
            audio_path.display(),
            turns.len()
        );

        Ok(turns)
    }
}

/// Guess the upload MIME type from the artifact's extension.
fn mime_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_key() -> TranscriptionConfig {
        TranscriptionConfig {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }

    #[tokio::test]
    async fn test_missing_credential_is_hard_failure() {
        let transcriber = GeminiTranscriber::new(config_without_key()).unwrap();

        // Fails before touching the (nonexistent) file or the network
        let result = transcriber
            .transcribe(Path::new("/nonexistent/processed_interview.mp3"))
            .await;
        assert!(matches!(result, Err(PipelineError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_empty_credential_is_hard_failure() {
        let mut config = config_without_key();
        config.api_key = Some(String::new());

        let transcriber = GeminiTranscriber::new(config).unwrap();
        let result = transcriber.transcribe(Path::new("/tmp/clip.mp3")).await;
        assert!(matches!(result, Err(PipelineError::MissingCredential)));
    }

    #[test]
    fn test_mime_type_guessing() {
        assert_eq!(mime_type_for("processed_interview.mp3"), "audio/mpeg");
        assert_eq!(mime_type_for("clip.wav"), "audio/wav");
        assert_eq!(mime_type_for("mystery"), "application/octet-stream");
    }

    #[test]
    fn test_generate_request_wire_format() {
        let request = GenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart {
                        text: None,
                        file_data: Some(GeminiFileData {
                            mime_type: "audio/mpeg".to_string(),
                            file_uri: "https://example.test/files/abc".to_string(),
                        }),
                    },
                    GeminiPart {
                        text: Some("prompt".to_string()),
                        file_data: None,
                    },
                ],
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["fileData"]["mimeType"], "audio/mpeg");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], "prompt");
    }

    #[test]
    fn test_prompt_names_both_speaker_codes() {
        assert!(TRANSCRIPTION_PROMPT.contains("'M:'"));
        assert!(TRANSCRIPTION_PROMPT.contains("'R:'"));
        assert!(TRANSCRIPTION_PROMPT.contains("English"));
    }
}
