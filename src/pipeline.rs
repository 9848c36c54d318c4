//! Sequences upload → trim → transcribe → format → deliver for one
//! request at a time.
//!
//! Stages run strictly in order; the first failure is terminal for the
//! invocation and later stages never start. Artifacts produced before a
//! failure (or before the caller drops the future) are left in place;
//! working-area cleanup is a deployment concern.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::audio::{AudioClipper, ClipRange};
use crate::config::{Config, OutputFormat};
use crate::error::PipelineError;
use crate::storage::{AudioAsset, WorkArea};
use crate::timecode::format_duration_label;
use crate::transcription::document::{render_document, render_plain_text};
use crate::transcription::gemini::GeminiTranscriber;
use crate::transcription::{merge_turns, Transcribe};

/// Stages of one pipeline invocation, in order. `Failed` absorbs from
/// any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Uploaded,
    Trimmed,
    Transcribed,
    Formatted,
    Delivered,
    Failed,
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub filename: String,
    pub duration_seconds: u64,
    pub duration_label: String,
}

/// Rendered transcript ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct DeliveredTranscript {
    /// Download filename, `transcription_<original>.<ext>`
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    /// Where the artifact was also written in the output directory
    pub path: PathBuf,
}

/// The upload/trim/transcribe/format orchestrator.
pub struct Pipeline {
    config: Arc<Config>,
    work_area: WorkArea,
    clipper: AudioClipper,
    transcriber: Box<dyn Transcribe>,
}

impl Pipeline {
    /// Build a pipeline with the production transcription client.
    pub fn new(config: Arc<Config>) -> Result<Self, PipelineError> {
        let transcriber = GeminiTranscriber::new(config.transcription.clone())?;
        Ok(Self::with_transcriber(config, Box::new(transcriber)))
    }

    /// Build a pipeline around a custom transcriber implementation.
    pub fn with_transcriber(config: Arc<Config>, transcriber: Box<dyn Transcribe>) -> Self {
        let work_area = WorkArea::new(
            config.storage.work_dir.clone(),
            config.storage.output_dir.clone(),
        );

        Self {
            config,
            work_area,
            clipper: AudioClipper::new(),
            transcriber,
        }
    }

    /// Persist an upload and probe its duration.
    pub async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<UploadReceipt, PipelineError> {
        let (filename, path) = self.work_area.save_upload(filename, bytes).await?;

        // Decode failure after a successful write leaves the file on disk;
        // cleanup is not this component's responsibility.
        let duration = self.clipper.probe_duration(&path).await?;
        let duration_seconds = duration.as_secs();

        let asset = AudioAsset {
            filename: filename.clone(),
            path,
            duration_seconds,
        };
        info!(
            "📥 Uploaded {} ({}s)",
            asset.filename, asset.duration_seconds
        );

        Ok(UploadReceipt {
            filename,
            duration_seconds,
            duration_label: format_duration_label(duration_seconds),
        })
    }

    /// Run trim → transcribe → format → deliver for a stored upload.
    pub async fn process(
        &self,
        filename: &str,
        start_seconds: u64,
        end_seconds: u64,
    ) -> Result<DeliveredTranscript, PipelineError> {
        match self.run_stages(filename, start_seconds, end_seconds).await {
            Ok(delivered) => Ok(delivered),
            Err(e) => {
                error!(
                    "❌ Pipeline failed for {} ({}): {}",
                    filename,
                    e.kind(),
                    e
                );
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        filename: &str,
        start_seconds: u64,
        end_seconds: u64,
    ) -> Result<DeliveredTranscript, PipelineError> {
        let source = self.work_area.upload_path(filename);
        if !source.exists() {
            return Err(PipelineError::SourceNotFound(filename.to_string()));
        }
        let mut stage = PipelineStage::Uploaded;

        // Requested ranges are clamped to the asset, never rejected
        let total_seconds = self.clipper.probe_duration(&source).await?.as_secs();
        let range = ClipRange::clamped(start_seconds, end_seconds, total_seconds);

        let trimmed = self.work_area.trimmed_path(filename);
        self.clipper.extract_clip(&source, &trimmed, &range).await?;
        stage = self.advance(stage, PipelineStage::Trimmed, filename);

        let turns = self.transcriber.transcribe(&trimmed).await?;
        stage = self.advance(stage, PipelineStage::Transcribed, filename);

        let merged = merge_turns(turns);
        let format = self.config.output.format;
        let bytes = match format {
            OutputFormat::PlainText => render_plain_text(&merged).into_bytes(),
            OutputFormat::Document => render_document(&merged, filename)?,
        };
        stage = self.advance(stage, PipelineStage::Formatted, filename);

        let path = self
            .work_area
            .save_transcript(filename, format.extension(), &bytes)
            .await?;
        stage = self.advance(stage, PipelineStage::Delivered, filename);

        info!(
            "🎉 Delivered {} ({} turns, {:?})",
            path.display(),
            merged.len(),
            stage
        );

        Ok(DeliveredTranscript {
            filename: format!("transcription_{}.{}", filename, format.extension()),
            content_type: format.content_type(),
            bytes,
            path,
        })
    }

    fn advance(&self, from: PipelineStage, to: PipelineStage, filename: &str) -> PipelineStage {
        debug!("📍 {}: {:?} -> {:?}", filename, from, to);
        to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::{Speaker, TranscriptTurn};
    use async_trait::async_trait;
    use std::path::Path;

    struct StaticTranscriber(Vec<TranscriptTurn>);

    #[async_trait]
    impl Transcribe for StaticTranscriber {
        async fn transcribe(
            &self,
            _audio_path: &Path,
        ) -> Result<Vec<TranscriptTurn>, PipelineError> {
            Ok(self.0.clone())
        }
    }

    fn test_config(temp: &tempfile::TempDir) -> Arc<Config> {
        let mut config = Config::default();
        config.storage.work_dir = temp.path().join("work");
        config.storage.output_dir = temp.path().join("out");
        Arc::new(config)
    }

    #[tokio::test]
    async fn test_process_unknown_filename_is_not_found() {
        let temp = tempfile::TempDir::new().unwrap();
        let pipeline = Pipeline::with_transcriber(
            test_config(&temp),
            Box::new(StaticTranscriber(Vec::new())),
        );

        let result = pipeline.process("never-uploaded.mp3", 0, 10).await;
        assert!(matches!(result, Err(PipelineError::SourceNotFound(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_payload() {
        let temp = tempfile::TempDir::new().unwrap();
        let pipeline = Pipeline::with_transcriber(
            test_config(&temp),
            Box::new(StaticTranscriber(Vec::new())),
        );

        let result = pipeline.upload("interview.mp3", &[]).await;
        assert!(matches!(result, Err(PipelineError::NoFile)));
    }

    #[tokio::test]
    async fn test_upload_undecodable_bytes_is_decode_failure() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = test_config(&temp);
        let pipeline = Pipeline::with_transcriber(
            Arc::clone(&config),
            Box::new(StaticTranscriber(Vec::new())),
        );

        let result = pipeline.upload("interview.mp3", b"not audio").await;
        assert!(matches!(result, Err(PipelineError::DecodeFailed(_))));

        // The byte write precedes the probe; the file stays on disk
        assert!(config.storage.work_dir.join("interview.mp3").exists());
    }

    #[test]
    fn test_upload_receipt_label() {
        let receipt = UploadReceipt {
            filename: "interview.mp3".to_string(),
            duration_seconds: 90,
            duration_label: format_duration_label(90),
        };
        assert_eq!(receipt.duration_label, "0h 1m 30s");
    }
}
