/// Audio Scribe
///
/// Upload an audio file, select a time range, and receive a
/// speaker-labeled English transcript of that range. Trimming shells out
/// to ffmpeg; transcription delegates to the generative-language API.

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod storage;
pub mod timecode;
pub mod transcription;

// Re-export main types for easy access
pub use crate::audio::{AudioClipper, ClipRange};
pub use crate::config::{Config, OutputFormat};
pub use crate::error::PipelineError;
pub use crate::pipeline::{DeliveredTranscript, Pipeline, PipelineStage, UploadReceipt};
pub use crate::storage::{AudioAsset, WorkArea};
pub use crate::transcription::gemini::GeminiTranscriber;
pub use crate::transcription::{Speaker, Transcribe, TranscriptTurn};
