//! Speaker-labeled transcript turns: parsing, merging, and the
//! transcriber seam.

pub mod document;
pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PipelineError;

/// Speaker attribution for one transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Moderator,
    Responder,
}

impl Speaker {
    /// Single-letter code used on the wire and in plain-text rendering.
    pub fn code(&self) -> &'static str {
        match self {
            Speaker::Moderator => "M",
            Speaker::Responder => "R",
        }
    }
}

/// One contiguous block of speech attributed to a single speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// Seam for the remote transcription capability.
#[async_trait]
pub trait Transcribe: Send + Sync {
    /// Transcribe an audio artifact into ordered speaker-labeled turns.
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscriptTurn>, PipelineError>;
}

/// Parse raw remote output into ordered turns.
///
/// A line starting with `M:` or `R:` opens a new turn for that speaker;
/// any other non-empty line continues the current turn. Lines arriving
/// before the first speaker tag have no turn to continue and are dropped.
pub fn parse_transcript(raw: &str) -> Vec<TranscriptTurn> {
    let mut turns: Vec<TranscriptTurn> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("M:") {
            turns.push(TranscriptTurn::new(Speaker::Moderator, rest.trim()));
        } else if let Some(rest) = line.strip_prefix("R:") {
            turns.push(TranscriptTurn::new(Speaker::Responder, rest.trim()));
        } else if let Some(current) = turns.last_mut() {
            if !current.text.is_empty() {
                current.text.push(' ');
            }
            current.text.push_str(line);
        }
    }

    turns
}

/// Merge adjacent turns that share a speaker, preserving order.
///
/// Texts are joined with a single space. The pass is idempotent: the
/// output never contains two adjacent turns with the same speaker.
pub fn merge_turns(turns: Vec<TranscriptTurn>) -> Vec<TranscriptTurn> {
    let mut merged: Vec<TranscriptTurn> = Vec::with_capacity(turns.len());

    for turn in turns {
        match merged.last_mut() {
            Some(last) if last.speaker == turn.speaker => {
                if !turn.text.is_empty() {
                    if !last.text.is_empty() {
                        last.text.push(' ');
                    }
                    last.text.push_str(&turn.text);
                }
            }
            _ => merged.push(turn),
        }
    }

    merged
}
