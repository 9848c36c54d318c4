//! Working-area layout and upload persistence.
//!
//! A single work directory holds raw uploads (`<filename>`) and trimmed
//! artifacts (`processed_<filename>`); a second directory holds rendered
//! transcripts (`transcription_<filename>.<ext>`). Both are created on
//! demand. Artifacts are keyed by the client-supplied filename, so two
//! concurrent uploads of the same name silently overwrite each other;
//! the working area provides no per-file locking.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::PipelineError;

/// One uploaded audio file, with its duration probed at upload time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioAsset {
    /// Client-supplied filename, unique per working area
    pub filename: String,

    /// Location of the persisted bytes
    pub path: PathBuf,

    /// Total duration in whole seconds, immutable once probed
    pub duration_seconds: u64,
}

/// Filesystem namespace for one deployment's uploads and transcripts.
#[derive(Debug, Clone)]
pub struct WorkArea {
    work_dir: PathBuf,
    output_dir: PathBuf,
}

impl WorkArea {
    pub fn new(work_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            work_dir,
            output_dir,
        }
    }

    /// Create both directories if absent. Idempotent.
    pub async fn ensure_dirs(&self) -> Result<(), PipelineError> {
        for dir in [&self.work_dir, &self.output_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| PipelineError::WriteFailed(format!("{}: {}", dir.display(), e)))?;
        }
        Ok(())
    }

    /// Path of a raw upload.
    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.work_dir.join(filename)
    }

    /// Path of the trimmed artifact derived from an upload.
    pub fn trimmed_path(&self, filename: &str) -> PathBuf {
        self.work_dir.join(format!("processed_{}", filename))
    }

    /// Path of the rendered transcript for an upload.
    pub fn transcript_path(&self, filename: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("transcription_{}.{}", filename, extension))
    }

    /// Persist uploaded bytes verbatim under the client-supplied name.
    ///
    /// An empty payload is rejected; an existing file with the same name
    /// is silently replaced. Returns the sanitized filename and the path
    /// the bytes landed at.
    pub async fn save_upload(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(String, PathBuf), PipelineError> {
        if bytes.is_empty() {
            return Err(PipelineError::NoFile);
        }

        // Strip any path components from the client-supplied name
        let filename = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or(PipelineError::NoFile)?;

        self.ensure_dirs().await?;

        let path = self.upload_path(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PipelineError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        debug!("💾 Saved upload: {} ({} bytes)", path.display(), bytes.len());
        Ok((filename, path))
    }

    /// Write a rendered transcript artifact into the output directory.
    pub async fn save_transcript(
        &self,
        filename: &str,
        extension: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, PipelineError> {
        self.ensure_dirs().await?;

        let path = self.transcript_path(filename, extension);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PipelineError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        debug!("💾 Saved transcript: {}", path.display());
        Ok(path)
    }
}
