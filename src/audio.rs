use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::timecode::seconds_to_millis;

/// A clamped half-open `[start_ms, end_ms)` slice of an audio asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRange {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl ClipRange {
    /// Clamp a requested `[start, end)` second range to the asset length.
    ///
    /// Out-of-bound values are truncated rather than rejected; a start at
    /// or past the (clamped) end collapses to a zero-length range.
    pub fn clamped(start_seconds: u64, end_seconds: u64, total_seconds: u64) -> Self {
        let start = start_seconds.min(total_seconds);
        let end = end_seconds.min(total_seconds).max(start);

        Self {
            start_ms: seconds_to_millis(start),
            end_ms: seconds_to_millis(end),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    pub fn is_empty(&self) -> bool {
        self.start_ms >= self.end_ms
    }
}

/// Audio probing and slicing via ffmpeg/ffprobe subprocesses.
#[derive(Debug, Clone)]
pub struct AudioClipper {
    /// Container format for trimmed artifacts
    pub clip_format: String,
}

impl AudioClipper {
    pub fn new() -> Self {
        Self {
            clip_format: "mp3".to_string(),
        }
    }

    /// Probe the total duration of an audio file.
    ///
    /// The result is truncated to whole seconds; probing the same bytes is
    /// deterministic, so the duration is computed once at upload time and
    /// reused for range validation.
    pub async fn probe_duration(&self, path: &Path) -> Result<Duration, PipelineError> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                path.to_str().unwrap_or_default(),
            ])
            .output()
            .await
            .map_err(|e| PipelineError::DecodeFailed(format!("ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(PipelineError::DecodeFailed(format!(
                "ffprobe failed for {}",
                path.display()
            )));
        }

        let probe: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| PipelineError::DecodeFailed(format!("ffprobe output: {}", e)))?;

        let duration_seconds: f64 = probe["format"]["duration"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                PipelineError::DecodeFailed(format!("no duration in {}", path.display()))
            })?;

        debug!("🎵 Probed {}: {:.1}s", path.display(), duration_seconds);
        Ok(Duration::from_secs(duration_seconds as u64))
    }

    /// Slice `[start_ms, end_ms)` out of `source` into a standalone
    /// encoded artifact at `dest`. The source file is never mutated.
    ///
    /// A degenerate (zero-length) range produces an empty artifact rather
    /// than an error; downstream stages treat the resulting empty
    /// transcript as legitimate output.
    pub async fn extract_clip(
        &self,
        source: &Path,
        dest: &Path,
        range: &ClipRange,
    ) -> Result<(), PipelineError> {
        if !source.exists() {
            return Err(PipelineError::SourceNotFound(source.display().to_string()));
        }

        if range.is_empty() {
            tokio::fs::write(dest, b"")
                .await
                .map_err(|e| PipelineError::WriteFailed(format!("{}: {}", dest.display(), e)))?;
            info!("✂️ Degenerate range, wrote empty clip: {}", dest.display());
            return Ok(());
        }

        let start = format_ffmpeg_time(range.start_ms);
        let end = format_ffmpeg_time(range.end_ms);

        let status = Command::new("ffmpeg")
            .args([
                "-i",
                source.to_str().unwrap_or_default(),
                "-ss",
                start.as_str(),
                "-to",
                end.as_str(),
                "-vn",
                "-acodec",
                "libmp3lame",
                "-y", // Overwrite existing
                dest.to_str().unwrap_or_default(),
            ])
            .status()
            .await
            .map_err(|e| PipelineError::DecodeFailed(format!("ffmpeg: {}", e)))?;

        if !status.success() {
            return Err(PipelineError::DecodeFailed(format!(
                "ffmpeg trim failed for {}",
                source.display()
            )));
        }

        info!(
            "✂️ Trimmed {} -> {} ({}ms)",
            source.display(),
            dest.display(),
            range.duration_ms()
        );
        Ok(())
    }
}

impl Default for AudioClipper {
    fn default() -> Self {
        Self::new()
    }
}

/// ffmpeg position argument: seconds with millisecond precision.
fn format_ffmpeg_time(millis: u64) -> String {
    format!("{}.{:03}", millis / 1000, millis % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_range_within_bounds() {
        let range = ClipRange::clamped(10, 80, 90);
        assert_eq!(range.start_ms, 10_000);
        assert_eq!(range.end_ms, 80_000);
        assert_eq!(range.duration_ms(), 70_000);
        assert!(!range.is_empty());
    }

    #[test]
    fn test_clip_range_clamps_end_to_total() {
        // Requesting (10, 200) against a 90-second asset trims 80 seconds
        let range = ClipRange::clamped(10, 200, 90);
        assert_eq!(range.start_ms, 10_000);
        assert_eq!(range.end_ms, 90_000);
        assert_eq!(range.duration_ms(), 80_000);
    }

    #[test]
    fn test_clip_range_clamps_start_to_total() {
        let range = ClipRange::clamped(120, 200, 90);
        assert_eq!(range.start_ms, 90_000);
        assert_eq!(range.end_ms, 90_000);
        assert!(range.is_empty());
    }

    #[test]
    fn test_clip_range_inverted_collapses_to_empty() {
        let range = ClipRange::clamped(50, 10, 90);
        assert_eq!(range.start_ms, 50_000);
        assert_eq!(range.end_ms, 50_000);
        assert!(range.is_empty());
        assert_eq!(range.duration_ms(), 0);
    }

    #[test]
    fn test_ffmpeg_time_format() {
        assert_eq!(format_ffmpeg_time(0), "0.000");
        assert_eq!(format_ffmpeg_time(10_000), "10.000");
        assert_eq!(format_ffmpeg_time(90_500), "90.500");
    }

    #[tokio::test]
    async fn test_extract_clip_missing_source() {
        let clipper = AudioClipper::new();
        let range = ClipRange::clamped(0, 10, 90);

        let result = clipper
            .extract_clip(
                Path::new("/nonexistent/interview.mp3"),
                Path::new("/tmp/out.mp3"),
                &range,
            )
            .await;
        assert!(matches!(result, Err(PipelineError::SourceNotFound(_))));
    }

    #[tokio::test]
    async fn test_degenerate_range_writes_empty_artifact() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("interview.mp3");
        let dest = temp.path().join("processed_interview.mp3");
        tokio::fs::write(&source, b"not really audio").await.unwrap();

        let clipper = AudioClipper::new();
        let range = ClipRange::clamped(30, 30, 90);
        clipper.extract_clip(&source, &dest, &range).await.unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap().len(), 0);
        // Original asset untouched
        assert_eq!(
            tokio::fs::read(&source).await.unwrap(),
            b"not really audio"
        );
    }
}
