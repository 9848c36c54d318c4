use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the audio-scribe service.
///
/// Built once at startup and injected into the pipeline and API layer;
/// nothing reads process environment after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Working-area and output directories
    pub storage: StorageConfig,

    /// Remote transcription service settings
    pub transcription: TranscriptionConfig,

    /// Transcript output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Listen port
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding raw uploads and trimmed artifacts
    pub work_dir: PathBuf,

    /// Directory holding rendered transcripts
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Base endpoint of the generative-language API
    pub endpoint: String,

    /// Model to use for transcription
    pub model: String,

    /// API key; absence is a hard failure at call time
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Rendered transcript format
    pub format: OutputFormat,
}

/// Transcript output format, resolved once per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    PlainText,
    Document,
}

impl OutputFormat {
    /// File extension for rendered artifacts.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::PlainText => "txt",
            OutputFormat::Document => "docx",
        }
    }

    /// Content type served by the processing endpoint.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::PlainText => "text/plain; charset=utf-8",
            OutputFormat::Document => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 7400,
            },
            storage: StorageConfig {
                work_dir: PathBuf::from("uploaded_files"),
                output_dir: PathBuf::from("transcriptions"),
            },
            transcription: TranscriptionConfig {
                endpoint: "https://generativelanguage.googleapis.com".to_string(),
                model: "gemini-1.5-flash".to_string(),
                api_key: None,
                timeout_seconds: 300,
            },
            output: OutputConfig {
                format: OutputFormat::Document,
            },
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to environment overrides.
    pub fn load() -> Result<Self> {
        let config_paths = ["audio-scribe.toml", "config/audio-scribe.toml"];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_env_overrides();
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Build configuration from defaults plus environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("AUDIO_SCRIBE_PORT") {
            self.server.port = port.parse().unwrap_or(self.server.port);
        }

        // `Upload_dir` is the historical name for the working directory
        for var in ["AUDIO_SCRIBE_WORK_DIR", "Upload_dir"] {
            if let Ok(dir) = std::env::var(var) {
                self.storage.work_dir = PathBuf::from(dir);
                break;
            }
        }

        if let Ok(dir) = std::env::var("AUDIO_SCRIBE_OUTPUT_DIR") {
            self.storage.output_dir = PathBuf::from(dir);
        }

        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            if !api_key.trim().is_empty() {
                self.transcription.api_key = Some(api_key);
            }
        }

        if let Ok(model) = std::env::var("AUDIO_SCRIBE_MODEL") {
            self.transcription.model = model;
        }
    }

    /// Validate configuration and create missing directories.
    pub fn validate(&self) -> Result<()> {
        if self.transcription.timeout_seconds == 0 {
            return Err(anyhow!("transcription timeout must be greater than 0"));
        }

        if self.transcription.model.is_empty() {
            return Err(anyhow!("transcription model must not be empty"));
        }

        for dir in [&self.storage.work_dir, &self.storage.output_dir] {
            if !dir.exists() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    return Err(anyhow!("cannot create directory {}: {}", dir.display(), e));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 7400);
        assert_eq!(config.storage.work_dir, PathBuf::from("uploaded_files"));
        assert!(config.transcription.api_key.is_none());
        assert_eq!(config.output.format, OutputFormat::Document);
    }

    #[test]
    fn test_output_format_extensions() {
        assert_eq!(OutputFormat::PlainText.extension(), "txt");
        assert_eq!(OutputFormat::Document.extension(), "docx");
        assert!(OutputFormat::Document.content_type().contains("wordprocessingml"));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.output.format, config.output.format);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.transcription.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
