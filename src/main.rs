use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use audio_scribe::api::ApiServer;
use audio_scribe::{Config, OutputFormat, Pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Audio Scribe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Audio trimming and speaker-labeled transcription service")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on"),
        )
        .arg(
            Arg::new("work-dir")
                .short('w')
                .long("work-dir")
                .value_name("DIR")
                .help("Directory for uploads and trimmed artifacts"),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Directory for rendered transcripts"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Transcript output format: text or docx"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logging
    let filter = if matches.get_flag("verbose") {
        "audio_scribe=debug,tower_http=debug,info"
    } else {
        "audio_scribe=info,warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    // CLI overrides
    if let Some(port) = matches.get_one::<String>("port") {
        config.server.port = port.parse()?;
    }
    if let Some(dir) = matches.get_one::<String>("work-dir") {
        config.storage.work_dir = PathBuf::from(dir);
    }
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.storage.output_dir = PathBuf::from(dir);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        config.output.format = match format.as_str() {
            "text" | "txt" => OutputFormat::PlainText,
            "docx" | "document" => OutputFormat::Document,
            other => return Err(anyhow::anyhow!("unknown output format: {}", other)),
        };
    }

    config.validate()?;

    if config.transcription.api_key.is_none() {
        warn!("No GEMINI_API_KEY configured; transcription requests will fail");
    }

    info!("🚀 Audio Scribe starting...");
    info!("📁 Working directory: {}", config.storage.work_dir.display());
    info!("📂 Output directory: {}", config.storage.output_dir.display());
    info!("📝 Output format: {:?}", config.output.format);

    let config = Arc::new(config);
    let pipeline = Arc::new(Pipeline::new(Arc::clone(&config))?);

    let port = config.server.port;
    ApiServer::new(pipeline, config, port).start().await
}
