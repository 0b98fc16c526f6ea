// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::config::ExtractionConfig;
use crate::extraction::ExtractionService;

/// Social screenshot extraction CLI
#[derive(Parser, Debug)]
#[command(name = "capture-extract")]
#[command(version)]
#[command(about = "Extract profile and post fields from social-media screenshots", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub engines: EngineArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract photo, username, description and counters from a profile screenshot
    Profile(ExtractArgs),

    /// Extract photo, description, likes, date and comments from a post screenshot
    Post(ExtractArgs),
}

/// Engine overrides (each falls back to its environment variable)
#[derive(Args, Debug, Default)]
pub struct EngineArgs {
    /// Profile detector ONNX model
    #[arg(long, global = true, env = "PROFILE_MODEL_PATH")]
    pub profile_model: Option<PathBuf>,

    /// Post detector ONNX model
    #[arg(long, global = true, env = "POST_MODEL_PATH")]
    pub post_model: Option<PathBuf>,

    /// Tesseract executable
    #[arg(long, global = true, env = "TESSERACT_BINARY")]
    pub tesseract: Option<PathBuf>,

    /// Tesseract language data directory
    #[arg(long, global = true, env = "TESSDATA_DIR")]
    pub tessdata_dir: Option<PathBuf>,

    /// Minimum detection confidence (0-1)
    #[arg(long, global = true, env = "DETECTION_CONFIDENCE")]
    pub confidence: Option<f32>,

    /// Per-extraction timeout in milliseconds
    #[arg(long, global = true, env = "EXTRACTION_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,
}

impl EngineArgs {
    /// Environment configuration with command-line overrides applied
    pub fn into_config(self) -> ExtractionConfig {
        let mut config = ExtractionConfig::from_env();
        if let Some(path) = self.profile_model {
            config.profile_model_path = path;
        }
        if let Some(path) = self.post_model {
            config.post_model_path = path;
        }
        if let Some(binary) = self.tesseract {
            config.tesseract_binary = binary;
        }
        if self.tessdata_dir.is_some() {
            config.tessdata_dir = self.tessdata_dir;
        }
        if let Some(confidence) = self.confidence {
            config.detection_confidence = confidence;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.extraction_timeout_ms = timeout_ms;
        }
        config
    }
}

/// Arguments shared by both extraction commands
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Screenshot file (PNG, JPEG, WebP, GIF or BMP)
    #[arg(long, conflicts_with = "base64", required_unless_present = "base64")]
    pub image: Option<PathBuf>,

    /// Screenshot as base64 text or a data URI
    #[arg(long)]
    pub base64: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

impl ExtractArgs {
    /// The screenshot as base64 text
    pub fn load_base64(&self) -> Result<String> {
        match (&self.image, &self.base64) {
            (Some(path), _) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("Failed to read image {}", path.display()))?;
                Ok(STANDARD.encode(bytes))
            }
            (None, Some(text)) => Ok(text.trim().to_string()),
            (None, None) => anyhow::bail!("Either --image or --base64 is required"),
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = cli.engines.into_config();
    let service = ExtractionService::from_config(&config)?;
    info!("Extraction service ready");

    match cli.command {
        Commands::Profile(args) => {
            let result = service.extract_profile(args.load_base64()?).await?;
            print_json(&result, args.pretty)
        }
        Commands::Post(args) => {
            let result = service.extract_post(args.load_base64()?).await?;
            print_json(&result, args.pretty)
        }
    }
}
