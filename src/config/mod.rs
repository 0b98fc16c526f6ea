// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the extraction engines and service

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::language::DEFAULT_SHORT_TEXT_MAX_CHARS;
use crate::vision::detection::yolo::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_IOU_THRESHOLD};
use crate::vision::ocr::tesseract::DEFAULT_TESSERACT_BINARY;
use crate::vision::{PostLabel, ProfileLabel, RegionLabel};

/// Configuration for screenshot extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// ONNX model of the profile-screenshot detector
    pub profile_model_path: PathBuf,
    /// ONNX model of the post-screenshot detector
    pub post_model_path: PathBuf,
    /// Profile class names in model index order
    pub profile_model_classes: Vec<String>,
    /// Post class names in model index order
    pub post_model_classes: Vec<String>,
    /// Minimum detection confidence
    pub detection_confidence: f32,
    /// IoU threshold for non-maximum suppression
    pub detection_iou: f32,
    /// Tesseract executable
    pub tesseract_binary: PathBuf,
    /// Directory with `*.traineddata` files
    pub tessdata_dir: Option<PathBuf>,
    /// Tesseract page segmentation mode
    pub tesseract_psm: Option<u32>,
    /// Longest text handled by the short-text language tier
    pub short_text_max_chars: usize,
    /// Extractions allowed to run at once
    pub max_concurrent_extractions: usize,
    /// Per-extraction timeout in milliseconds
    pub extraction_timeout_ms: u64,
}

fn class_names<L: RegionLabel>() -> Vec<String> {
    L::DEFAULT_CLASS_NAMES.iter().map(|s| s.to_string()).collect()
}

fn parse_class_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl ExtractionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            profile_model_path: env::var("PROFILE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.profile_model_path),
            post_model_path: env::var("POST_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.post_model_path),
            profile_model_classes: env::var("PROFILE_MODEL_CLASSES")
                .map(|v| parse_class_list(&v))
                .unwrap_or(defaults.profile_model_classes),
            post_model_classes: env::var("POST_MODEL_CLASSES")
                .map(|v| parse_class_list(&v))
                .unwrap_or(defaults.post_model_classes),
            detection_confidence: env_parsed("DETECTION_CONFIDENCE")
                .unwrap_or(defaults.detection_confidence),
            detection_iou: env_parsed("DETECTION_IOU").unwrap_or(defaults.detection_iou),
            tesseract_binary: env::var("TESSERACT_BINARY")
                .map(PathBuf::from)
                .unwrap_or(defaults.tesseract_binary),
            tessdata_dir: env::var("TESSDATA_DIR").ok().map(PathBuf::from),
            tesseract_psm: env_parsed("TESSERACT_PSM"),
            short_text_max_chars: env_parsed("SHORT_TEXT_MAX_CHARS")
                .unwrap_or(defaults.short_text_max_chars),
            max_concurrent_extractions: env_parsed("MAX_CONCURRENT_EXTRACTIONS")
                .unwrap_or(defaults.max_concurrent_extractions),
            extraction_timeout_ms: env_parsed("EXTRACTION_TIMEOUT_MS")
                .unwrap_or(defaults.extraction_timeout_ms),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.detection_confidence) {
            return Err("Detection confidence must be between 0 and 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.detection_iou) {
            return Err("Detection IoU threshold must be between 0 and 1".to_string());
        }
        if self.profile_model_classes.is_empty() || self.post_model_classes.is_empty() {
            return Err("Detector class lists must not be empty".to_string());
        }
        if self.max_concurrent_extractions == 0 {
            return Err("Max concurrent extractions must be greater than 0".to_string());
        }
        if self.extraction_timeout_ms == 0 {
            return Err("Extraction timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_millis(self.extraction_timeout_ms)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            profile_model_path: PathBuf::from("./models/profile_detector.onnx"),
            post_model_path: PathBuf::from("./models/post_detector.onnx"),
            profile_model_classes: class_names::<ProfileLabel>(),
            post_model_classes: class_names::<PostLabel>(),
            detection_confidence: DEFAULT_CONFIDENCE_THRESHOLD,
            detection_iou: DEFAULT_IOU_THRESHOLD,
            tesseract_binary: PathBuf::from(DEFAULT_TESSERACT_BINARY),
            tessdata_dir: None,
            tesseract_psm: None,
            short_text_max_chars: DEFAULT_SHORT_TEXT_MAX_CHARS,
            max_concurrent_extractions: 2,
            extraction_timeout_ms: 60_000,
        }
    }
}
