// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for screenshot extraction

use thiserror::Error;

use crate::vision::ImageError;

/// Failure of one of the heavyweight engines (detector, OCR, language ID)
#[derive(Debug, Error)]
pub enum EngineError {
    /// Object detector failed
    #[error("Region detector failed: {0}")]
    Detector(String),

    /// OCR engine failed
    #[error("OCR engine failed: {0}")]
    Ocr(String),

    /// A language identification model failed
    #[error("Language identification failed: {0}")]
    LanguageId(String),

    /// The extraction did not finish in time
    #[error("Extraction timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured per-call timeout in milliseconds
        timeout_ms: u64,
    },

    /// The blocking worker running the extraction panicked or was shut down
    #[error("Extraction worker crashed: {0}")]
    WorkerCrashed(String),
}

/// Errors surfaced by the extraction pipelines
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The submitted image could not be decoded (client error, not retried)
    #[error("Invalid image input: {0}")]
    InvalidImage(#[from] ImageError),

    /// An engine failed (service error)
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The cropped photo could not be re-encoded
    #[error("Failed to encode photo: {0}")]
    PhotoEncoding(#[source] ImageError),
}

impl ExtractionError {
    /// Whether the caller sent bad input (maps to a 4xx at the HTTP edge)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractionError::InvalidImage(_))
    }
}
