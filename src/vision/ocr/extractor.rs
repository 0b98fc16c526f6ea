// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The two OCR stages
//!
//! The raw pass reads every candidate region with the common language set
//! and drives region selection. The refined pass re-reads a selected
//! `description`/`comment` crop locked to the language detected from the
//! raw text. Other labels never reach the refined pass.

use image::GrayImage;
use std::sync::Arc;
use tracing::debug;

use super::{OcrEngine, OcrLanguages};
use crate::extraction::EngineError;
use crate::language::{LanguageCascade, LanguageCode};
use crate::text::drop_first_token;

/// First OCR pass (multi-language)
#[derive(Clone)]
pub struct RawTextExtractor {
    engine: Arc<dyn OcrEngine>,
}

impl RawTextExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    pub fn extract(&self, crop: &GrayImage) -> Result<String, EngineError> {
        if crop.width() == 0 || crop.height() == 0 {
            return Ok(String::new());
        }
        self.engine.recognize(crop, &OcrLanguages::Common)
    }
}

/// Output of the refined pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinedText {
    pub language: LanguageCode,
    pub text: String,
}

/// Second OCR pass (locked to the detected language)
#[derive(Clone)]
pub struct RefinedTextExtractor {
    engine: Arc<dyn OcrEngine>,
    cascade: LanguageCascade,
}

impl RefinedTextExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>, cascade: LanguageCascade) -> Self {
        Self { engine, cascade }
    }

    /// Re-read `crop` in the language of `first_pass`
    ///
    /// The first token of `first_pass` is the author's handle and is left out
    /// of language detection. Returns `None` when nothing else is left.
    pub fn refine(
        &self,
        crop: &GrayImage,
        first_pass: &str,
    ) -> Result<Option<RefinedText>, EngineError> {
        let body = drop_first_token(first_pass);
        if body.is_empty() {
            return Ok(None);
        }

        let language = self.cascade.detect_language(&body)?;
        debug!(%language, "Refining OCR with detected language");

        let text = self.engine.recognize(crop, &OcrLanguages::Single(language))?;
        Ok(Some(RefinedText { language, text }))
    }
}
