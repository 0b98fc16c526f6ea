// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Two-tier language cascade

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use super::{LanguageCode, RankedLanguageDetector, ShortTextLanguageDetector};
use crate::extraction::EngineError;

/// Texts up to this many characters go to the short-text tier
pub const DEFAULT_SHORT_TEXT_MAX_CHARS: usize = 50;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Flatten text for language analysis: single spaces, lower case, trimmed
pub fn denoise_for_language_analysis(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(text, " ")
        .trim()
        .to_lowercase()
}

/// `__label__fra_Latn` -> `fra`
fn code_from_label(label: &str) -> &str {
    let label = label.trim();
    let label = label.strip_prefix("__label__").unwrap_or(label);
    label.split('_').next().unwrap_or(label)
}

/// Picks the language used for the refined OCR pass
#[derive(Clone)]
pub struct LanguageCascade {
    short: Arc<dyn ShortTextLanguageDetector>,
    ranked: Arc<dyn RankedLanguageDetector>,
    short_text_max_chars: usize,
}

impl LanguageCascade {
    pub fn new(
        short: Arc<dyn ShortTextLanguageDetector>,
        ranked: Arc<dyn RankedLanguageDetector>,
    ) -> Self {
        Self {
            short,
            ranked,
            short_text_max_chars: DEFAULT_SHORT_TEXT_MAX_CHARS,
        }
    }

    pub fn with_short_text_max_chars(mut self, max_chars: usize) -> Self {
        self.short_text_max_chars = max_chars;
        self
    }

    /// Detect the language of `text`
    ///
    /// Misses fall back to English; only engine failures are errors.
    pub fn detect_language(&self, text: &str) -> Result<LanguageCode, EngineError> {
        let analysed = denoise_for_language_analysis(text);
        let length = analysed.chars().count();

        if length <= self.short_text_max_chars {
            let detected = self.short.detect(&analysed)?;
            debug!(length, ?detected, "Short-text language tier");
            return Ok(detected.unwrap_or(LanguageCode::DEFAULT));
        }

        let ranked = self.ranked.rank(&analysed)?;
        let detected = ranked
            .iter()
            .find_map(|label| code_from_label(label).parse::<LanguageCode>().ok());
        debug!(length, ?detected, candidates = ranked.len(), "Ranked language tier");

        Ok(detected.unwrap_or(LanguageCode::DEFAULT))
    }
}
