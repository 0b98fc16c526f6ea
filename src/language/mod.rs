// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Language identification for OCR refinement
//!
//! Two capability tiers feed a cascade:
//! - a short-text detector restricted to the supported languages
//! - a broad detector returning a ranked list of language labels
//!
//! The cascade picks the tier by text length and always settles on one
//! of the seven languages the OCR engine is run with.

pub mod cascade;
#[cfg(feature = "lingua")]
pub mod lingua_detector;

use std::fmt;
use std::str::FromStr;

use crate::extraction::EngineError;

pub use cascade::{denoise_for_language_analysis, LanguageCascade, DEFAULT_SHORT_TEXT_MAX_CHARS};
#[cfg(feature = "lingua")]
pub use lingua_detector::LinguaDetector;

/// ISO 639-3 codes of the supported languages (also Tesseract language names)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageCode {
    Eng,
    Fra,
    Spa,
    Deu,
    Ita,
    Ron,
    Por,
}

impl LanguageCode {
    /// The common language set, in the order handed to the OCR engine
    pub const ALL: [LanguageCode; 7] = [
        LanguageCode::Eng,
        LanguageCode::Fra,
        LanguageCode::Spa,
        LanguageCode::Deu,
        LanguageCode::Ita,
        LanguageCode::Ron,
        LanguageCode::Por,
    ];

    /// Fallback when no tier is confident
    pub const DEFAULT: LanguageCode = LanguageCode::Eng;

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::Eng => "eng",
            LanguageCode::Fra => "fra",
            LanguageCode::Spa => "spa",
            LanguageCode::Deu => "deu",
            LanguageCode::Ita => "ita",
            LanguageCode::Ron => "ron",
            LanguageCode::Por => "por",
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported language code '{}'", s))
    }
}

/// Detector specialised for short or mixed text
pub trait ShortTextLanguageDetector: Send + Sync {
    /// Most likely supported language, or `None` when not confident
    fn detect(&self, text: &str) -> Result<Option<LanguageCode>, EngineError>;
}

/// Broad detector ranking every language it knows
pub trait RankedLanguageDetector: Send + Sync {
    /// Language labels, most likely first
    ///
    /// Labels may carry a `__label__` prefix and a `_Script` suffix
    /// (`__label__fra_Latn`).
    fn rank(&self, text: &str) -> Result<Vec<String>, EngineError>;
}
