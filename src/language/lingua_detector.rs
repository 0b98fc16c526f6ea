// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! lingua-backed language detection
//!
//! lingua is accurate on short and mixed-language text, so it serves the
//! short-text tier. It is also the default ranked tier, which means long
//! text is ranked by the same model over the same seven languages, not by
//! a broad many-language model. Its ranking never contains a language
//! outside the allow-list, so the cascade's allow-list filter and `eng`
//! fallback only matter for a broad [`RankedLanguageDetector`] plugged in
//! through `ExtractionEngines::new`.

use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use tracing::info;

use super::{LanguageCode, RankedLanguageDetector, ShortTextLanguageDetector};
use crate::extraction::EngineError;

fn to_lingua(code: LanguageCode) -> Language {
    match code {
        LanguageCode::Eng => Language::English,
        LanguageCode::Fra => Language::French,
        LanguageCode::Spa => Language::Spanish,
        LanguageCode::Deu => Language::German,
        LanguageCode::Ita => Language::Italian,
        LanguageCode::Ron => Language::Romanian,
        LanguageCode::Por => Language::Portuguese,
    }
}

#[allow(unreachable_patterns)]
fn from_lingua(language: Language) -> Option<LanguageCode> {
    match language {
        Language::English => Some(LanguageCode::Eng),
        Language::French => Some(LanguageCode::Fra),
        Language::Spanish => Some(LanguageCode::Spa),
        Language::German => Some(LanguageCode::Deu),
        Language::Italian => Some(LanguageCode::Ita),
        Language::Romanian => Some(LanguageCode::Ron),
        Language::Portuguese => Some(LanguageCode::Por),
        _ => None,
    }
}

/// lingua detector over the supported languages
///
/// Serves both language tiers. As the ranked tier it only ranks the seven
/// supported languages.
pub struct LinguaDetector {
    detector: LanguageDetector,
}

impl LinguaDetector {
    /// Build the detector with language models preloaded
    pub fn new() -> Self {
        let languages: Vec<Language> = LanguageCode::ALL.into_iter().map(to_lingua).collect();
        let detector = LanguageDetectorBuilder::from_languages(&languages)
            .with_preloaded_language_models()
            .build();
        info!("✅ lingua language detector ready ({} languages)", languages.len());
        Self { detector }
    }
}

impl Default for LinguaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortTextLanguageDetector for LinguaDetector {
    fn detect(&self, text: &str) -> Result<Option<LanguageCode>, EngineError> {
        Ok(self.detector.detect_language_of(text).and_then(from_lingua))
    }
}

impl RankedLanguageDetector for LinguaDetector {
    fn rank(&self, text: &str) -> Result<Vec<String>, EngineError> {
        Ok(self
            .detector
            .compute_language_confidence_values(text)
            .into_iter()
            .filter_map(|(language, _)| from_lingua(language))
            .map(|code| code.as_str().to_string())
            .collect())
    }
}
