// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Heavyweight engines, loaded once and shared by every extraction

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use super::{PostExtractor, ProfileExtractor};
use crate::config::ExtractionConfig;
use crate::language::{
    LanguageCascade, RankedLanguageDetector, ShortTextLanguageDetector,
    DEFAULT_SHORT_TEXT_MAX_CHARS,
};
use crate::vision::{
    OcrEngine, PostLabel, ProfileLabel, RawTextExtractor, RefinedTextExtractor, RegionDetector,
    TesseractCli, YoloDetector,
};

/// The injected capabilities behind both pipelines
#[derive(Clone)]
pub struct ExtractionEngines {
    pub profile_detector: Arc<dyn RegionDetector<ProfileLabel>>,
    pub post_detector: Arc<dyn RegionDetector<PostLabel>>,
    pub ocr: Arc<dyn OcrEngine>,
    pub short_language: Arc<dyn ShortTextLanguageDetector>,
    pub ranked_language: Arc<dyn RankedLanguageDetector>,
    pub short_text_max_chars: usize,
}

impl ExtractionEngines {
    pub fn new(
        profile_detector: Arc<dyn RegionDetector<ProfileLabel>>,
        post_detector: Arc<dyn RegionDetector<PostLabel>>,
        ocr: Arc<dyn OcrEngine>,
        short_language: Arc<dyn ShortTextLanguageDetector>,
        ranked_language: Arc<dyn RankedLanguageDetector>,
    ) -> Self {
        Self {
            profile_detector,
            post_detector,
            ocr,
            short_language,
            ranked_language,
            short_text_max_chars: DEFAULT_SHORT_TEXT_MAX_CHARS,
        }
    }

    /// Load detector models and OCR/language engines from configuration
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let profile_detector =
            YoloDetector::<ProfileLabel>::new(&config.profile_model_path, &config.profile_model_classes)
                .context("Failed to load profile detector")?
                .with_thresholds(config.detection_confidence, config.detection_iou);
        let post_detector =
            YoloDetector::<PostLabel>::new(&config.post_model_path, &config.post_model_classes)
                .context("Failed to load post detector")?
                .with_thresholds(config.detection_confidence, config.detection_iou);

        let ocr = TesseractCli::new(&config.tesseract_binary)
            .with_tessdata_dir(config.tessdata_dir.clone())
            .with_psm(config.tesseract_psm)
            .with_timeout(Some(config.extraction_timeout()));

        let (short_language, ranked_language) = Self::language_detectors()?;

        info!("✅ Extraction engines loaded");

        Ok(Self {
            profile_detector: Arc::new(profile_detector),
            post_detector: Arc::new(post_detector),
            ocr: Arc::new(ocr),
            short_language,
            ranked_language,
            short_text_max_chars: config.short_text_max_chars,
        })
    }

    #[cfg(feature = "lingua")]
    fn language_detectors() -> Result<(
        Arc<dyn ShortTextLanguageDetector>,
        Arc<dyn RankedLanguageDetector>,
    )> {
        let lingua = Arc::new(crate::language::LinguaDetector::new());
        let short: Arc<dyn ShortTextLanguageDetector> = lingua.clone();
        let ranked: Arc<dyn RankedLanguageDetector> = lingua;
        Ok((short, ranked))
    }

    #[cfg(not(feature = "lingua"))]
    fn language_detectors() -> Result<(
        Arc<dyn ShortTextLanguageDetector>,
        Arc<dyn RankedLanguageDetector>,
    )> {
        anyhow::bail!("No language detector available: build with the `lingua` feature")
    }

    pub fn cascade(&self) -> LanguageCascade {
        LanguageCascade::new(self.short_language.clone(), self.ranked_language.clone())
            .with_short_text_max_chars(self.short_text_max_chars)
    }

    pub fn raw_extractor(&self) -> RawTextExtractor {
        RawTextExtractor::new(self.ocr.clone())
    }

    pub fn refined_extractor(&self) -> RefinedTextExtractor {
        RefinedTextExtractor::new(self.ocr.clone(), self.cascade())
    }

    pub fn profile_extractor(&self) -> ProfileExtractor {
        ProfileExtractor::new(
            self.profile_detector.clone(),
            self.raw_extractor(),
            self.refined_extractor(),
        )
    }

    pub fn post_extractor(&self) -> PostExtractor {
        PostExtractor::new(
            self.post_detector.clone(),
            self.raw_extractor(),
            self.refined_extractor(),
        )
    }
}
