// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deterministic stand-ins for every engine capability
#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use social_capture_extract::extraction::{EngineError, ExtractionEngines};
use social_capture_extract::language::{
    LanguageCode, RankedLanguageDetector, ShortTextLanguageDetector,
};
use social_capture_extract::vision::{
    BoundingBox, DetectedRegion, OcrEngine, OcrLanguages, PostLabel, ProfileLabel, RegionDetector,
    RegionLabel,
};

/// Blank PNG screenshot as base64
pub fn screenshot_base64(width: u32, height: u32) -> String {
    let image = DynamicImage::new_rgb8(width, height);
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    STANDARD.encode(bytes)
}

pub fn region<L: RegionLabel>(label: L, x1: u32, y1: u32, x2: u32, y2: u32) -> DetectedRegion<L> {
    DetectedRegion::new(label, BoundingBox::new(x1, y1, x2, y2))
}

/// Tracks how many detector calls overlap
#[derive(Default)]
pub struct Concurrency {
    current: AtomicUsize,
    pub peak: AtomicUsize,
}

impl Concurrency {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Returns a fixed region list, optionally after a delay
pub struct FixedDetector<L: RegionLabel> {
    regions: Vec<DetectedRegion<L>>,
    delay: Duration,
    concurrency: Arc<Concurrency>,
    fail: bool,
}

impl<L: RegionLabel> FixedDetector<L> {
    pub fn new(regions: Vec<DetectedRegion<L>>) -> Self {
        Self {
            regions,
            delay: Duration::ZERO,
            concurrency: Arc::new(Concurrency::default()),
            fail: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    pub fn with_delay(mut self, delay: Duration, concurrency: Arc<Concurrency>) -> Self {
        self.delay = delay;
        self.concurrency = concurrency;
        self
    }
}

impl<L: RegionLabel> RegionDetector<L> for FixedDetector<L> {
    fn detect(&self, _image: &DynamicImage) -> Result<Vec<DetectedRegion<L>>, EngineError> {
        if self.fail {
            return Err(EngineError::Detector("model crashed".to_string()));
        }
        self.concurrency.enter();
        std::thread::sleep(self.delay);
        self.concurrency.exit();
        Ok(self.regions.clone())
    }
}

/// Panics on every call
pub struct PanickingDetector;

impl RegionDetector<ProfileLabel> for PanickingDetector {
    fn detect(&self, _image: &DynamicImage) -> Result<Vec<DetectedRegion<ProfileLabel>>, EngineError> {
        panic!("detector blew up");
    }
}

/// OCR answers keyed by crop size, separately for each pass
#[derive(Default)]
pub struct ScriptedOcr {
    first_pass: HashMap<(u32, u32), String>,
    refined: HashMap<(u32, u32), String>,
    pub calls: Mutex<Vec<((u32, u32), OcrLanguages)>>,
}

impl ScriptedOcr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_pass(mut self, size: (u32, u32), text: &str) -> Self {
        self.first_pass.insert(size, text.to_string());
        self
    }

    pub fn refined(mut self, size: (u32, u32), text: &str) -> Self {
        self.refined.insert(size, text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<((u32, u32), OcrLanguages)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn refined_calls(&self) -> Vec<((u32, u32), OcrLanguages)> {
        self.calls()
            .into_iter()
            .filter(|(_, languages)| *languages != OcrLanguages::Common)
            .collect()
    }
}

impl OcrEngine for ScriptedOcr {
    fn recognize(&self, image: &GrayImage, languages: &OcrLanguages) -> Result<String, EngineError> {
        let size = image.dimensions();
        self.calls.lock().unwrap().push((size, *languages));
        let answers = match languages {
            OcrLanguages::Common => &self.first_pass,
            OcrLanguages::Single(_) => &self.refined,
        };
        Ok(answers.get(&size).cloned().unwrap_or_default())
    }
}

/// Both language tiers with fixed answers
pub struct FixedLanguage {
    pub short: Option<LanguageCode>,
    pub ranked: Vec<&'static str>,
}

impl FixedLanguage {
    pub fn short(code: LanguageCode) -> Self {
        Self {
            short: Some(code),
            ranked: Vec::new(),
        }
    }
}

impl ShortTextLanguageDetector for FixedLanguage {
    fn detect(&self, _text: &str) -> Result<Option<LanguageCode>, EngineError> {
        Ok(self.short)
    }
}

impl RankedLanguageDetector for FixedLanguage {
    fn rank(&self, _text: &str) -> Result<Vec<String>, EngineError> {
        Ok(self.ranked.iter().map(|label| label.to_string()).collect())
    }
}

pub fn engines(
    profile: Arc<dyn RegionDetector<ProfileLabel>>,
    post: Arc<dyn RegionDetector<PostLabel>>,
    ocr: Arc<ScriptedOcr>,
    language: FixedLanguage,
) -> ExtractionEngines {
    let language = Arc::new(language);
    ExtractionEngines::new(profile, post, ocr, language.clone(), language)
}
