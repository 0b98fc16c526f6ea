// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Profile screenshot pipeline

use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::selector::{select_regions, LabeledRegionText, RegionSelection};
use super::types::{ProfileExtractionResult, UNDETECTED_COUNT};
use super::{encode_photo, ExtractionError};
use crate::parsing::parse_number;
use crate::text::{is_followed_by_banner, normalize};
use crate::vision::{
    decode_base64_image, ProfileLabel, RawTextExtractor, RefinedTextExtractor, RegionDetector,
};

/// Normalized description, or empty when it is really the "Followed by" banner
fn clean_description(text: &str) -> String {
    let text = normalize(text);
    if is_followed_by_banner(&text) {
        String::new()
    } else {
        text
    }
}

fn scoring_text(label: ProfileLabel, raw_text: String) -> String {
    match label {
        ProfileLabel::Description => clean_description(&raw_text),
        _ => raw_text,
    }
}

fn count(selection: &RegionSelection<ProfileLabel>, label: ProfileLabel) -> i64 {
    let Some(text) = selection.text(label) else {
        return UNDETECTED_COUNT;
    };
    parse_number(text).unwrap_or_else(|| {
        debug!(label = ?label, text, "Unparsable counter");
        UNDETECTED_COUNT
    })
}

/// Extracts profile fields from a screenshot
#[derive(Clone)]
pub struct ProfileExtractor {
    detector: Arc<dyn RegionDetector<ProfileLabel>>,
    raw: RawTextExtractor,
    refined: RefinedTextExtractor,
}

impl ProfileExtractor {
    pub fn new(
        detector: Arc<dyn RegionDetector<ProfileLabel>>,
        raw: RawTextExtractor,
        refined: RefinedTextExtractor,
    ) -> Self {
        Self {
            detector,
            raw,
            refined,
        }
    }

    /// Extract from a base64 image (optionally a data URI)
    pub fn extract(&self, image_base64: &str) -> Result<ProfileExtractionResult, ExtractionError> {
        let image = decode_base64_image(image_base64)?;
        self.extract_image(&image)
    }

    pub fn extract_image(
        &self,
        image: &DynamicImage,
    ) -> Result<ProfileExtractionResult, ExtractionError> {
        let start = Instant::now();

        let regions = self.detector.detect(image)?;
        debug!(regions = regions.len(), "Profile regions detected");

        let mut selection = select_regions(&regions, image, &self.raw, scoring_text)?;

        let description = match selection.take(ProfileLabel::Description) {
            Some(region) => self.refine_description(region)?,
            None => String::new(),
        };

        let result = ProfileExtractionResult {
            photo: encode_photo(image, selection.photo)?,
            username: selection
                .text(ProfileLabel::Username)
                .map(|text| text.trim().to_string())
                .unwrap_or_default(),
            description,
            followers: count(&selection, ProfileLabel::Followers),
            following: count(&selection, ProfileLabel::Following),
            posts: count(&selection, ProfileLabel::Posts),
        };

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            has_photo = result.photo.is_some(),
            "Profile extraction complete"
        );
        Ok(result)
    }

    fn refine_description(
        &self,
        mut region: LabeledRegionText<ProfileLabel>,
    ) -> Result<String, ExtractionError> {
        let Some(refined) = self.refined.refine(&region.crop, &region.raw_text)? else {
            return Ok(String::new());
        };
        debug!(language = %refined.language, "Profile description refined");
        region.refined_text = Some(clean_description(&refined.text));
        Ok(region.best_text().to_string())
    }
}
