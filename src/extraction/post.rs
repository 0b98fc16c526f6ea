// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Post screenshot pipeline

use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::selector::{select_regions, LabeledRegionText};
use super::types::{PostExtractionResult, UNDETECTED_COUNT};
use super::{encode_photo, ExtractionError};
use crate::parsing::{parse_date, parse_number};
use crate::text::{normalize, strip_leading_token};
use crate::vision::{
    decode_base64_image, PostLabel, RawTextExtractor, RefinedTextExtractor, RegionDetector,
    RegionLabel,
};

fn scoring_text(label: PostLabel, raw_text: String) -> String {
    match label {
        PostLabel::Description | PostLabel::Comment => normalize(&raw_text),
        _ => raw_text,
    }
}

/// Extracts post fields from a screenshot
#[derive(Clone)]
pub struct PostExtractor {
    detector: Arc<dyn RegionDetector<PostLabel>>,
    raw: RawTextExtractor,
    refined: RefinedTextExtractor,
}

impl PostExtractor {
    pub fn new(
        detector: Arc<dyn RegionDetector<PostLabel>>,
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
    pub fn extract(&self, image_base64: &str) -> Result<PostExtractionResult, ExtractionError> {
        let image = decode_base64_image(image_base64)?;
        self.extract_image(&image)
    }

    pub fn extract_image(&self, image: &DynamicImage) -> Result<PostExtractionResult, ExtractionError> {
        let start = Instant::now();

        let regions = self.detector.detect(image)?;
        debug!(regions = regions.len(), "Post regions detected");

        let mut selection = select_regions(&regions, image, &self.raw, scoring_text)?;

        let description = match selection.take(PostLabel::Description) {
            Some(region) => self.authored_text(region)?.unwrap_or_default(),
            None => String::new(),
        };

        let mut comments = Vec::with_capacity(selection.repeated.len());
        for region in std::mem::take(&mut selection.repeated) {
            if let Some(comment) = self.authored_text(region)? {
                comments.push(comment);
            }
        }

        let likes = match selection.text(PostLabel::Likes) {
            Some(text) => parse_number(text).unwrap_or_else(|| {
                debug!(text, "Unparsable like count");
                UNDETECTED_COUNT
            }),
            None => UNDETECTED_COUNT,
        };

        let result = PostExtractionResult {
            photo: encode_photo(image, selection.photo)?,
            description,
            likes,
            comments_count: UNDETECTED_COUNT,
            date: selection.text(PostLabel::Date).and_then(parse_date),
            comments,
        };

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            comments = result.comments.len(),
            has_photo = result.photo.is_some(),
            "Post extraction complete"
        );
        Ok(result)
    }

    /// Refined text of a description or comment with the author's handle removed
    ///
    /// `None` when nothing but the handle was read.
    fn authored_text(
        &self,
        mut region: LabeledRegionText<PostLabel>,
    ) -> Result<Option<String>, ExtractionError> {
        let Some(refined) = self.refined.refine(&region.crop, &region.raw_text)? else {
            return Ok(None);
        };
        debug!(
            label = region.label.as_str(),
            language = %refined.language,
            "Post text refined"
        );

        region.refined_text = Some(normalize(&refined.text));
        let text = strip_leading_token(region.best_text());
        Ok((!text.trim().is_empty()).then_some(text))
    }
}
