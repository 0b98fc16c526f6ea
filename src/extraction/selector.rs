// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Region selection
//!
//! Picks, per label, the region(s) whose text is worth extracting:
//! - photo: strictly largest box area
//! - singular text labels: longest trimmed first-pass OCR text
//! - repeatable labels: every region
//!
//! Ties keep the region that came first in detector order.

use image::{DynamicImage, GrayImage};
use std::collections::HashMap;
use tracing::debug;

use super::EngineError;
use crate::vision::{
    crop_grayscale, BoundingBox, DetectedRegion, LabelRole, RawTextExtractor, RegionLabel,
};

/// A singular-label region competing for its label
#[derive(Debug, Clone)]
pub struct ScoredCandidate<L: RegionLabel> {
    pub label: L,
    pub bbox: BoundingBox,
    pub raw_text: String,
    pub text_length: usize,
}

/// A selected region and its text, ready for refinement and field parsing
#[derive(Debug, Clone)]
pub struct LabeledRegionText<L: RegionLabel> {
    pub label: L,
    pub bbox: BoundingBox,
    /// Grayscale crop; empty when the box lies outside the image
    pub crop: GrayImage,
    pub raw_text: String,
    pub refined_text: Option<String>,
}

impl<L: RegionLabel> From<(ScoredCandidate<L>, GrayImage)> for LabeledRegionText<L> {
    fn from((candidate, crop): (ScoredCandidate<L>, GrayImage)) -> Self {
        Self {
            label: candidate.label,
            bbox: candidate.bbox,
            crop,
            raw_text: candidate.raw_text,
            refined_text: None,
        }
    }
}

impl<L: RegionLabel> LabeledRegionText<L> {
    /// Refined text once the second pass ran, otherwise the first-pass text
    pub fn best_text(&self) -> &str {
        self.refined_text.as_deref().unwrap_or(&self.raw_text)
    }
}

/// Winners of one selection run
#[derive(Debug, Clone)]
pub struct RegionSelection<L: RegionLabel> {
    pub photo: Option<BoundingBox>,
    pub singles: HashMap<L, LabeledRegionText<L>>,
    pub repeated: Vec<LabeledRegionText<L>>,
}

impl<L: RegionLabel> RegionSelection<L> {
    /// First-pass text of the winner for `label`
    pub fn text(&self, label: L) -> Option<&str> {
        self.singles.get(&label).map(|region| region.raw_text.as_str())
    }

    pub fn take(&mut self, label: L) -> Option<LabeledRegionText<L>> {
        self.singles.remove(&label)
    }
}

fn crop_or_empty(image: &DynamicImage, bbox: &BoundingBox) -> GrayImage {
    crop_grayscale(image, bbox).unwrap_or_else(|| GrayImage::new(0, 0))
}

/// Select regions and read their first-pass text
///
/// `prepare` turns the raw OCR text of a text region into the text that
/// is scored and carried forward (e.g. normalized descriptions).
pub fn select_regions<L, F>(
    regions: &[DetectedRegion<L>],
    image: &DynamicImage,
    raw: &RawTextExtractor,
    prepare: F,
) -> Result<RegionSelection<L>, EngineError>
where
    L: RegionLabel,
    F: Fn(L, String) -> String,
{
    let mut photo: Option<(BoundingBox, u64)> = None;
    let mut best: HashMap<L, (ScoredCandidate<L>, GrayImage)> = HashMap::new();
    let mut repeated = Vec::new();

    for region in regions {
        match region.label.role() {
            LabelRole::Photo => {
                let area = region.bbox.area();
                if area > photo.map_or(0, |(_, best_area)| best_area) {
                    photo = Some((region.bbox, area));
                }
            }
            LabelRole::SingularText => {
                let crop = crop_or_empty(image, &region.bbox);
                let raw_text = prepare(region.label, raw.extract(&crop)?);
                let text_length = raw_text.trim().chars().count();

                let wins = best
                    .get(&region.label)
                    .map_or(true, |(current, _)| text_length > current.text_length);
                if wins {
                    let candidate = ScoredCandidate {
                        label: region.label,
                        bbox: region.bbox,
                        raw_text,
                        text_length,
                    };
                    best.insert(region.label, (candidate, crop));
                }
            }
            LabelRole::Repeatable => {
                let crop = crop_or_empty(image, &region.bbox);
                let raw_text = prepare(region.label, raw.extract(&crop)?);
                repeated.push(LabeledRegionText {
                    label: region.label,
                    bbox: region.bbox,
                    crop,
                    raw_text,
                    refined_text: None,
                });
            }
            LabelRole::Ignored => {}
        }
    }

    for (label, (candidate, _)) in &best {
        debug!(
            label = label.as_str(),
            text_length = candidate.text_length,
            "Selected region"
        );
    }

    Ok(RegionSelection {
        photo: photo.map(|(bbox, _)| bbox),
        singles: best
            .into_iter()
            .map(|(label, winner)| (label, LabeledRegionText::from(winner)))
            .collect(),
        repeated,
    })
}
