// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Screenshot extraction pipelines
//!
//! One invocation runs, in order:
//! detect -> select regions -> OCR pass 1 -> (language cascade -> OCR pass 2) -> normalize -> parse fields
//!
//! The refined pass only runs for descriptions and comments. Missing
//! fields degrade to their sentinels; only an undecodable image or an
//! engine failure is an error.

pub mod engines;
pub mod error;
pub mod post;
pub mod profile;
pub mod selector;
pub mod service;
pub mod types;

use image::DynamicImage;

use crate::vision::{crop_region, encode_jpeg, BoundingBox};

pub use engines::ExtractionEngines;
pub use error::{EngineError, ExtractionError};
pub use post::PostExtractor;
pub use profile::ProfileExtractor;
pub use selector::{select_regions, LabeledRegionText, RegionSelection, ScoredCandidate};
pub use service::ExtractionService;
pub use types::{PostExtractionResult, ProfileExtractionResult, UNDETECTED_COUNT};

/// Crop the selected photo box and re-encode it as JPEG
fn encode_photo(
    image: &DynamicImage,
    bbox: Option<BoundingBox>,
) -> Result<Option<Vec<u8>>, ExtractionError> {
    bbox.and_then(|bbox| crop_region(image, &bbox))
        .map(|crop| encode_jpeg(&crop).map_err(ExtractionError::PhotoEncoding))
        .transpose()
}
