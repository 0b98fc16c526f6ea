// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Region detection for profile and post screenshots
//!
//! Components:
//! - `labels` - closed label taxonomies for the profile and post surfaces
//! - `preprocessing` - letterboxing of screenshots for the detector input
//! - `yolo` - YOLO ONNX detector run through ONNX Runtime

pub mod labels;
pub mod preprocessing;
pub mod yolo;

use image::DynamicImage;

use crate::extraction::EngineError;

pub use labels::{LabelRole, PostLabel, ProfileLabel, RegionLabel};
pub use yolo::YoloDetector;

/// Axis-aligned box in source-image pixel coordinates (`x1,y1` inclusive, `x2,y2` exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// `(x2 - x1) * (y2 - y1)`, zero for degenerate boxes
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }
}

/// One labelled box reported by the detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedRegion<L: RegionLabel> {
    pub label: L,
    pub bbox: BoundingBox,
}

impl<L: RegionLabel> DetectedRegion<L> {
    pub fn new(label: L, bbox: BoundingBox) -> Self {
        Self { label, bbox }
    }
}

/// Object detector capability for one screenshot surface
///
/// Implementations must return regions in a stable order; selection
/// tie-breaks keep the first region encountered.
pub trait RegionDetector<L: RegionLabel>: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<DetectedRegion<L>>, EngineError>;
}
