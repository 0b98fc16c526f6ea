// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLO region detector
//!
//! Runs an Ultralytics YOLO export (`[1, 3, 640, 640]` in, `[1, 4 + C, N]` out)
//! on CPU and decodes the raw predictions into labelled regions.

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::{ArrayView3, Ix3};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::preprocessing::{preprocess_for_detection, LetterboxInfo};
use super::{BoundingBox, DetectedRegion, RegionDetector, RegionLabel};
use crate::extraction::EngineError;

/// Default minimum class score
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Default IoU above which same-class boxes are suppressed
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.7;

/// Upper bound on regions kept per image
const MAX_DETECTIONS: usize = 300;

/// Raw prediction in source-image coordinates
#[derive(Debug, Clone)]
struct Prediction {
    class_id: usize,
    score: f32,
    bbox: BoundingBox,
}

/// YOLO detector for one surface's label set
pub struct YoloDetector<L: RegionLabel> {
    /// ONNX Runtime session (serialized across callers)
    session: Arc<Mutex<Session>>,
    input_name: String,
    /// Model class index -> label, `None` for classes this crate does not know
    class_labels: Vec<Option<L>>,
    confidence_threshold: f32,
    iou_threshold: f32,
}

impl<L: RegionLabel> std::fmt::Debug for YoloDetector<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("input_name", &self.input_name)
            .field("class_labels", &self.class_labels)
            .field("confidence_threshold", &self.confidence_threshold)
            .field("iou_threshold", &self.iou_threshold)
            .finish_non_exhaustive()
    }
}

impl<L: RegionLabel> YoloDetector<L> {
    /// Load a detector model
    ///
    /// `class_names` must list the model's classes in index order.
    pub fn new<P: AsRef<Path>>(model_path: P, class_names: &[String]) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Detector model not found: {}", model_path.display());
        }

        info!("Loading region detector from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load detector model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        let class_labels: Vec<Option<L>> = class_names
            .iter()
            .map(|name| L::from_class_name(name))
            .collect();

        debug!(
            "Detector loaded - input: {}, classes: {:?}",
            input_name, class_labels
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            class_labels,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        })
    }

    pub fn with_thresholds(mut self, confidence: f32, iou: f32) -> Self {
        self.confidence_threshold = confidence.clamp(0.0, 1.0);
        self.iou_threshold = iou.clamp(0.0, 1.0);
        self
    }

    fn run(&self, image: &DynamicImage) -> Result<Vec<Prediction>, EngineError> {
        let (input, letterbox) = preprocess_for_detection(image);

        let input_value = Value::from_array(input)
            .map_err(|e| EngineError::Detector(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| EngineError::Detector("detector session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .map_err(|e| EngineError::Detector(format!("Detection inference failed: {}", e)))?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| EngineError::Detector(format!("Failed to extract output tensor: {}", e)))?;

        let output = output.into_dimensionality::<Ix3>().map_err(|e| {
            EngineError::Detector(format!("Unexpected detector output shape: {}", e))
        })?;

        Ok(decode_predictions(
            output,
            &letterbox,
            self.confidence_threshold,
        ))
    }
}

impl<L: RegionLabel> RegionDetector<L> for YoloDetector<L> {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<DetectedRegion<L>>, EngineError> {
        let predictions = self.run(image)?;
        let kept = non_max_suppression(predictions, self.iou_threshold);

        let regions: Vec<DetectedRegion<L>> = kept
            .into_iter()
            .filter_map(|p| {
                let label = self.class_labels.get(p.class_id).copied().flatten();
                if label.is_none() {
                    debug!(class_id = p.class_id, "Dropping region with unknown class");
                }
                label.map(|label| DetectedRegion::new(label, p.bbox))
            })
            .collect();

        debug!(regions = regions.len(), "Region detection complete");
        Ok(regions)
    }
}

/// Decode `[1, 4 + C, N]` raw output into thresholded predictions
fn decode_predictions(
    output: ArrayView3<f32>,
    letterbox: &LetterboxInfo,
    confidence_threshold: f32,
) -> Vec<Prediction> {
    let channels = output.shape()[1];
    let anchors = output.shape()[2];
    if channels <= 4 {
        return Vec::new();
    }

    let mut predictions = Vec::new();
    for i in 0..anchors {
        let (class_id, score) = (4..channels)
            .map(|c| (c - 4, output[[0, c, i]]))
            .fold((0, f32::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });

        if score < confidence_threshold {
            continue;
        }

        let bbox = letterbox.map_box(
            output[[0, 0, i]],
            output[[0, 1, i]],
            output[[0, 2, i]],
            output[[0, 3, i]],
        );

        predictions.push(Prediction {
            class_id,
            score,
            bbox,
        });
    }

    predictions
}

fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let ix1 = a.x1.max(b.x1);
    let iy1 = a.y1.max(b.y1);
    let ix2 = a.x2.min(b.x2);
    let iy2 = a.y2.min(b.y2);

    let intersection = BoundingBox::new(ix1, iy1, ix2, iy2).area() as f32;
    let union = a.area() as f32 + b.area() as f32 - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}

/// Class-aware greedy NMS; output is ordered by descending score
fn non_max_suppression(mut predictions: Vec<Prediction>, iou_threshold: f32) -> Vec<Prediction> {
    predictions.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Prediction> = Vec::new();
    for candidate in predictions {
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && iou(&k.bbox, &candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
            if kept.len() == MAX_DETECTIONS {
                break;
            }
        }
    }
    kept
}
