// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for screenshot extraction
//!
//! This module provides:
//! - Image decoding, cropping and photo encoding
//! - Region detection via YOLO-format ONNX models
//! - OCR over detected regions via Tesseract
//!
//! Everything runs on CPU.

pub mod detection;
pub mod image_utils;
pub mod ocr;

pub use detection::{
    BoundingBox, DetectedRegion, LabelRole, PostLabel, ProfileLabel, RegionDetector, RegionLabel,
    YoloDetector,
};
pub use image_utils::{
    crop_grayscale, crop_region, decode_base64_image, decode_image_bytes, detect_format,
    encode_jpeg, jpeg_data_uri, ImageError,
};
pub use ocr::{
    OcrEngine, OcrLanguages, RawTextExtractor, RefinedText, RefinedTextExtractor, TesseractCli,
};
