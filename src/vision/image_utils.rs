// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading, cropping and re-encoding for screenshot extraction

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat};
use thiserror::Error;

use super::detection::BoundingBox;

/// Maximum decoded screenshot size (10MB)
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Format used when re-encoding cropped photos
pub const PHOTO_FORMAT: &str = "jpeg";

/// Errors raised while turning client input into an image
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// Strip an optional `data:image/<fmt>;base64,` prefix
///
/// Everything up to and including the first comma is dropped, so any
/// data-URI header is accepted regardless of the declared format.
pub fn strip_data_uri(input: &str) -> &str {
    match input.split_once(',') {
        Some((_, payload)) => payload,
        None => input,
    }
}

/// Decode a base64 screenshot (optionally a data URI) into an image
pub fn decode_base64_image(input: &str) -> Result<DynamicImage, ImageError> {
    let payload = strip_data_uri(input.trim()).trim();
    if payload.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let bytes = STANDARD.decode(payload)?;
    decode_image_bytes(&bytes)
}

/// Decode raw image bytes (e.g. a file read by the CLI)
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let format = detect_format(bytes)?;

    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF87a / GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        _ => Err(ImageError::UnsupportedFormat),
    }
}

/// Clamp a box to the image bounds, returning `(x, y, width, height)`
///
/// Returns `None` when nothing of the box lies inside the image.
pub fn clamp_to_image(image: &DynamicImage, bbox: &BoundingBox) -> Option<(u32, u32, u32, u32)> {
    let x1 = bbox.x1.min(image.width());
    let y1 = bbox.y1.min(image.height());
    let x2 = bbox.x2.min(image.width());
    let y2 = bbox.y2.min(image.height());

    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    Some((x1, y1, x2 - x1, y2 - y1))
}

/// Crop the colour region covered by `bbox`
pub fn crop_region(image: &DynamicImage, bbox: &BoundingBox) -> Option<DynamicImage> {
    clamp_to_image(image, bbox).map(|(x, y, w, h)| image.crop_imm(x, y, w, h))
}

/// Crop the region covered by `bbox` and convert it to grayscale for OCR
pub fn crop_grayscale(image: &DynamicImage, bbox: &BoundingBox) -> Option<GrayImage> {
    crop_region(image, bbox).map(|crop| crop.to_luma8())
}

/// Encode an image as JPEG bytes
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut bytes = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(bytes)
}

/// Render JPEG bytes as a `data:image/jpeg;base64,...` URI
pub fn jpeg_data_uri(bytes: &[u8]) -> String {
    format!("data:image/{};base64,{}", PHOTO_FORMAT, STANDARD.encode(bytes))
}
