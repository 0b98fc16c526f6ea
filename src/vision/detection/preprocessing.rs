// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Letterbox preprocessing for the YOLO detectors

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

use super::BoundingBox;

/// Square input size the detectors were exported with
pub const DETECTION_INPUT_SIZE: u32 = 640;

/// Gray used for letterbox padding
pub const PAD_VALUE: u8 = 114;

/// Preprocess a screenshot for detection
///
/// Steps:
/// 1. Letterbox to `DETECTION_INPUT_SIZE` (aspect preserved, centred, gray padding)
/// 2. Scale pixels to `[0, 1]`
/// 3. Convert to NCHW tensor `[1, 3, H, W]`
pub fn preprocess_for_detection(image: &DynamicImage) -> (Array4<f32>, LetterboxInfo) {
    let info = LetterboxInfo::new(image, DETECTION_INPUT_SIZE);
    let rgb = letterbox(image, DETECTION_INPUT_SIZE).to_rgb8();

    let size = DETECTION_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    (tensor, info)
}

/// Resize with aspect ratio preservation and centre padding
pub fn letterbox(image: &DynamicImage, target_size: u32) -> DynamicImage {
    let (orig_w, orig_h) = image.dimensions();
    let background = Rgb([PAD_VALUE, PAD_VALUE, PAD_VALUE]);

    if orig_w == 0 || orig_h == 0 {
        return DynamicImage::ImageRgb8(RgbImage::from_pixel(target_size, target_size, background));
    }

    let info = LetterboxInfo::new(image, target_size);
    let new_w = ((orig_w as f32 * info.scale).round() as u32).clamp(1, target_size);
    let new_h = ((orig_h as f32 * info.scale).round() as u32).clamp(1, target_size);

    let resized = image
        .resize_exact(new_w, new_h, image::imageops::FilterType::Triangle)
        .to_rgb8();

    let mut output = RgbImage::from_pixel(target_size, target_size, background);
    image::imageops::replace(
        &mut output,
        &resized,
        info.offset_x as i64,
        info.offset_y as i64,
    );

    DynamicImage::ImageRgb8(output)
}

/// Scale and padding applied by `letterbox`, used to map boxes back
#[derive(Debug, Clone, Copy)]
pub struct LetterboxInfo {
    pub scale: f32,
    pub offset_x: u32,
    pub offset_y: u32,
    pub original_width: u32,
    pub original_height: u32,
}

impl LetterboxInfo {
    pub fn new(image: &DynamicImage, target_size: u32) -> Self {
        let (orig_w, orig_h) = image.dimensions();

        if orig_w == 0 || orig_h == 0 {
            return Self {
                scale: 1.0,
                offset_x: 0,
                offset_y: 0,
                original_width: orig_w,
                original_height: orig_h,
            };
        }

        let scale = (target_size as f32 / orig_w as f32).min(target_size as f32 / orig_h as f32);
        let new_w = ((orig_w as f32 * scale).round() as u32).min(target_size);
        let new_h = ((orig_h as f32 * scale).round() as u32).min(target_size);

        Self {
            scale,
            offset_x: (target_size - new_w) / 2,
            offset_y: (target_size - new_h) / 2,
            original_width: orig_w,
            original_height: orig_h,
        }
    }

    /// Map a point from letterbox space back to source pixels
    pub fn map_to_original(&self, x: f32, y: f32) -> (f32, f32) {
        let orig_x = (x - self.offset_x as f32) / self.scale;
        let orig_y = (y - self.offset_y as f32) / self.scale;
        (orig_x, orig_y)
    }

    /// Map a centre-format box (`cx, cy, w, h`) back to a clamped source box
    pub fn map_box(&self, cx: f32, cy: f32, w: f32, h: f32) -> BoundingBox {
        let (x1, y1) = self.map_to_original(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = self.map_to_original(cx + w / 2.0, cy + h / 2.0);

        let clamp_x = |v: f32| v.round().clamp(0.0, self.original_width as f32) as u32;
        let clamp_y = |v: f32| v.round().clamp(0.0, self.original_height as f32) as u32;

        BoundingBox::new(clamp_x(x1), clamp_y(y1), clamp_x(x2), clamp_y(y2))
    }
}
