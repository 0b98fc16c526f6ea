// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR over detected regions
//!
//! Components:
//! - `extractor` - the two OCR stages (multi-language first pass, language-locked refinement)
//! - `tesseract` - Tesseract command-line engine

pub mod extractor;
pub mod tesseract;

use image::GrayImage;

use crate::extraction::EngineError;
use crate::language::LanguageCode;

pub use extractor::{RawTextExtractor, RefinedText, RefinedTextExtractor};
pub use tesseract::TesseractCli;

/// Languages an OCR call is allowed to recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrLanguages {
    /// All supported languages at once (first pass)
    Common,
    /// Locked to one detected language (refinement pass)
    Single(LanguageCode),
}

impl OcrLanguages {
    pub fn codes(&self) -> Vec<LanguageCode> {
        match self {
            OcrLanguages::Common => LanguageCode::ALL.to_vec(),
            OcrLanguages::Single(code) => vec![*code],
        }
    }

    /// Tesseract `-l` argument, e.g. `eng+fra+spa`
    pub fn tesseract_arg(&self) -> String {
        self.codes()
            .iter()
            .map(LanguageCode::as_str)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// OCR engine capability
#[cfg_attr(test, mockall::automock)]
pub trait OcrEngine: Send + Sync {
    /// Recognise the text of a grayscale crop
    fn recognize(&self, image: &GrayImage, languages: &OcrLanguages) -> Result<String, EngineError>;
}
