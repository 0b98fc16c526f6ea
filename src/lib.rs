// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod extraction;
pub mod language;
pub mod parsing;
pub mod text;
pub mod vision;

// Re-export main types
pub use config::ExtractionConfig;
pub use extraction::{
    EngineError, ExtractionEngines, ExtractionError, ExtractionService, PostExtractionResult,
    PostExtractor, ProfileExtractionResult, ProfileExtractor, UNDETECTED_COUNT,
};
pub use language::{LanguageCascade, LanguageCode};
pub use parsing::{parse_date, parse_number};
pub use text::normalize;
pub use vision::{PostLabel, ProfileLabel};
