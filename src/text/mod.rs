// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR text clean-up
//!
//! - `normalize` - removes OCR noise (links, mentions, truncation markers, symbol-only tokens)
//! - `handles` - author-handle and banner heuristics for descriptions and comments

pub mod handles;
pub mod normalize;

pub use handles::{drop_first_token, is_followed_by_banner, strip_leading_token};
pub use normalize::normalize;
