// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Author-handle heuristics
//!
//! Descriptions and comments are captured with the author's handle in
//! front, so OCR reads the handle as the first whitespace-delimited token.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\S+\s*").expect("valid regex"));

static FOLLOWED_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s?followed by").expect("valid regex"));

/// Remove exactly one leading token and the whitespace around it
pub fn strip_leading_token(text: &str) -> String {
    LEADING_TOKEN.replace(text, "").into_owned()
}

/// Words after the first one, joined by single spaces
///
/// Used for language analysis, where layout does not matter.
pub fn drop_first_token(text: &str) -> String {
    text.split_whitespace().skip(1).collect::<Vec<_>>().join(" ")
}

/// True for the profile "Followed by ..." banner
pub fn is_followed_by_banner(text: &str) -> bool {
    FOLLOWED_BY.is_match(text)
}
