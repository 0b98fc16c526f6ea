// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Compact-notation counters (`1,222`, `1.2K`, `2.3M`, `1.5B`)

use once_cell::sync::Lazy;
use regex::Regex;

// A glued suffix always counts ("1.2Kfollowers"); after a space it must be
// a word of its own, not the start of one ("1,222 Beiträge")
static NUMERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9.,]+)(?:([KMB])|\s+([KMB])\b)?").expect("valid regex")
});

fn is_thousands_grouping(parts: &[&str]) -> bool {
    parts.last().map_or(false, |last| last.len() == 3)
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse the first counter found in `text`
pub fn parse_number(text: &str) -> Option<i64> {
    let captures = NUMERAL.captures(text.trim())?;
    let mut numeral = captures[1].to_string();

    if numeral.contains(',') {
        let parts: Vec<&str> = numeral.split(',').collect();
        if is_thousands_grouping(&parts) {
            numeral = parts.concat();
        }
    }

    let value: f64 = numeral.parse().ok()?;
    let suffix = captures.get(2).or_else(|| captures.get(3));
    let multiplier = match suffix.map(|m| m.as_str().to_ascii_uppercase()) {
        Some(suffix) if suffix == "K" => 1_000.0,
        Some(suffix) if suffix == "M" => 1_000_000.0,
        Some(suffix) if suffix == "B" => 1_000_000_000.0,
        _ => 1.0,
    };

    Some((value * multiplier) as i64)
}
