// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text normalizer for OCR output of descriptions and comments

use once_cell::sync::Lazy;
use regex::Regex;

static TRUNCATION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\.\.\.\s*more|\s*\band\s+\d+\s+more)\s*$").expect("valid regex")
});

static DASH_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+-\s+").expect("valid regex"));

static PSEUDO_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+(?:\.\w{2,})*/\S*").expect("valid regex"));

static SIMPLE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+/\w+").expect("valid regex"));

static URL_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://\S+|youtu\.be/\S+|\S*\.com\S*").expect("valid regex")
});

static NON_LETTER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|\s)([^\p{L}\n]+)(\s|$)").expect("valid regex"));

static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+(?:\.\w+)*").expect("valid regex"));

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("valid regex"));

static HORIZONTAL_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\S\r\n]+").expect("valid regex"));

static LINE_INDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[^\S\r\n]+").expect("valid regex"));

static LEADING_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").expect("valid regex"));

/// Remove `word(.ext)*/path` tokens such as `amywinehouse.lnk.to/bio`
///
/// Plain `word/word` tokens ("Music/band") are kept, and so is the host
/// right after a `://` scheme, which the URL rule removes as a whole.
fn strip_pseudo_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(m) = PSEUDO_LINK.find_at(text, pos) {
        let start = m.start();
        if text[..start].ends_with("://") || SIMPLE_PATH.is_match(&text[start..]) {
            pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        out.push_str(&text[copied..start]);
        copied = m.end();
        pos = m.end();
    }

    out.push_str(&text[copied..]);
    out
}

fn normalize_once(text: &str) -> String {
    let text = TRUNCATION_MARKER.replace(text, "");
    let text = DASH_SEPARATOR.replace_all(&text, " ");
    let text = strip_pseudo_links(&text);
    let text = URL_LIKE.replace_all(&text, "");
    let text = NON_LETTER_TOKEN.replace_all(&text, "${1}${3}");
    let text = MENTION.replace_all(&text, "");
    let text = BLANK_LINES.replace_all(&text, "\n");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = LINE_INDENT.replace_all(&text, "\n");
    let text = LEADING_SPACE.replace(&text, "");
    text.trim_end_matches('\n').to_string()
}

/// Normalize OCR text of a description or comment
///
/// Each rule only removes text or shrinks whitespace, so repeating the
/// pipeline until nothing changes terminates and makes the result
/// idempotent.
pub fn normalize(text: &str) -> String {
    let mut current = normalize_once(text);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
