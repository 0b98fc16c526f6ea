// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Post date parser
//!
//! Accepted forms, tried in order:
//! - `June 5, 2023`
//! - `June 5 2023`
//! - `June 5` (current year)
//! - `3 days ago`
//! - `2 hours ago`, `10 minutes ago`, `30 seconds ago` (today)

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

static MONTH_DAY_COMMA_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([a-z]+)\s*(\d{1,2})\s*,\s*(\d{4})").expect("valid regex")
});

static MONTH_DAY_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([a-z]+)\s*(\d{1,2})\s*(\d{4})").expect("valid regex"));

static MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([a-z]+)\s*(\d{1,2})").expect("valid regex"));

static DAYS_AGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*days?\s*ago").expect("valid regex"));

static TODAY_AGO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:hours?|minutes?|seconds?)\s*ago").expect("valid regex")
});

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Month number for a full English month name or its three-letter abbreviation
fn month_number(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    MONTHS
        .iter()
        .position(|name| *name == word || (word.len() == 3 && name.starts_with(&word)))
        .map(|index| index as u32 + 1)
}

fn calendar_date(month: &str, day: &str, year: i32) -> Option<NaiveDateTime> {
    let month = month_number(month)?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

fn calendar_date_with_year(captures: &Captures) -> Option<NaiveDateTime> {
    let year: i32 = captures[3].parse().ok()?;
    calendar_date(&captures[1], &captures[2], year)
}

/// Parse a post date relative to `now`
pub fn parse_date_at(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    // Each pattern yields its first match that is a real calendar date
    let absolute = MONTH_DAY_COMMA_YEAR
        .captures_iter(text)
        .find_map(|captures| calendar_date_with_year(&captures))
        .or_else(|| {
            MONTH_DAY_YEAR
                .captures_iter(text)
                .find_map(|captures| calendar_date_with_year(&captures))
        })
        .or_else(|| {
            MONTH_DAY
                .captures_iter(text)
                .find_map(|captures| calendar_date(&captures[1], &captures[2], now.year()))
        });
    if absolute.is_some() {
        return absolute;
    }

    if let Some(captures) = DAYS_AGO.captures(text) {
        let days: i64 = captures[1].parse().ok()?;
        return now.checked_sub_signed(Duration::try_days(days)?);
    }
    if TODAY_AGO.is_match(text) {
        return Some(now);
    }

    debug!(text, "Unrecognised post date");
    None
}

/// Parse a post date relative to the local clock
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    parse_date_at(text, Local::now().naive_local())
}
