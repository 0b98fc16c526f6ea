// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extraction result records

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::vision::jpeg_data_uri;

/// Sentinel for a counter that was not detected or could not be parsed
pub const UNDETECTED_COUNT: i64 = -1;

fn serialize_photo<S: Serializer>(photo: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match photo {
        Some(bytes) => serializer.serialize_some(&jpeg_data_uri(bytes)),
        None => serializer.serialize_none(),
    }
}

/// Fields read from a profile screenshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileExtractionResult {
    /// JPEG bytes of the profile photo; a `data:image/jpeg;base64,` URI on the wire
    #[serde(serialize_with = "serialize_photo")]
    pub photo: Option<Vec<u8>>,
    pub username: String,
    pub description: String,
    pub followers: i64,
    pub following: i64,
    pub posts: i64,
}

impl Default for ProfileExtractionResult {
    fn default() -> Self {
        Self {
            photo: None,
            username: String::new(),
            description: String::new(),
            followers: UNDETECTED_COUNT,
            following: UNDETECTED_COUNT,
            posts: UNDETECTED_COUNT,
        }
    }
}

/// Fields read from a post screenshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostExtractionResult {
    #[serde(serialize_with = "serialize_photo")]
    pub photo: Option<Vec<u8>>,
    pub description: String,
    pub likes: i64,
    /// Never visible on a screenshot, always [`UNDETECTED_COUNT`]
    pub comments_count: i64,
    pub date: Option<NaiveDateTime>,
    pub comments: Vec<String>,
}

impl Default for PostExtractionResult {
    fn default() -> Self {
        Self {
            photo: None,
            description: String::new(),
            likes: UNDETECTED_COUNT,
            comments_count: UNDETECTED_COUNT,
            date: None,
            comments: Vec::new(),
        }
    }
}
