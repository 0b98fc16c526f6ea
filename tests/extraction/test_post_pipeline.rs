// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use chrono::{Duration, Local, NaiveDate};
use std::sync::Arc;

use social_capture_extract::extraction::{PostExtractionResult, PostExtractor};
use social_capture_extract::language::LanguageCode;
use social_capture_extract::vision::{DetectedRegion, OcrLanguages, PostLabel, ProfileLabel};

use super::fakes::{engines, region, screenshot_base64, FixedDetector, FixedLanguage, ScriptedOcr};

fn extractor(regions: Vec<DetectedRegion<PostLabel>>, ocr: Arc<ScriptedOcr>) -> PostExtractor {
    engines(
        Arc::new(FixedDetector::<ProfileLabel>::empty()),
        Arc::new(FixedDetector::new(regions)),
        ocr,
        FixedLanguage::short(LanguageCode::Spa),
    )
    .post_extractor()
}

#[test]
fn test_full_post_extraction() {
    let regions = vec![
        region(PostLabel::Photo, 0, 0, 300, 300),
        region(PostLabel::DescriptionBackground, 0, 300, 400, 340),
        region(PostLabel::Description, 0, 300, 200, 320),
        region(PostLabel::Likes, 0, 320, 80, 335),
        region(PostLabel::Date, 0, 340, 90, 355),
        region(PostLabel::CommentsBackground, 0, 355, 400, 400),
        region(PostLabel::Comment, 0, 360, 150, 372),
        region(PostLabel::Comment, 0, 372, 151, 384),
        region(PostLabel::Comment, 0, 384, 152, 396),
        region(PostLabel::Comment, 200, 360, 353, 372),
        region(PostLabel::Comment, 200, 372, 354, 384),
    ];
    let ocr = Arc::new(
        ScriptedOcr::new()
            .first_pass((200, 20), "mike Sunset 🌅 at the pier")
            .refined((200, 20), "mike Sunset 🌅 at the pier\n")
            .first_pass((80, 15), "1.2K likes")
            .first_pass((90, 15), "June 5, 2023")
            .first_pass((150, 12), "anna Beautiful shot")
            .refined((150, 12), "anna Beautiful shot!")
            .first_pass((151, 12), "bob")
            .first_pass((152, 12), "carl 🔥🔥🔥")
            .first_pass((153, 12), "dora nice one")
            .refined((153, 12), "dora @x.y")
            .first_pass((154, 12), "emil Tolle Aussicht")
            .refined((154, 12), "emil Tolle Aussicht"),
    );

    let result = extractor(regions, ocr.clone())
        .extract(&screenshot_base64(400, 400))
        .unwrap();

    assert_eq!(result.description, "Sunset at the pier");
    assert_eq!(result.likes, 1200);
    assert_eq!(result.comments_count, -1);
    assert_eq!(
        result.date.map(|d| d.date()),
        NaiveDate::from_ymd_opt(2023, 6, 5)
    );
    assert_eq!(result.comments, vec!["Beautiful shot!", "Tolle Aussicht"]);
    assert!(result.photo.is_some());

    // Handle-only comments never reach the refined pass
    let spa = OcrLanguages::Single(LanguageCode::Spa);
    assert_eq!(
        ocr.refined_calls(),
        vec![
            ((200, 20), spa),
            ((150, 12), spa),
            ((153, 12), spa),
            ((154, 12), spa),
        ]
    );
    assert!(ocr
        .calls()
        .iter()
        .all(|(size, _)| *size != (400, 40) && *size != (400, 45)));
}

#[test]
fn test_no_regions_yields_sentinels() {
    let result = extractor(Vec::new(), Arc::new(ScriptedOcr::new()))
        .extract(&screenshot_base64(64, 64))
        .unwrap();

    assert_eq!(result, PostExtractionResult::default());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({
            "photo": null,
            "description": "",
            "likes": -1,
            "commentsCount": -1,
            "date": null,
            "comments": []
        })
    );
}

#[test]
fn test_comment_empty_after_handle_strip_is_dropped() {
    let regions = vec![region(PostLabel::Comment, 0, 0, 150, 12)];
    let ocr = Arc::new(
        ScriptedOcr::new()
            .first_pass((150, 12), "anna 😍 lovely")
            .refined((150, 12), "anna 😍 2024"),
    );

    let result = extractor(regions, ocr)
        .extract(&screenshot_base64(200, 200))
        .unwrap();

    assert!(result.comments.is_empty());
    assert_eq!(result.comments_count, -1);
}

#[test]
fn test_handle_only_description_becomes_empty() {
    let regions = vec![region(PostLabel::Description, 0, 0, 200, 20)];
    let ocr = Arc::new(ScriptedOcr::new().first_pass((200, 20), "mike"));

    let result = extractor(regions, ocr.clone())
        .extract(&screenshot_base64(200, 200))
        .unwrap();

    assert_eq!(result.description, "");
    assert!(ocr.refined_calls().is_empty());
}

#[test]
fn test_unparsable_fields_fall_back_to_sentinels() {
    let regions = vec![
        region(PostLabel::Likes, 0, 0, 80, 15),
        region(PostLabel::Date, 0, 20, 90, 35),
    ];
    let ocr = Arc::new(
        ScriptedOcr::new()
            .first_pass((80, 15), "many")
            .first_pass((90, 15), "yesterday"),
    );

    let result = extractor(regions, ocr)
        .extract(&screenshot_base64(200, 200))
        .unwrap();

    assert_eq!(result.likes, -1);
    assert_eq!(result.date, None);
}

#[test]
fn test_relative_date() {
    let regions = vec![region(PostLabel::Date, 0, 0, 90, 15)];
    let ocr = Arc::new(ScriptedOcr::new().first_pass((90, 15), "3 days ago"));

    let result = extractor(regions, ocr)
        .extract(&screenshot_base64(200, 200))
        .unwrap();

    let expected = (Local::now().naive_local() - Duration::days(3)).date();
    assert_eq!(result.date.map(|d| d.date()), Some(expected));
}

#[test]
fn test_longest_likes_region_wins() {
    let regions = vec![
        region(PostLabel::Likes, 0, 0, 80, 15),
        region(PostLabel::Likes, 0, 20, 81, 35),
    ];
    let ocr = Arc::new(
        ScriptedOcr::new()
            .first_pass((80, 15), "12")
            .first_pass((81, 15), "1,234 likes"),
    );

    let result = extractor(regions, ocr)
        .extract(&screenshot_base64(200, 200))
        .unwrap();

    assert_eq!(result.likes, 1234);
}
