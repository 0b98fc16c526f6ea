// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::Arc;

use social_capture_extract::extraction::{
    EngineError, ExtractionError, ProfileExtractionResult, ProfileExtractor,
};
use social_capture_extract::language::LanguageCode;
use social_capture_extract::vision::{OcrLanguages, PostLabel, ProfileLabel};

use super::fakes::{engines, region, screenshot_base64, FixedDetector, FixedLanguage, ScriptedOcr};

fn extractor(
    regions: Vec<social_capture_extract::vision::DetectedRegion<ProfileLabel>>,
    ocr: Arc<ScriptedOcr>,
    language: FixedLanguage,
) -> ProfileExtractor {
    engines(
        Arc::new(FixedDetector::new(regions)),
        Arc::new(FixedDetector::<PostLabel>::empty()),
        ocr,
        language,
    )
    .profile_extractor()
}

#[test]
fn test_full_profile_extraction() {
    let regions = vec![
        region(ProfileLabel::Background, 0, 0, 400, 400),
        region(ProfileLabel::Photo, 200, 10, 220, 30),
        region(ProfileLabel::Photo, 10, 10, 110, 110),
        region(ProfileLabel::Username, 120, 10, 180, 25),
        region(ProfileLabel::Description, 120, 110, 300, 130),
        region(ProfileLabel::Description, 120, 40, 300, 100),
        region(ProfileLabel::Followers, 10, 150, 60, 170),
        region(ProfileLabel::Following, 70, 150, 125, 170),
        region(ProfileLabel::Posts, 130, 150, 190, 170),
        region(ProfileLabel::FollowedBy, 0, 300, 400, 320),
    ];
    let ocr = Arc::new(
        ScriptedOcr::new()
            .first_pass((60, 15), "  jane.doe \n")
            .first_pass((180, 20), "Followed by mike and 3 others")
            .first_pass((180, 60), "jane Travel lover and coffee addict\n")
            .first_pass((50, 20), "1,222\nfollowers")
            .first_pass((55, 20), "2.3M")
            .first_pass((60, 20), "abc")
            .refined((180, 60), "jane Travel lover & coffee addict\n"),
    );

    let result = extractor(regions, ocr.clone(), FixedLanguage::short(LanguageCode::Fra))
        .extract(&screenshot_base64(400, 400))
        .unwrap();

    assert_eq!(result.username, "jane.doe");
    assert_eq!(result.description, "jane Travel lover coffee addict");
    assert_eq!(result.followers, 1222);
    assert_eq!(result.following, 2_300_000);
    assert_eq!(result.posts, -1);

    let photo = result.photo.expect("photo should be extracted");
    assert_eq!(&photo[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&photo).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 100));

    // Only the winning description is re-read, locked to the detected language
    assert_eq!(
        ocr.refined_calls(),
        vec![((180, 60), OcrLanguages::Single(LanguageCode::Fra))]
    );
    // Ignored labels are never read
    assert!(ocr
        .calls()
        .iter()
        .all(|(size, _)| *size != (400, 400) && *size != (400, 20)));
}

#[test]
fn test_no_regions_yields_sentinels() {
    let ocr = Arc::new(ScriptedOcr::new());
    let result = extractor(Vec::new(), ocr.clone(), FixedLanguage::short(LanguageCode::Eng))
        .extract(&screenshot_base64(64, 64))
        .unwrap();

    assert_eq!(result, ProfileExtractionResult::default());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({
            "photo": null,
            "username": "",
            "description": "",
            "followers": -1,
            "following": -1,
            "posts": -1
        })
    );
    assert!(ocr.calls().is_empty());
}

#[test]
fn test_long_description_uses_ranked_tier() {
    let regions = vec![region(ProfileLabel::Description, 0, 0, 180, 60)];
    let ocr = Arc::new(
        ScriptedOcr::new()
            .first_pass(
                (180, 60),
                "anna Nous partageons ici nos voyages, nos recettes et nos meilleurs souvenirs",
            )
            .refined((180, 60), "anna Nous partageons ici nos voyages"),
    );
    let language = FixedLanguage {
        short: Some(LanguageCode::Eng),
        ranked: vec!["__label__oci_Latn", "__label__ita_Latn", "__label__fra_Latn"],
    };

    let result = extractor(regions, ocr.clone(), language)
        .extract(&screenshot_base64(200, 200))
        .unwrap();

    assert_eq!(result.description, "anna Nous partageons ici nos voyages");
    assert_eq!(
        ocr.refined_calls(),
        vec![((180, 60), OcrLanguages::Single(LanguageCode::Ita))]
    );
}

#[test]
fn test_short_text_miss_refines_in_english() {
    let regions = vec![region(ProfileLabel::Description, 0, 0, 180, 60)];
    let ocr = Arc::new(
        ScriptedOcr::new()
            .first_pass((180, 60), "anna ciao")
            .refined((180, 60), "anna ciao"),
    );
    let language = FixedLanguage {
        short: None,
        ranked: Vec::new(),
    };

    extractor(regions, ocr.clone(), language)
        .extract(&screenshot_base64(200, 200))
        .unwrap();

    assert_eq!(
        ocr.refined_calls(),
        vec![((180, 60), OcrLanguages::Single(LanguageCode::Eng))]
    );
}

#[test]
fn test_followed_by_description_is_discarded() {
    for refined in [" Followed by mike and 2 others", "FOLLOWED BY anna"] {
        let regions = vec![region(ProfileLabel::Description, 0, 0, 180, 60)];
        let ocr = Arc::new(
            ScriptedOcr::new()
                .first_pass((180, 60), "anna Followed by mike")
                .refined((180, 60), refined),
        );

        let result = extractor(regions, ocr, FixedLanguage::short(LanguageCode::Eng))
            .extract(&screenshot_base64(200, 200))
            .unwrap();

        assert_eq!(result.description, "", "refined text {:?}", refined);
    }
}

#[test]
fn test_handle_only_description_skips_refinement() {
    let regions = vec![region(ProfileLabel::Description, 0, 0, 180, 60)];
    let ocr = Arc::new(ScriptedOcr::new().first_pass((180, 60), "anna\n"));

    let result = extractor(regions, ocr.clone(), FixedLanguage::short(LanguageCode::Eng))
        .extract(&screenshot_base64(200, 200))
        .unwrap();

    assert_eq!(result.description, "");
    assert!(ocr.refined_calls().is_empty());
}

#[test]
fn test_region_outside_image_reads_as_missing() {
    let regions = vec![region(ProfileLabel::Followers, 500, 500, 600, 600)];
    let ocr = Arc::new(ScriptedOcr::new());

    let result = extractor(regions, ocr.clone(), FixedLanguage::short(LanguageCode::Eng))
        .extract(&screenshot_base64(200, 200))
        .unwrap();

    assert_eq!(result.followers, -1);
    assert!(ocr.calls().is_empty());
}

#[test]
fn test_data_uri_input() {
    let ocr = Arc::new(ScriptedOcr::new());
    let input = format!("data:image/png;base64,{}", screenshot_base64(32, 32));

    let result = extractor(Vec::new(), ocr, FixedLanguage::short(LanguageCode::Eng)).extract(&input);

    assert!(result.is_ok());
}

#[test]
fn test_undecodable_image_is_client_error() {
    for input in ["not an image!!", "aGVsbG8gd29ybGQ=", ""] {
        let ocr = Arc::new(ScriptedOcr::new());
        let err = extractor(Vec::new(), ocr, FixedLanguage::short(LanguageCode::Eng))
            .extract(input)
            .unwrap_err();

        assert!(matches!(err, ExtractionError::InvalidImage(_)), "input {:?}", input);
        assert!(err.is_client_error());
    }
}

#[test]
fn test_detector_failure_is_service_error() {
    let profile = engines(
        Arc::new(FixedDetector::<ProfileLabel>::failing()),
        Arc::new(FixedDetector::<PostLabel>::empty()),
        Arc::new(ScriptedOcr::new()),
        FixedLanguage::short(LanguageCode::Eng),
    )
    .profile_extractor();

    let err = profile.extract(&screenshot_base64(32, 32)).unwrap_err();

    assert!(matches!(err, ExtractionError::Engine(EngineError::Detector(_))));
    assert!(!err.is_client_error());
}
