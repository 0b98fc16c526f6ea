// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label taxonomies of the two detector models

use std::fmt::Debug;
use std::hash::Hash;

/// How the region selector treats regions carrying a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    /// Largest box wins; cropped as the photo
    Photo,
    /// One winner per label, chosen by longest first-pass OCR text
    SingularText,
    /// Every region is kept as its own candidate
    Repeatable,
    /// Never read
    Ignored,
}

/// A closed label set of one screenshot surface
pub trait RegionLabel: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Class names in the model's training index order
    const DEFAULT_CLASS_NAMES: &'static [&'static str];

    /// Resolve a detector class name (case-insensitive)
    fn from_class_name(name: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;

    fn role(&self) -> LabelRole;
}

/// Labels of the profile-screenshot detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileLabel {
    Photo,
    Username,
    Description,
    Followers,
    Following,
    Posts,
    Background,
    FollowedBy,
}

impl RegionLabel for ProfileLabel {
    const DEFAULT_CLASS_NAMES: &'static [&'static str] = &[
        "background",
        "description",
        "followed_by",
        "followers",
        "following",
        "photo",
        "posts",
        "username",
    ];

    fn from_class_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "photo" => Some(Self::Photo),
            "username" => Some(Self::Username),
            "description" => Some(Self::Description),
            "followers" => Some(Self::Followers),
            "following" => Some(Self::Following),
            "posts" => Some(Self::Posts),
            "background" => Some(Self::Background),
            "followed_by" => Some(Self::FollowedBy),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Username => "username",
            Self::Description => "description",
            Self::Followers => "followers",
            Self::Following => "following",
            Self::Posts => "posts",
            Self::Background => "background",
            Self::FollowedBy => "followed_by",
        }
    }

    fn role(&self) -> LabelRole {
        match self {
            Self::Photo => LabelRole::Photo,
            Self::Username
            | Self::Description
            | Self::Followers
            | Self::Following
            | Self::Posts => LabelRole::SingularText,
            Self::Background | Self::FollowedBy => LabelRole::Ignored,
        }
    }
}

/// Labels of the post-screenshot detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostLabel {
    Photo,
    Description,
    Likes,
    Date,
    Comment,
    CommentsBackground,
    DescriptionBackground,
}

impl RegionLabel for PostLabel {
    const DEFAULT_CLASS_NAMES: &'static [&'static str] = &[
        "comment",
        "comments_background",
        "date",
        "description",
        "description_background",
        "likes",
        "photo",
    ];

    fn from_class_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "photo" => Some(Self::Photo),
            "description" => Some(Self::Description),
            "likes" => Some(Self::Likes),
            "date" => Some(Self::Date),
            "comment" => Some(Self::Comment),
            "comments_background" => Some(Self::CommentsBackground),
            "description_background" => Some(Self::DescriptionBackground),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Description => "description",
            Self::Likes => "likes",
            Self::Date => "date",
            Self::Comment => "comment",
            Self::CommentsBackground => "comments_background",
            Self::DescriptionBackground => "description_background",
        }
    }

    fn role(&self) -> LabelRole {
        match self {
            Self::Photo => LabelRole::Photo,
            Self::Description | Self::Likes | Self::Date => LabelRole::SingularText,
            Self::Comment => LabelRole::Repeatable,
            Self::CommentsBackground | Self::DescriptionBackground => LabelRole::Ignored,
        }
    }
}
