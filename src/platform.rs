// src/platform.rs
// Platform Classifier - URL to supported platform mapping

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Originating video platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Twitter,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Unsupported video URL: {0}")]
    Unsupported(String),
}

/// Allow-list checked in order; first match wins.
const PLATFORM_DOMAINS: &[(&str, Platform)] = &[
    ("youtube.com", Platform::Youtube),
    ("youtu.be", Platform::Youtube),
    ("tiktok.com", Platform::Tiktok),
    ("twitter.com", Platform::Twitter),
    ("x.com", Platform::Twitter),
];

/// Maps a raw URL to its platform by case-sensitive domain-fragment
/// containment. No URL parsing or normalization is done, so an uppercase
/// host or a fragment appearing in the path also matches (known limitation).
pub fn classify(url: &str) -> Result<Platform, ClassifyError> {
    for (fragment, platform) in PLATFORM_DOMAINS {
        if url.contains(fragment) {
            return Ok(*platform);
        }
    }
    Err(ClassifyError::Unsupported(url.to_string()))
}
