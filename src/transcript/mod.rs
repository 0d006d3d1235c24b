// src/transcript/mod.rs
// Transcript data model

mod index;

pub use index::SegmentIndex;

use crate::platform::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transcription language. `Both` requests auto-detected mixed-language
/// output from the transcription service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
    Both,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
            Language::Both => "both",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-truth transcription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TranscriptStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TranscriptStatus::Completed | TranscriptStatus::Failed)
    }
}

/// One timed line of transcript text.
///
/// `start` and `end` are seconds from the beginning of the video, with
/// `0 <= start <= end`. Within a transcript, starts are non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Whether `t` falls inside this segment's closed interval.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// One video's transcript in one language. A video owns at most one
/// transcript per language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub language: Language,
    pub segments: Vec<Segment>,
    pub status: TranscriptStatus,
    /// Joined full text, kept alongside the timed segments for copy/export.
    pub content: String,
}

impl Transcript {
    pub fn is_completed(&self) -> bool {
        self.status == TranscriptStatus::Completed
    }
}

/// An ingested video. Immutable after creation except cosmetic enrichment
/// (title, thumbnail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub url: String,
    pub platform: Platform,
    pub title: String,
    pub thumbnail: Option<String>,
    /// Opaque public token granting read-only access without authentication.
    pub permanent_link: String,
    pub created_at: DateTime<Utc>,
}

/// Public share payload: a video plus its completed transcripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedVideo {
    pub video: Video,
    pub transcripts: Vec<Transcript>,
}
