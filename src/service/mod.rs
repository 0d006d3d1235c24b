// src/service/mod.rs
// External service interfaces consumed by the core

mod http;

pub use http::HttpApiClient;

use crate::transcript::{Language, SharedVideo, Transcript, TranscriptStatus, Video};
use async_trait::async_trait;
use thiserror::Error;

/// Transport-level error from a collaborator, with retry classification.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Authentication failed")]
    Authentication,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl ServiceError {
    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Network(_) | ServiceError::Timeout | ServiceError::RateLimited
        )
    }
}

/// Creates a video record from a raw URL. No deduplication is guaranteed:
/// submitting the same URL twice yields two videos.
#[async_trait]
pub trait IngestionService: Send + Sync {
    async fn ingest(&self, url: &str) -> Result<Video, ServiceError>;
}

/// Server-side transcription: job creation, true status, transcript fetch.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Requests transcription of a video into one language. Returns once the
    /// server has accepted the job.
    async fn create_job(&self, video_id: &str, language: Language) -> Result<(), ServiceError>;

    /// Reports the server-truth status for the video's latest job.
    async fn job_status(&self, video_id: &str) -> Result<TranscriptStatus, ServiceError>;

    /// Fetches the finished transcript for one language.
    async fn fetch_transcript(
        &self,
        video_id: &str,
        language: Language,
    ) -> Result<Transcript, ServiceError>;
}

/// Resolves a permanent link to its video and completed transcripts,
/// without requiring identity.
#[async_trait]
pub trait ShareResolver: Send + Sync {
    async fn resolve(&self, permanent_link: &str) -> Result<SharedVideo, ServiceError>;
}
