// src/ingest.rs
// Classifier-gated video ingestion

use crate::platform::{self, ClassifyError};
use crate::service::{IngestionService, ServiceError};
use crate::transcript::Video;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// URL rejected by the platform classifier; user-correctable.
    #[error(transparent)]
    Unsupported(#[from] ClassifyError),

    #[error("Ingestion failed: {0}")]
    Service(#[from] ServiceError),
}

/// Creates a video from a raw URL. The platform classifier gates the URL
/// before any network call is made, so unsupported URLs are rejected
/// locally.
pub async fn ingest_video<S>(service: &S, url: &str) -> Result<Video, IngestError>
where
    S: IngestionService + ?Sized,
{
    let platform = platform::classify(url)?;
    tracing::info!("Ingesting {} video: {}", platform, url);

    let video = service.ingest(url).await?;
    tracing::info!("Video {} ingested ({})", video.id, video.title);
    Ok(video)
}
