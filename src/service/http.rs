// src/service/http.rs
// HTTP client for the upstream REST API

use super::{IngestionService, ServiceError, ShareResolver, TranscriptionService};
use crate::transcript::{Language, Segment, SharedVideo, Transcript, TranscriptStatus, Video};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const TIMEOUT_SECS: u64 = 10;

/// Client for the ingestion, transcription and share-resolver routes of the
/// upstream API. Implements all three service traits over one connection
/// pool.
pub struct HttpApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::info!("API client initialized for {}", base_url);

        Self {
            base_url,
            token,
            client,
        }
    }

    /// Reads `VIDSCRIPT_API_URL` and `VIDSCRIPT_API_TOKEN` from the
    /// environment (a `.env` file is honored).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let base_url =
            env::var("VIDSCRIPT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let token = env::var("VIDSCRIPT_API_TOKEN").ok().filter(|t| !t.is_empty());
        Self::new(base_url, token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ServiceError::Server(format!("Malformed response: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::map_status(status, &body, context))
    }

    fn map_status(status: reqwest::StatusCode, body: &str, context: &str) -> ServiceError {
        // FastAPI-style error bodies carry a "detail" field.
        let detail = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.detail)
            .unwrap_or_else(|_| body.to_string());

        match status.as_u16() {
            400 | 422 => ServiceError::Validation(detail),
            401 | 403 => ServiceError::Authentication,
            404 => ServiceError::NotFound(context.to_string()),
            429 => ServiceError::RateLimited,
            _ => ServiceError::Server(format!("HTTP {}: {}", status, detail)),
        }
    }

    fn map_request_error(e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Serialize)]
struct ProcessVideoRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct TranscribeRequest {
    language: Language,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

/// Wire shape of a transcription row: the timed segments travel in a
/// `timestamps` field next to the joined `content`.
#[derive(Debug, Deserialize)]
struct TranscriptionDto {
    language: Language,
    content: String,
    timestamps: Vec<Segment>,
    status: TranscriptStatus,
}

impl From<TranscriptionDto> for Transcript {
    fn from(dto: TranscriptionDto) -> Self {
        Transcript {
            language: dto.language,
            segments: dto.timestamps,
            status: dto.status,
            content: dto.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SharedResponse {
    video: Video,
    transcriptions: Vec<TranscriptionDto>,
}

fn parse_status(raw: &str) -> Result<TranscriptStatus, ServiceError> {
    match raw {
        // The server reports not_started before the first job row exists.
        "not_started" | "pending" => Ok(TranscriptStatus::Pending),
        "processing" => Ok(TranscriptStatus::Processing),
        "completed" => Ok(TranscriptStatus::Completed),
        "failed" => Ok(TranscriptStatus::Failed),
        other => Err(ServiceError::Server(format!(
            "Unknown transcription status: {}",
            other
        ))),
    }
}

#[async_trait]
impl IngestionService for HttpApiClient {
    async fn ingest(&self, url: &str) -> Result<Video, ServiceError> {
        let response = self
            .request(self.client.post(self.url("/api/videos/process")))
            .json(&ProcessVideoRequest { url })
            .send()
            .await
            .map_err(Self::map_request_error)?;

        Self::read_json::<Video>(response, url).await
    }
}

#[async_trait]
impl TranscriptionService for HttpApiClient {
    async fn create_job(&self, video_id: &str, language: Language) -> Result<(), ServiceError> {
        let path = format!("/api/videos/{}/transcribe", video_id);
        let response = self
            .request(self.client.post(self.url(&path)))
            .json(&TranscribeRequest { language })
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(Self::map_status(status, &body, video_id))
    }

    async fn job_status(&self, video_id: &str) -> Result<TranscriptStatus, ServiceError> {
        let path = format!("/api/videos/{}/transcription-status", video_id);
        let response = self
            .request(self.client.get(self.url(&path)))
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let parsed: StatusResponse = Self::read_json(response, video_id).await?;
        parse_status(&parsed.status)
    }

    async fn fetch_transcript(
        &self,
        video_id: &str,
        language: Language,
    ) -> Result<Transcript, ServiceError> {
        let path = format!("/api/videos/{}/transcriptions/{}", video_id, language);
        let response = self
            .request(self.client.get(self.url(&path)))
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let dto: TranscriptionDto = Self::read_json(response, video_id).await?;
        Ok(dto.into())
    }
}

#[async_trait]
impl ShareResolver for HttpApiClient {
    async fn resolve(&self, permanent_link: &str) -> Result<SharedVideo, ServiceError> {
        // Public route: no bearer token attached.
        let path = format!("/api/shared/{}", permanent_link);
        let response = self
            .client
            .get(self.url(&path))
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let parsed: SharedResponse = Self::read_json(response, permanent_link).await?;
        Ok(SharedVideo {
            video: parsed.video,
            transcripts: parsed.transcriptions.into_iter().map(Into::into).collect(),
        })
    }
}
