//! Core engine for "submit a video, wait for transcription, watch it with a
//! synced transcript": the transcription-job lifecycle controller and the
//! playback-time to transcript-segment synchronization machinery.
//!
//! Authentication, persistence and rendering live outside this crate and are
//! consumed through the traits in [`service`].

pub mod config;
pub mod ingest;
pub mod job;
pub mod platform;
pub mod player;
pub mod selection;
pub mod service;
pub mod transcript;

pub use config::JobConfig;
pub use ingest::{ingest_video, IngestError};
pub use job::{JobError, JobEvent, JobLifecycleController, JobPhase};
pub use platform::{classify, ClassifyError, Platform};
pub use player::{CommandClock, PlaybackClock, PlayerCommand};
pub use selection::{SegmentChange, SelectionError, TranscriptSelection};
pub use service::{
    HttpApiClient, IngestionService, ServiceError, ShareResolver, TranscriptionService,
};
pub use transcript::{
    Language, Segment, SegmentIndex, SharedVideo, Transcript, TranscriptStatus, Video,
};
