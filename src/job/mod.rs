// src/job/mod.rs
// Job Lifecycle Controller - submission and status polling state machine

mod progress;

pub use progress::ProgressEstimator;

use crate::config::JobConfig;
use crate::service::{ServiceError, TranscriptionService};
use crate::transcript::{Language, Transcript, TranscriptStatus};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Local phase of one transcription job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

/// Identity of a job: one per (video, language) pair at most.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobKey {
    pub video_id: String,
    pub language: Language,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("A transcription job is already active for {video_id} ({language})")]
    Conflict { video_id: String, language: Language },

    #[error("Job submission failed: {0}")]
    Submit(#[from] ServiceError),

    #[error("No resumable job for {video_id} ({language})")]
    NoSuchJob { video_id: String, language: Language },
}

impl JobError {
    /// Returns true if resubmitting the same job may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, JobError::Submit(e) if e.is_retryable())
    }
}

/// Phase and progress updates pushed to the consumer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum JobEvent {
    Phase {
        video_id: String,
        language: Language,
        phase: JobPhase,
    },
    Progress {
        video_id: String,
        language: Language,
        estimated_progress: u8,
    },
    /// The completed transcript, refetched right after the server reported
    /// completion.
    TranscriptReady {
        video_id: String,
        language: Language,
        transcript: Transcript,
    },
    Failed {
        video_id: String,
        language: Language,
        retryable: bool,
    },
    TimedOut {
        video_id: String,
        language: Language,
        attempts: u32,
    },
}

struct JobSlot {
    /// Identity token of the run that owns this slot. A timer tick whose
    /// token no longer matches discards itself instead of mutating state.
    token: Uuid,
    phase: JobPhase,
    progress: ProgressEstimator,
    real_status: TranscriptStatus,
    task: Option<JoinHandle<()>>,
}

/// Drives transcription jobs from submission to completion or failure.
///
/// Server truth comes from a 2s status poller; a 1s estimator produces the
/// cosmetic progress shown meanwhile. At most one job per (video, language)
/// may be submitting or polling, enforced by the controller's own state.
/// `detach` cancels the timers without cancelling the server-side job;
/// `resume` re-enters polling without resubmitting.
pub struct JobLifecycleController {
    service: Arc<dyn TranscriptionService>,
    config: JobConfig,
    jobs: Arc<Mutex<HashMap<JobKey, JobSlot>>>,
    events: mpsc::UnboundedSender<JobEvent>,
}

impl JobLifecycleController {
    pub fn new(
        service: Arc<dyn TranscriptionService>,
        config: JobConfig,
    ) -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                service,
                config,
                jobs: Arc::new(Mutex::new(HashMap::new())),
                events,
            },
            rx,
        )
    }

    pub fn phase(&self, video_id: &str, language: Language) -> JobPhase {
        let key = JobKey {
            video_id: video_id.to_string(),
            language,
        };
        self.lock_jobs()
            .get(&key)
            .map(|slot| slot.phase)
            .unwrap_or(JobPhase::Idle)
    }

    pub fn estimated_progress(&self, video_id: &str, language: Language) -> u8 {
        let key = JobKey {
            video_id: video_id.to_string(),
            language,
        };
        self.lock_jobs()
            .get(&key)
            .map(|slot| slot.progress.value())
            .unwrap_or(0)
    }

    pub fn real_status(&self, video_id: &str, language: Language) -> Option<TranscriptStatus> {
        let key = JobKey {
            video_id: video_id.to_string(),
            language,
        };
        self.lock_jobs().get(&key).map(|slot| slot.real_status)
    }

    /// Submits a transcription job and, once the server acknowledges it,
    /// starts the progress estimator and the status poller.
    ///
    /// Fails with `Conflict` while a job for the same pair is submitting or
    /// polling. A network failure on submission surfaces immediately; check
    /// `JobError::is_retryable` before resubmitting.
    pub async fn submit(&self, video_id: &str, language: Language) -> Result<(), JobError> {
        let key = JobKey {
            video_id: video_id.to_string(),
            language,
        };
        let token = Uuid::new_v4();

        {
            let mut jobs = self.lock_jobs();
            if let Some(slot) = jobs.get(&key) {
                if matches!(slot.phase, JobPhase::Submitting | JobPhase::Polling) {
                    tracing::warn!(
                        "Duplicate submit rejected for {} ({})",
                        key.video_id,
                        key.language
                    );
                    return Err(JobError::Conflict {
                        video_id: key.video_id,
                        language,
                    });
                }
            }
            jobs.insert(
                key.clone(),
                JobSlot {
                    token,
                    phase: JobPhase::Submitting,
                    progress: ProgressEstimator::new(
                        self.config.progress_step,
                        self.config.progress_ceiling,
                    ),
                    real_status: TranscriptStatus::Pending,
                    task: None,
                },
            );
        }

        self.emit_phase(&key, JobPhase::Submitting);
        tracing::info!(
            "Submitting transcription job for {} ({})",
            key.video_id,
            key.language
        );

        if let Err(e) = self.service.create_job(&key.video_id, language).await {
            let retryable = e.is_retryable();
            tracing::error!(
                "Job submission failed for {} ({}): {}",
                key.video_id,
                key.language,
                e
            );
            if with_slot(&self.jobs, &key, token, |slot| slot.phase = JobPhase::Failed).is_some() {
                self.emit_phase(&key, JobPhase::Failed);
                send(
                    &self.events,
                    JobEvent::Failed {
                        video_id: key.video_id.clone(),
                        language,
                        retryable,
                    },
                );
            }
            return Err(JobError::Submit(e));
        }

        self.start_polling(key, token);
        Ok(())
    }

    /// Resumes status polling for a job whose timers were detached (e.g.
    /// after navigating away and back). The server-side job is untouched;
    /// nothing is resubmitted.
    pub fn resume(&self, video_id: &str, language: Language) -> Result<(), JobError> {
        let key = JobKey {
            video_id: video_id.to_string(),
            language,
        };
        let token = Uuid::new_v4();

        {
            let mut jobs = self.lock_jobs();
            let slot = jobs.get_mut(&key).ok_or_else(|| JobError::NoSuchJob {
                video_id: key.video_id.clone(),
                language,
            })?;
            if slot.phase != JobPhase::Polling {
                return Err(JobError::NoSuchJob {
                    video_id: key.video_id.clone(),
                    language,
                });
            }
            if let Some(task) = slot.task.take() {
                task.abort();
            }
            // New token supersedes any straggler tick from the old run.
            slot.token = token;
        }

        tracing::info!(
            "Resuming status polling for {} ({})",
            key.video_id,
            key.language
        );
        self.start_polling(key, token);
        Ok(())
    }

    /// Cancels both timers for one job without cancelling the server-side
    /// work. Idempotent; safe to call for unknown jobs.
    pub fn detach(&self, video_id: &str, language: Language) {
        let key = JobKey {
            video_id: video_id.to_string(),
            language,
        };
        let mut jobs = self.lock_jobs();
        if let Some(slot) = jobs.get_mut(&key) {
            if let Some(task) = slot.task.take() {
                task.abort();
                tracing::debug!("Detached job timers for {} ({})", key.video_id, key.language);
            }
        }
    }

    /// Teardown: cancels the timers of every tracked job.
    pub fn detach_all(&self) {
        let mut jobs = self.lock_jobs();
        for (key, slot) in jobs.iter_mut() {
            if let Some(task) = slot.task.take() {
                task.abort();
                tracing::debug!("Detached job timers for {} ({})", key.video_id, key.language);
            }
        }
    }

    fn start_polling(&self, key: JobKey, token: Uuid) {
        if with_slot(&self.jobs, &key, token, |slot| slot.phase = JobPhase::Polling).is_none() {
            return; // superseded while submitting
        }
        self.emit_phase(&key, JobPhase::Polling);

        let ctx = PollContext {
            service: self.service.clone(),
            jobs: self.jobs.clone(),
            events: self.events.clone(),
            config: self.config.clone(),
            key: key.clone(),
            token,
        };
        let handle = tokio::spawn(poll_loop(ctx));

        // If the slot was superseded between spawn and store, the orphaned
        // run discards itself at its first tick via the token check.
        with_slot(&self.jobs, &key, token, |slot| slot.task = Some(handle));
    }

    fn emit_phase(&self, key: &JobKey, phase: JobPhase) {
        send(
            &self.events,
            JobEvent::Phase {
                video_id: key.video_id.clone(),
                language: key.language,
                phase,
            },
        );
    }

    fn lock_jobs(&self) -> MutexGuard<'_, HashMap<JobKey, JobSlot>> {
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for JobLifecycleController {
    fn drop(&mut self) {
        self.detach_all();
    }
}

struct PollContext {
    service: Arc<dyn TranscriptionService>,
    jobs: Arc<Mutex<HashMap<JobKey, JobSlot>>>,
    events: mpsc::UnboundedSender<JobEvent>,
    config: JobConfig,
    key: JobKey,
    token: Uuid,
}

/// Runs both timers for one job: the 1s cosmetic progress estimator and the
/// 2s true status poller. Returns when the job reaches a terminal phase,
/// times out, or this run is superseded.
async fn poll_loop(ctx: PollContext) {
    let start = tokio::time::Instant::now();
    let mut progress_tick =
        tokio::time::interval_at(start + ctx.config.progress_interval, ctx.config.progress_interval);
    let mut poll_tick =
        tokio::time::interval_at(start + ctx.config.poll_interval, ctx.config.poll_interval);
    let mut attempts: u32 = 0;

    loop {
        tokio::select! {
            _ = progress_tick.tick() => {
                let Some(value) = with_slot(&ctx.jobs, &ctx.key, ctx.token, |slot| slot.progress.tick()) else {
                    return;
                };
                send(&ctx.events, JobEvent::Progress {
                    video_id: ctx.key.video_id.clone(),
                    language: ctx.key.language,
                    estimated_progress: value,
                });
            }
            _ = poll_tick.tick() => {
                match ctx.service.job_status(&ctx.key.video_id).await {
                    Ok(TranscriptStatus::Completed) => {
                        finish_completed(&ctx).await;
                        return;
                    }
                    Ok(TranscriptStatus::Failed) => {
                        if with_slot(&ctx.jobs, &ctx.key, ctx.token, |slot| {
                            slot.real_status = TranscriptStatus::Failed;
                            slot.phase = JobPhase::Failed;
                            slot.task = None;
                        })
                        .is_none()
                        {
                            return;
                        }
                        tracing::error!(
                            "Transcription failed for {} ({})",
                            ctx.key.video_id,
                            ctx.key.language
                        );
                        send(&ctx.events, JobEvent::Phase {
                            video_id: ctx.key.video_id.clone(),
                            language: ctx.key.language,
                            phase: JobPhase::Failed,
                        });
                        send(&ctx.events, JobEvent::Failed {
                            video_id: ctx.key.video_id.clone(),
                            language: ctx.key.language,
                            retryable: false,
                        });
                        return;
                    }
                    Ok(status) => {
                        if with_slot(&ctx.jobs, &ctx.key, ctx.token, |slot| slot.real_status = status)
                            .is_none()
                        {
                            return;
                        }
                    }
                    Err(e) => {
                        // Transient: reschedule rather than failing the job.
                        tracing::warn!(
                            "Status poll failed for {} ({}): {}",
                            ctx.key.video_id,
                            ctx.key.language,
                            e
                        );
                    }
                }

                attempts += 1;
                if attempts >= ctx.config.max_poll_attempts {
                    if with_slot(&ctx.jobs, &ctx.key, ctx.token, |slot| {
                        slot.phase = JobPhase::Failed;
                        slot.task = None;
                    })
                    .is_none()
                    {
                        return;
                    }
                    tracing::error!(
                        "Job for {} ({}) timed out after {} polls",
                        ctx.key.video_id,
                        ctx.key.language,
                        attempts
                    );
                    send(&ctx.events, JobEvent::Phase {
                        video_id: ctx.key.video_id.clone(),
                        language: ctx.key.language,
                        phase: JobPhase::Failed,
                    });
                    send(&ctx.events, JobEvent::TimedOut {
                        video_id: ctx.key.video_id.clone(),
                        language: ctx.key.language,
                        attempts,
                    });
                    return;
                }
            }
        }
    }
}

async fn finish_completed(ctx: &PollContext) {
    let Some(value) = with_slot(&ctx.jobs, &ctx.key, ctx.token, |slot| {
        slot.real_status = TranscriptStatus::Completed;
        slot.phase = JobPhase::Completed;
        slot.task = None;
        slot.progress.complete()
    }) else {
        return;
    };

    send(&ctx.events, JobEvent::Progress {
        video_id: ctx.key.video_id.clone(),
        language: ctx.key.language,
        estimated_progress: value,
    });
    send(&ctx.events, JobEvent::Phase {
        video_id: ctx.key.video_id.clone(),
        language: ctx.key.language,
        phase: JobPhase::Completed,
    });
    tracing::info!(
        "Transcription completed for {} ({})",
        ctx.key.video_id,
        ctx.key.language
    );

    match ctx
        .service
        .fetch_transcript(&ctx.key.video_id, ctx.key.language)
        .await
    {
        Ok(transcript) => {
            send(&ctx.events, JobEvent::TranscriptReady {
                video_id: ctx.key.video_id.clone(),
                language: ctx.key.language,
                transcript,
            });
        }
        Err(e) => {
            tracing::error!(
                "Transcript refetch failed for {} ({}): {}",
                ctx.key.video_id,
                ctx.key.language,
                e
            );
        }
    }
}

fn with_slot<R>(
    jobs: &Mutex<HashMap<JobKey, JobSlot>>,
    key: &JobKey,
    token: Uuid,
    f: impl FnOnce(&mut JobSlot) -> R,
) -> Option<R> {
    let mut jobs = jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let slot = jobs.get_mut(key)?;
    if slot.token != token {
        return None;
    }
    Some(f(slot))
}

fn send(events: &mpsc::UnboundedSender<JobEvent>, event: JobEvent) {
    if events.send(event).is_err() {
        tracing::debug!("Job event receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Segment;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Scripted transcription service: replays a status sequence, repeating
    /// the last step once the script runs out. `None` steps simulate a
    /// transient network failure on that poll.
    struct ScriptedService {
        fail_submit: bool,
        statuses: Mutex<VecDeque<Option<TranscriptStatus>>>,
        submit_calls: AtomicU32,
        status_calls: AtomicU32,
    }

    impl ScriptedService {
        fn with_statuses(steps: impl IntoIterator<Item = Option<TranscriptStatus>>) -> Self {
            Self {
                fail_submit: false,
                statuses: Mutex::new(steps.into_iter().collect()),
                submit_calls: AtomicU32::new(0),
                status_calls: AtomicU32::new(0),
            }
        }

        fn failing_submit() -> Self {
            let mut service = Self::with_statuses([]);
            service.fail_submit = true;
            service
        }
    }

    #[async_trait]
    impl TranscriptionService for ScriptedService {
        async fn create_job(&self, _video_id: &str, _language: Language) -> Result<(), ServiceError> {
            self.submit_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_submit {
                Err(ServiceError::Network("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        async fn job_status(&self, _video_id: &str) -> Result<TranscriptStatus, ServiceError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let mut statuses = self.statuses.lock().unwrap();
            let step = if statuses.len() > 1 {
                statuses.pop_front().unwrap()
            } else {
                statuses.front().copied().unwrap_or(Some(TranscriptStatus::Pending))
            };
            match step {
                Some(status) => Ok(status),
                None => Err(ServiceError::Network("scripted failure".to_string())),
            }
        }

        async fn fetch_transcript(
            &self,
            _video_id: &str,
            language: Language,
        ) -> Result<Transcript, ServiceError> {
            Ok(Transcript {
                language,
                segments: vec![Segment::new(0.0, 5.0, "hello")],
                status: TranscriptStatus::Completed,
                content: "hello".to_string(),
            })
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<JobEvent>) -> Vec<JobEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    fn progress_values(events: &[JobEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                JobEvent::Progress {
                    estimated_progress, ..
                } => Some(*estimated_progress),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_sequence_drives_completion() {
        let service = Arc::new(ScriptedService::with_statuses([
            Some(TranscriptStatus::Pending),
            Some(TranscriptStatus::Processing),
            Some(TranscriptStatus::Completed),
        ]));
        let (controller, mut rx) = JobLifecycleController::new(service, JobConfig::default());

        controller.submit("vid-1", Language::En).await.unwrap();
        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Polling);

        // Polls fire at 2s, 4s, 6s; completion lands on the third.
        tokio::time::sleep(Duration::from_secs(7)).await;

        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Completed);
        assert_eq!(controller.estimated_progress("vid-1", Language::En), 100);
        assert_eq!(
            controller.real_status("vid-1", Language::En),
            Some(TranscriptStatus::Completed)
        );

        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            JobEvent::TranscriptReady { video_id, .. } if video_id == "vid-1"
        )));

        let progress = progress_values(&events);
        assert_eq!(progress.last(), Some(&100));
        assert!(progress.windows(2).all(|w| w[0] <= w[1]), "progress must be monotone");
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_submit_conflicts() {
        let service = Arc::new(ScriptedService::with_statuses([Some(
            TranscriptStatus::Pending,
        )]));
        let (controller, _rx) = JobLifecycleController::new(service.clone(), JobConfig::default());

        controller.submit("vid-1", Language::En).await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        let err = controller.submit("vid-1", Language::En).await.unwrap_err();
        assert!(matches!(err, JobError::Conflict { .. }));
        assert!(!err.is_retryable());

        // First job is unaffected: still polling, one server submission.
        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Polling);
        assert_eq!(service.submit_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_video_other_language_is_independent() {
        let service = Arc::new(ScriptedService::with_statuses([Some(
            TranscriptStatus::Pending,
        )]));
        let (controller, _rx) = JobLifecycleController::new(service, JobConfig::default());

        controller.submit("vid-1", Language::En).await.unwrap();
        controller.submit("vid-1", Language::Ar).await.unwrap();

        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Polling);
        assert_eq!(controller.phase("vid-1", Language::Ar), JobPhase::Polling);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_network_failure_surfaces_retryable() {
        let service = Arc::new(ScriptedService::failing_submit());
        let (controller, mut rx) = JobLifecycleController::new(service, JobConfig::default());

        let err = controller.submit("vid-1", Language::En).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Failed);

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, JobEvent::Failed { retryable: true, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_failure_is_terminal_not_retried() {
        let service = Arc::new(ScriptedService::with_statuses([Some(
            TranscriptStatus::Failed,
        )]));
        let (controller, mut rx) = JobLifecycleController::new(service.clone(), JobConfig::default());

        controller.submit("vid-1", Language::En).await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Failed);
        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, JobEvent::Failed { retryable: false, .. })));

        // Poller stopped: no further status requests.
        let polls = service.status_calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(service.status_calls.load(Ordering::SeqCst), polls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_poll_failures_reschedule() {
        let service = Arc::new(ScriptedService::with_statuses([
            None,
            None,
            Some(TranscriptStatus::Completed),
        ]));
        let (controller, mut rx) = JobLifecycleController::new(service, JobConfig::default());

        controller.submit("vid-1", Language::En).await.unwrap();
        tokio::time::sleep(Duration::from_secs(7)).await;

        // Two failed polls did not fail the job; the third completed it.
        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Completed);
        let events = drain(&mut rx);
        assert!(!events
            .iter()
            .any(|e| matches!(e, JobEvent::Failed { .. } | JobEvent::TimedOut { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_ceiling_times_out() {
        let config = JobConfig {
            max_poll_attempts: 3,
            ..JobConfig::default()
        };
        let service = Arc::new(ScriptedService::with_statuses([Some(
            TranscriptStatus::Processing,
        )]));
        let (controller, mut rx) = JobLifecycleController::new(service, config);

        controller.submit("vid-1", Language::En).await.unwrap();
        tokio::time::sleep(Duration::from_secs(7)).await;

        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Failed);
        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, JobEvent::TimedOut { attempts: 3, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_holds_at_ceiling_while_processing() {
        let service = Arc::new(ScriptedService::with_statuses([Some(
            TranscriptStatus::Processing,
        )]));
        let (controller, mut rx) = JobLifecycleController::new(service, JobConfig::default());

        controller.submit("vid-1", Language::En).await.unwrap();
        tokio::time::sleep(Duration::from_secs(20)).await;

        assert_eq!(controller.estimated_progress("vid-1", Language::En), 90);
        let progress = progress_values(&drain(&mut rx));
        assert!(progress.iter().all(|&v| v <= 90));
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_stops_timers_and_resume_continues() {
        let service = Arc::new(ScriptedService::with_statuses([
            Some(TranscriptStatus::Pending),
            Some(TranscriptStatus::Pending),
            Some(TranscriptStatus::Completed),
        ]));
        let (controller, mut rx) = JobLifecycleController::new(service.clone(), JobConfig::default());

        controller.submit("vid-1", Language::En).await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        controller.detach("vid-1", Language::En);
        controller.detach("vid-1", Language::En); // idempotent
        drain(&mut rx);

        // Detached: no polls and no events while away.
        let polls = service.status_calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(service.status_calls.load(Ordering::SeqCst), polls);
        assert!(drain(&mut rx).is_empty());
        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Polling);

        // Returning resumes polling without a second submission.
        controller.resume("vid-1", Language::En).unwrap();
        tokio::time::sleep(Duration::from_secs(7)).await;

        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Completed);
        assert_eq!(service.submit_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_without_job_fails() {
        let service = Arc::new(ScriptedService::with_statuses([]));
        let (controller, _rx) = JobLifecycleController::new(service, JobConfig::default());

        let err = controller.resume("vid-1", Language::En).unwrap_err();
        assert!(matches!(err, JobError::NoSuchJob { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_allowed_after_failure() {
        let service = Arc::new(ScriptedService::with_statuses([
            Some(TranscriptStatus::Failed),
            Some(TranscriptStatus::Completed),
        ]));
        let (controller, _rx) = JobLifecycleController::new(service, JobConfig::default());

        controller.submit("vid-1", Language::En).await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Failed);

        // Caller resubmits; the fresh job completes on the next poll.
        controller.submit("vid-1", Language::En).await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(controller.phase("vid-1", Language::En), JobPhase::Completed);
    }
}
