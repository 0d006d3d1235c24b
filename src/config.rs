// src/config.rs
// Job lifecycle timing configuration

use std::env;
use std::time::Duration;

pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_PROGRESS_STEP: u8 = 10;
pub const DEFAULT_PROGRESS_CEILING: u8 = 90;
/// 150 polls at the default 2s cadence = 5 minutes before timing out.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 150;

/// Timing knobs for one job lifecycle controller.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Cadence of the cosmetic progress estimator.
    pub progress_interval: Duration,
    /// Cadence of the true status poller.
    pub poll_interval: Duration,
    /// Estimated-progress increment per estimator tick.
    pub progress_step: u8,
    /// Estimated progress holds here until the server reports completion.
    pub progress_ceiling: u8,
    /// Poll ticks (counting transient failures) before the job is declared
    /// timed out instead of polling forever.
    pub max_poll_attempts: u32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_millis(DEFAULT_PROGRESS_INTERVAL_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            progress_step: DEFAULT_PROGRESS_STEP,
            progress_ceiling: DEFAULT_PROGRESS_CEILING,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

impl JobConfig {
    /// Defaults overridden by `VIDSCRIPT_POLL_INTERVAL_MS`,
    /// `VIDSCRIPT_PROGRESS_INTERVAL_MS` and `VIDSCRIPT_MAX_POLL_ATTEMPTS`
    /// where set (a `.env` file is honored).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Some(ms) = env_u64("VIDSCRIPT_PROGRESS_INTERVAL_MS") {
            config.progress_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = env_u64("VIDSCRIPT_POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(attempts) = env_u64("VIDSCRIPT_MAX_POLL_ATTEMPTS") {
            config.max_poll_attempts = attempts.min(u32::MAX as u64) as u32;
        }

        config
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}: {:?}", key, raw);
            None
        }
    }
}
