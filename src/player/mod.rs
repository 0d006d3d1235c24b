// src/player/mod.rs
// Playback Clock Adapter - abstraction over a media player's time and seek

use serde::Serialize;
use tokio::sync::mpsc;

/// Commands forwarded to the wrapped media player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "command")]
pub enum PlayerCommand {
    Seek { secs: f64 },
    SetPlaying { playing: bool },
}

/// Abstraction over a media player's seek capability and playing flag.
///
/// The player driver reports "current time" at irregular intervals of its
/// own choosing; every report is treated as authoritative, with no smoothing
/// and no monotonicity assumption (seeks make time jump backwards). Commands
/// are fire-and-forget with no synchronous acknowledgement. Only this
/// adapter toggles the playing state.
pub trait PlaybackClock: Send + Sync {
    fn seek(&self, secs: f64);

    fn set_playing(&self, playing: bool);
}

/// Clock adapter backed by an unbounded command channel. The player driver
/// owns the receiving end and applies commands at its own pace.
pub struct CommandClock {
    tx: mpsc::UnboundedSender<PlayerCommand>,
}

impl CommandClock {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PlayerCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PlaybackClock for CommandClock {
    fn seek(&self, secs: f64) {
        if self.tx.send(PlayerCommand::Seek { secs }).is_err() {
            tracing::warn!("Player command channel closed, seek({:.2}) dropped", secs);
        }
    }

    fn set_playing(&self, playing: bool) {
        if self.tx.send(PlayerCommand::SetPlaying { playing }).is_err() {
            tracing::warn!("Player command channel closed, set_playing({}) dropped", playing);
        }
    }
}
