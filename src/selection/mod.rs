// src/selection/mod.rs
// Transcript Selection Controller - language choice and active-segment sync

use crate::player::PlaybackClock;
use crate::transcript::{Language, SegmentIndex, SharedVideo, Transcript};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("No completed transcript available for language: {0}")]
    NotAvailable(Language),
}

/// Emitted when the active segment differs from the last emitted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentChange {
    pub previous: Option<usize>,
    pub active: Option<usize>,
}

/// Holds the transcripts available for one video, the selected language and
/// the segment index derived from it, and converts playback time updates
/// into active-segment change events.
pub struct TranscriptSelection {
    transcripts: HashMap<Language, Transcript>,
    selected: Option<Language>,
    index: Option<SegmentIndex>,
    last_active: Option<usize>,
    clock: Arc<dyn PlaybackClock>,
}

impl TranscriptSelection {
    pub fn new(clock: Arc<dyn PlaybackClock>) -> Self {
        Self {
            transcripts: HashMap::new(),
            selected: None,
            index: None,
            last_active: None,
            clock,
        }
    }

    /// Builds a selection over a public share payload, keeping completed
    /// transcripts only.
    pub fn from_shared(shared: SharedVideo, clock: Arc<dyn PlaybackClock>) -> Self {
        let mut selection = Self::new(clock);
        for transcript in shared.transcripts {
            if transcript.is_completed() {
                selection.insert_transcript(transcript);
            }
        }
        selection
    }

    /// Stores (or replaces) one language's transcript. If it is the
    /// currently selected language, the segment index is rebuilt and the
    /// active segment resets until the next time update.
    pub fn insert_transcript(&mut self, transcript: Transcript) {
        let language = transcript.language;
        let refresh = self.selected == Some(language) && transcript.is_completed();
        self.transcripts.insert(language, transcript);

        if refresh {
            let segments = self.transcripts[&language].segments.clone();
            self.index = Some(SegmentIndex::new(segments));
            self.last_active = None;
            tracing::debug!("Rebuilt segment index for selected language {}", language);
        }
    }

    pub fn selected_language(&self) -> Option<Language> {
        self.selected
    }

    pub fn transcript(&self, language: Language) -> Option<&Transcript> {
        self.transcripts.get(&language)
    }

    /// Languages with a completed transcript, i.e. those selectable.
    pub fn available_languages(&self) -> Vec<Language> {
        self.transcripts
            .values()
            .filter(|t| t.is_completed())
            .map(|t| t.language)
            .collect()
    }

    /// Switches to `language`, rebuilding the segment index. The active
    /// segment resets to none until the next time update arrives.
    pub fn select_language(&mut self, language: Language) -> Result<(), SelectionError> {
        let transcript = self
            .transcripts
            .get(&language)
            .filter(|t| t.is_completed())
            .ok_or(SelectionError::NotAvailable(language))?;

        self.index = Some(SegmentIndex::new(transcript.segments.clone()));
        self.selected = Some(language);
        self.last_active = None;

        tracing::info!(
            "Selected {} transcript ({} segments)",
            language,
            self.index.as_ref().map(|ix| ix.len()).unwrap_or(0)
        );
        Ok(())
    }

    /// Handles a playback time update. The received time is authoritative:
    /// the active segment is recomputed against `t` itself, never a value
    /// captured from an earlier update. Returns a change event only when the
    /// active segment differs from the last emitted one.
    pub fn on_time(&mut self, t: f64) -> Option<SegmentChange> {
        let active = self.index.as_ref().and_then(|ix| ix.active_segment(t));
        if active == self.last_active {
            return None;
        }

        let change = SegmentChange {
            previous: self.last_active,
            active,
        };
        self.last_active = active;
        Some(change)
    }

    /// Handles a user activating (clicking) a rendered segment: seeks the
    /// player to the segment start and marks it playing.
    pub fn on_segment_activated(&self, index: usize) {
        let Some(segment) = self.index.as_ref().and_then(|ix| ix.get(index)) else {
            tracing::warn!("Activated segment {} is out of range", index);
            return;
        };

        self.clock.seek(segment.start);
        self.clock.set_playing(true);
    }
}
