//! Audio-locked word highlighter.
//!
//! Tracks which word the listener is hearing from the real audio position,
//! shifted forward by a fixed lead time.

use crate::viseme::sequence_index;
use std::time::Duration;

/// One reading of the attached audio handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioPosition {
    pub current_time: Duration,
    /// `None` until metadata has loaded.
    pub duration: Option<Duration>,
    pub paused: bool,
}

/// Result of polling the highlighter for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightTick {
    /// Not attached to any audio.
    Detached,
    /// Attached, but duration unknown or audio paused. Keep polling.
    Waiting,
    /// Index computed for this frame.
    Highlighted(Option<usize>),
}

#[derive(Debug, Clone)]
pub struct WordHighlighter {
    lead: Duration,
    words: Vec<String>,
    index: Option<usize>,
    last_audio_time: Option<Duration>,
    attached: bool,
}

impl WordHighlighter {
    pub fn new(lead: Duration) -> Self {
        Self {
            lead,
            words: Vec::new(),
            index: None,
            last_audio_time: None,
            attached: false,
        }
    }

    /// Start tracking `text` against a freshly attached audio handle.
    pub fn attach(&mut self, text: &str) {
        self.words = text.split_whitespace().map(str::to_owned).collect();
        self.index = None;
        self.last_audio_time = None;
        self.attached = true;
    }

    /// Stop polling and clear the highlight. Idempotent.
    pub fn detach(&mut self) {
        self.attached = false;
        self.index = None;
        self.last_audio_time = None;
    }

    /// The audio reported "ended": clear the highlight and stop polling.
    pub fn ended(&mut self) {
        self.detach();
    }

    pub fn tick(&mut self, position: AudioPosition) -> HighlightTick {
        if !self.attached {
            return HighlightTick::Detached;
        }
        let Some(total) = position.duration.filter(|d| !d.is_zero()) else {
            return HighlightTick::Waiting;
        };
        if position.paused {
            return HighlightTick::Waiting;
        }

        self.last_audio_time = Some(position.current_time);
        let effective = position.current_time.saturating_add(self.lead);
        let progress = effective.as_secs_f64() / total.as_secs_f64();

        if let Some(next) = sequence_index(self.words.len(), progress) {
            self.index = Some(self.index.map_or(next, |cur| cur.max(next)));
        }
        HighlightTick::Highlighted(self.index)
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn last_audio_time(&self) -> Option<Duration> {
        self.last_audio_time
    }

    pub fn lead(&self) -> Duration {
        self.lead
    }
}
