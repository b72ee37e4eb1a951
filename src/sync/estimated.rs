//! Estimated-duration clock: animates visemes from text length alone.
//!
//! The utterance length is guessed from the word count and a speaking rate,
//! so the mouth starts moving the moment `start` is called, whether or not
//! synthesized audio ever arrives.

use crate::viseme::{self, Viseme};
use std::time::Duration;

/// Result of advancing the clock by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// No run is active; nothing to do.
    Idle,
    /// Still animating; schedule another frame.
    Running,
    /// Progress reached 1 on this tick. Reported once per run.
    Completed,
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Heuristic utterance length: `words / wpm * 60s / playback_rate`.
///
/// Non-positive or non-finite rates yield zero, which completes on the
/// first tick.
pub fn estimate_duration(text: &str, words_per_minute: f64, playback_rate: f64) -> Duration {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(words_per_minute) || !valid(playback_rate) {
        return Duration::ZERO;
    }
    let base_ms = word_count(text) as f64 / words_per_minute * 60_000.0;
    let ms = base_ms / playback_rate;
    if ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

#[derive(Debug, Clone)]
struct ClockRun {
    sequence: Vec<Viseme>,
    duration: Duration,
    started_at: Duration,
}

/// Frame-driven viseme clock for a single utterance at a time.
#[derive(Debug, Clone)]
pub struct EstimatedClock {
    run: Option<ClockRun>,
    current: Viseme,
    progress: f64,
    animating: bool,
}

impl Default for EstimatedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatedClock {
    pub fn new() -> Self {
        Self {
            run: None,
            current: Viseme::Rest,
            progress: 0.0,
            animating: false,
        }
    }

    /// Begin a run, replacing any previous one outright.
    ///
    /// Shows the first viseme immediately. Completion is only ever reported
    /// from [`tick`](Self::tick), even when the duration is zero.
    pub fn start(
        &mut self,
        text: &str,
        words_per_minute: f64,
        playback_rate: f64,
        now: Duration,
    ) -> Duration {
        self.stop();
        let sequence = viseme::text_to_visemes(text);
        let duration = estimate_duration(text, words_per_minute, playback_rate);
        self.current = sequence[0];
        self.animating = true;
        self.run = Some(ClockRun {
            sequence,
            duration,
            started_at: now,
        });
        duration
    }

    /// Advance to `now`.
    pub fn tick(&mut self, now: Duration) -> ClockTick {
        let Some(run) = self.run.as_ref() else {
            return ClockTick::Idle;
        };

        let elapsed = now.saturating_sub(run.started_at);
        let progress = if run.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / run.duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        self.progress = self.progress.max(progress);

        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.current = Viseme::Rest;
            self.animating = false;
            self.run = None;
            return ClockTick::Completed;
        }

        self.current = viseme::viseme_at(&run.sequence, self.progress);
        ClockTick::Running
    }

    /// Cancel any run and reset to rest. Idempotent.
    pub fn stop(&mut self) {
        self.run = None;
        self.current = Viseme::Rest;
        self.progress = 0.0;
        self.animating = false;
    }

    pub fn current(&self) -> Viseme {
        self.current
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Duration of the active run, if any.
    pub fn duration(&self) -> Option<Duration> {
        self.run.as_ref().map(|r| r.duration)
    }

    /// Viseme sequence of the active run, if any.
    pub fn sequence(&self) -> Option<&[Viseme]> {
        self.run.as_ref().map(|r| r.sequence.as_slice())
    }
}
