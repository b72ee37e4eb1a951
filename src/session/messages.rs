//! Events and state snapshots exposed to the surrounding UI.

use crate::error::LipSyncError;
use crate::viseme::{MouthShape, Viseme};
use serde::Serialize;

/// Why a session was torn down before finishing on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Stopped,
    Paused,
    /// A new `play()` replaced it.
    Superseded,
    PlaybackFailed,
}

/// Lifecycle notifications broadcast by the controller.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A session began animating.
    Started {
        session: u64,
        text: String,
        playback_rate: f64,
    },
    /// Synthesized audio started playing and the word highlighter attached.
    AudioAttached { session: u64 },
    /// The attached audio reached its end.
    AudioEnded { session: u64 },
    /// The estimated-duration clock reached the end of the utterance.
    ///
    /// Fires exactly once per session that is not torn down first.
    Completed {
        session: u64,
        text: String,
        playback_rate: f64,
    },
    /// The synthesis call failed. The mouth keeps moving on the heuristic clock.
    SynthesisFailed { session: u64, error: LipSyncError },
    /// The audio handle failed after starting. The session has been stopped.
    PlaybackFailed { session: u64, error: LipSyncError },
    /// A session ended early.
    Stopped { session: u64, reason: StopReason },
    /// The practice counter crossed the threshold for the first time.
    Celebration { practice_count: u32 },
}

impl SessionEvent {
    /// Session the event belongs to, if any.
    pub fn session(&self) -> Option<u64> {
        match self {
            Self::Started { session, .. }
            | Self::AudioAttached { session }
            | Self::AudioEnded { session }
            | Self::Completed { session, .. }
            | Self::SynthesisFailed { session, .. }
            | Self::PlaybackFailed { session, .. }
            | Self::Stopped { session, .. } => Some(*session),
            Self::Celebration { .. } => None,
        }
    }
}

/// Observable state for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LipSyncSnapshot {
    pub session: Option<u64>,
    pub viseme: Viseme,
    pub shape: MouthShape,
    pub is_animating: bool,
    pub progress: f64,
    /// Word currently highlighted; `None` when nothing is.
    pub highlighted_word: Option<usize>,
    pub practice_count: u32,
}
