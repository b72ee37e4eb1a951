//! Audio playback handles and the controller's single audio slot.
//!
//! Handles are polled cooperatively from the frame callback. Nothing is
//! pushed into controller state from outside, so dropping a handle is all
//! it takes to detach from it.

mod slot;

pub use slot::AudioSlot;

use crate::error::Result;
use std::time::Duration;

/// Lifecycle notifications from a playing audio resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// Playback actually started producing sound.
    BeganPlaying,
    /// Playback reached the end of the resource.
    Ended,
    /// The resource failed after starting.
    Errored(String),
}

/// A playable audio resource produced by a [`SpeechSynthesizer`](crate::tts::SpeechSynthesizer).
pub trait AudioHandle: Send {
    /// Begin (or resume) playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot start.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Playback position. Monotonic while playing.
    fn current_time(&self) -> Duration;

    /// Total length, once metadata has loaded.
    fn duration(&self) -> Option<Duration>;

    fn is_paused(&self) -> bool;

    /// Take the next pending lifecycle event, if any.
    fn poll_event(&mut self) -> Option<AudioEvent>;
}
