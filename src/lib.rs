//! mouthsync: text-driven mouth animation for spoken phrases.
//!
//! A character's mouth moves in step with speech even though the audio is
//! synthesized asynchronously and may arrive late or not at all.
//!
//! # Architecture
//!
//! - **Viseme mapping**: text → mouth-shape sequence via a grapheme lookup
//! - **Estimated clock**: advances the mouth from text length alone, so
//!   animation never waits on synthesis
//! - **Word highlighter**: follows the real audio position (plus a lead time)
//!   once audio is playing
//! - **Session controller**: one utterance at a time; `play()` supersedes,
//!   `stop()` resets, restart and looping go through a deferred queue
//! - **Frame loop**: a tokio interval task that advances the controller

pub mod audio;
pub mod config;
pub mod error;
pub mod session;
pub mod sync;
pub mod timing;
pub mod tts;
pub mod viseme;

#[cfg(test)]
mod test_utils;

pub use config::LipSyncConfig;
pub use error::{LipSyncError, Result};
pub use session::{LipSyncController, LipSyncSnapshot, SessionEvent, spawn_frame_loop};
pub use viseme::{MouthShape, Viseme, text_to_visemes};
