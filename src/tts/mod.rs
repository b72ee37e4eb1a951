//! Speech-synthesis collaborator seam.
//!
//! The controller treats synthesis as an opaque async service: it hands over
//! a [`SynthesisRequest`] and eventually gets back an [`AudioHandle`] or an
//! error. Timeouts and retries belong to the implementation, not the caller.

mod silent;

pub use silent::{ClockedAudio, SilentSynthesizer};

use crate::audio::AudioHandle;
use crate::config::VoiceConfig;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Parameters for one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Correlates log lines for one call.
    pub request_id: Uuid,
    pub text: String,
    pub voice_id: String,
    /// Playback-rate multiplier in effect for the session.
    pub rate: f64,
    pub emotion: String,
    pub language: String,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, rate: f64, voice: &VoiceConfig) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            text: text.into(),
            voice_id: voice.voice_id.clone(),
            rate,
            emotion: voice.emotion.clone(),
            language: voice.language.clone(),
        }
    }
}

/// Asynchronous text-to-speech service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Produce a playable audio resource for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`LipSyncError::Synthesis`](crate::error::LipSyncError::Synthesis)
    /// when the service is unreachable or reports a failure.
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Box<dyn AudioHandle>>;
}
