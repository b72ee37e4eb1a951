//! Silent synthesizer whose audio timeline follows a [`TimeSource`].
//!
//! Produces no samples. Useful for driving the controller end to end
//! (demo binary, integration tests) without a speech service.

use super::{SpeechSynthesizer, SynthesisRequest};
use crate::audio::{AudioEvent, AudioHandle};
use crate::error::Result;
use crate::sync::estimate_duration;
use crate::timing::TimeSource;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct SilentSynthesizer {
    time: Arc<dyn TimeSource>,
    words_per_minute: f64,
    latency: Duration,
}

impl SilentSynthesizer {
    pub fn new(time: Arc<dyn TimeSource>, words_per_minute: f64) -> Self {
        Self {
            time,
            words_per_minute,
            latency: Duration::ZERO,
        }
    }

    /// Simulated service latency before the handle is returned.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for SilentSynthesizer {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Box<dyn AudioHandle>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let duration = estimate_duration(&request.text, self.words_per_minute, request.rate);
        debug!(request_id = %request.request_id, ?duration, "silent audio ready");
        Ok(Box::new(ClockedAudio::new(Arc::clone(&self.time), duration)))
    }
}

/// Audio handle with a known length and no sound.
pub struct ClockedAudio {
    time: Arc<dyn TimeSource>,
    duration: Duration,
    played: Duration,
    resumed_at: Option<Duration>,
    began_reported: bool,
    ended_reported: bool,
}

impl ClockedAudio {
    pub fn new(time: Arc<dyn TimeSource>, duration: Duration) -> Self {
        Self {
            time,
            duration,
            played: Duration::ZERO,
            resumed_at: None,
            began_reported: false,
            ended_reported: false,
        }
    }
}

impl AudioHandle for ClockedAudio {
    fn play(&mut self) -> Result<()> {
        if self.resumed_at.is_none() && !self.ended_reported {
            self.resumed_at = Some(self.time.now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(since) = self.resumed_at.take() {
            self.played += self.time.now().saturating_sub(since);
        }
    }

    fn current_time(&self) -> Duration {
        let running = self
            .resumed_at
            .map(|since| self.time.now().saturating_sub(since))
            .unwrap_or_default();
        (self.played + running).min(self.duration)
    }

    fn duration(&self) -> Option<Duration> {
        Some(self.duration)
    }

    fn is_paused(&self) -> bool {
        self.resumed_at.is_none()
    }

    fn poll_event(&mut self) -> Option<AudioEvent> {
        if self.resumed_at.is_some() && !self.began_reported {
            self.began_reported = true;
            return Some(AudioEvent::BeganPlaying);
        }
        if self.began_reported && !self.ended_reported && self.current_time() >= self.duration {
            self.ended_reported = true;
            self.pause();
            return Some(AudioEvent::Ended);
        }
        None
    }
}
