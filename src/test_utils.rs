//! Shared test doubles for the synthesis and audio seams.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::audio::{AudioEvent, AudioHandle};
use crate::error::{LipSyncError, Result};
use crate::tts::{SpeechSynthesizer, SynthesisRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

#[derive(Debug, Default)]
struct ScriptedState {
    current_time: Duration,
    duration: Option<Duration>,
    playing: bool,
    events: VecDeque<AudioEvent>,
    fail_next_play: Option<String>,
    dropped: bool,
}

/// Audio handle whose position and events are set by the test.
pub struct ScriptedAudio {
    state: Arc<Mutex<ScriptedState>>,
}

/// Test-side view of a [`ScriptedAudio`].
#[derive(Clone)]
pub struct AudioControl {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedAudio {
    pub fn new(duration: Option<Duration>) -> (Self, AudioControl) {
        let state = Arc::new(Mutex::new(ScriptedState {
            duration,
            ..ScriptedState::default()
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            AudioControl { state },
        )
    }
}

impl Drop for ScriptedAudio {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.dropped = true;
            state.playing = false;
        }
    }
}

impl AudioHandle for ScriptedAudio {
    fn play(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_next_play.take() {
            return Err(LipSyncError::Playback(message));
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().playing = false;
    }

    fn current_time(&self) -> Duration {
        self.state.lock().unwrap().current_time
    }

    fn duration(&self) -> Option<Duration> {
        self.state.lock().unwrap().duration
    }

    fn is_paused(&self) -> bool {
        !self.state.lock().unwrap().playing
    }

    fn poll_event(&mut self) -> Option<AudioEvent> {
        self.state.lock().unwrap().events.pop_front()
    }
}

impl AudioControl {
    pub fn set_time(&self, at: Duration) {
        self.state.lock().unwrap().current_time = at;
    }

    pub fn push_event(&self, event: AudioEvent) {
        self.state.lock().unwrap().events.push_back(event);
    }

    pub fn fail_next_play(&self, message: &str) {
        self.state.lock().unwrap().fail_next_play = Some(message.to_owned());
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn is_dropped(&self) -> bool {
        self.state.lock().unwrap().dropped
    }
}

/// How [`ScriptedSynthesizer`] answers requests.
#[derive(Debug, Clone)]
pub enum SynthMode {
    /// Return a [`ScriptedAudio`] right away.
    Immediate,
    /// Fail with a synthesis error.
    Fail(String),
    /// Return audio whose `play()` fails.
    FailPlay(String),
    /// Never resolve.
    Pending,
}

pub struct ScriptedSynthesizer {
    mode: Mutex<SynthMode>,
    duration: Option<Duration>,
    requests: Mutex<Vec<SynthesisRequest>>,
    controls: Mutex<Vec<AudioControl>>,
}

impl ScriptedSynthesizer {
    pub fn new(mode: SynthMode, duration: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(mode),
            duration,
            requests: Mutex::new(Vec::new()),
            controls: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn audio_controls(&self) -> Vec<AudioControl> {
        self.controls.lock().unwrap().clone()
    }

    pub fn last_audio(&self) -> Option<AudioControl> {
        self.controls.lock().unwrap().last().cloned()
    }

    fn make_audio(&self) -> ScriptedAudio {
        let (audio, control) = ScriptedAudio::new(self.duration);
        self.controls.lock().unwrap().push(control);
        audio
    }
}

#[async_trait]
impl SpeechSynthesizer for ScriptedSynthesizer {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Box<dyn AudioHandle>> {
        self.requests.lock().unwrap().push(request);
        let mode = self.mode.lock().unwrap().clone();
        match mode {
            SynthMode::Immediate => Ok(Box::new(self.make_audio())),
            SynthMode::Fail(message) => Err(LipSyncError::Synthesis(message)),
            SynthMode::FailPlay(message) => {
                let audio = self.make_audio();
                if let Some(control) = self.last_audio() {
                    control.fail_next_play(&message);
                }
                Ok(Box::new(audio))
            }
            SynthMode::Pending => std::future::pending().await,
        }
    }
}

/// Give spawned synthesis tasks a chance to run on the current-thread runtime.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Collect every event currently buffered in `rx`.
pub fn drain_events<T: Clone>(rx: &mut broadcast::Receiver<T>) -> Vec<T> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}
