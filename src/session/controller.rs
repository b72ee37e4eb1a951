//! Playback session controller.
//!
//! Owns one utterance at a time. The estimated-duration clock starts the
//! moment `play()` is called; synthesis runs concurrently in a spawned task
//! and its result is picked up on a later frame. All session state is
//! mutated from `&mut self` methods, so the frame callback is the only
//! path that advances it.

use crate::audio::{AudioEvent, AudioHandle, AudioSlot};
use crate::config::LipSyncConfig;
use crate::error::{LipSyncError, Result};
use crate::session::messages::{LipSyncSnapshot, SessionEvent, StopReason};
use crate::sync::{ClockTick, EstimatedClock, WordHighlighter};
use crate::timing::{DeferredQueue, TimeSource};
use crate::tts::{SpeechSynthesizer, SynthesisRequest};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const EVENT_CHANNEL_SIZE: usize = 64;

/// Plays scheduled for a later frame.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Deferred {
    Restart { text: String },
    Loop { text: String },
}

struct SynthesisOutcome {
    session: u64,
    result: Result<Box<dyn AudioHandle>>,
}

struct ActiveSession {
    id: u64,
    text: String,
    playback_rate: f64,
    clock_done: bool,
    loop_scheduled: bool,
    synthesis: Option<JoinHandle<()>>,
}

/// Drives mouth animation and word highlighting for spoken phrases.
pub struct LipSyncController {
    config: LipSyncConfig,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    time: Arc<dyn TimeSource>,
    clock: EstimatedClock,
    highlighter: WordHighlighter,
    audio: AudioSlot,
    deferred: DeferredQueue<Deferred>,
    session: Option<ActiveSession>,
    next_session_id: u64,
    last_text: Option<String>,
    playback_rate: f64,
    looping: bool,
    practice_count: u32,
    celebrated: bool,
    synth_tx: mpsc::UnboundedSender<SynthesisOutcome>,
    synth_rx: mpsc::UnboundedReceiver<SynthesisOutcome>,
    events: broadcast::Sender<SessionEvent>,
}

impl LipSyncController {
    pub fn new(
        config: LipSyncConfig,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        let (synth_tx, synth_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            highlighter: WordHighlighter::new(config.highlight.lead()),
            playback_rate: config.session.playback_rate,
            config,
            synthesizer,
            time,
            clock: EstimatedClock::new(),
            audio: AudioSlot::new(),
            deferred: DeferredQueue::new(),
            session: None,
            next_session_id: 1,
            last_text: None,
            looping: false,
            practice_count: 0,
            celebrated: false,
            synth_tx,
            synth_rx,
            events,
        }
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Start speaking `text`, superseding any active session.
    ///
    /// Returns the new session id.
    pub fn play(&mut self, text: &str) -> u64 {
        self.deferred.clear();
        if let Some(previous) = self.session.take() {
            self.teardown(previous, StopReason::Superseded);
        }

        let id = self.next_session_id;
        self.next_session_id += 1;
        let playback_rate = self.playback_rate;
        let duration = self.clock.start(
            text,
            self.config.clock.words_per_minute,
            playback_rate,
            self.time.now(),
        );
        let synthesis = self.spawn_synthesis(id, text, playback_rate);

        self.session = Some(ActiveSession {
            id,
            text: text.to_owned(),
            playback_rate,
            clock_done: false,
            loop_scheduled: false,
            synthesis,
        });
        self.last_text = Some(text.to_owned());
        info!(session = id, ?duration, playback_rate, "session started");
        self.emit(SessionEvent::Started {
            session: id,
            text: text.to_owned(),
            playback_rate,
        });

        self.practice_count = self.practice_count.saturating_add(1);
        if !self.celebrated && self.practice_count >= self.config.session.practice_threshold {
            self.celebrated = true;
            info!(practice_count = self.practice_count, "practice threshold reached");
            self.emit(SessionEvent::Celebration {
                practice_count: self.practice_count,
            });
        }
        id
    }

    /// Halt audio and animation and reset to rest. Idempotent.
    pub fn stop(&mut self) {
        self.halt(StopReason::Stopped);
    }

    /// Same teardown as [`stop`](Self::stop); the session is not resumable.
    pub fn pause(&mut self) {
        self.halt(StopReason::Paused);
    }

    /// Stop, then play the same text again after the configured delay.
    ///
    /// # Errors
    ///
    /// Returns [`LipSyncError::InvalidInput`] if nothing has been played yet.
    pub fn restart(&mut self) -> Result<()> {
        let text = self
            .session
            .as_ref()
            .map(|s| s.text.clone())
            .or_else(|| self.last_text.clone())
            .ok_or_else(|| LipSyncError::InvalidInput("nothing to restart".to_owned()))?;
        self.stop();
        let due = self.time.now() + self.config.session.restart_delay();
        self.deferred.schedule(due, Deferred::Restart { text });
        Ok(())
    }

    /// Set the playback-rate multiplier for the next `play()`.
    ///
    /// The running session keeps the rate it started with.
    pub fn set_playback_rate(&mut self, rate: f64) {
        if !(rate.is_finite() && rate > 0.0) {
            warn!(rate, "non-positive playback rate; next utterance will complete immediately");
        }
        self.playback_rate = rate;
    }

    /// Replay automatically after each natural completion.
    pub fn set_looping(&mut self, enabled: bool) {
        self.looping = enabled;
        if !enabled {
            self.deferred
                .cancel_where(|action| matches!(action, Deferred::Loop { .. }));
            if let Some(session) = self.session.as_mut() {
                session.loop_scheduled = false;
            }
        }
    }

    /// Advance one frame. Returns `true` while anything still needs frames.
    pub fn on_frame(&mut self) -> bool {
        let now = self.time.now();

        for action in self.deferred.take_due(now) {
            match action {
                Deferred::Restart { text } | Deferred::Loop { text } => {
                    self.play(&text);
                }
            }
        }

        self.drain_synthesis();
        self.drain_audio_events();

        if let Some(position) = self.audio.position() {
            self.highlighter.tick(position);
        }

        if self.clock.tick(now) == ClockTick::Completed {
            self.on_clock_completed();
        }

        self.needs_frames()
    }

    pub fn snapshot(&self) -> LipSyncSnapshot {
        let viseme = self.clock.current();
        LipSyncSnapshot {
            session: self.session.as_ref().map(|s| s.id),
            viseme,
            shape: *viseme.shape(),
            is_animating: self.clock.is_animating(),
            progress: self.clock.progress(),
            highlighted_word: self.highlighter.index(),
            practice_count: self.practice_count,
        }
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn practice_count(&self) -> u32 {
        self.practice_count
    }

    pub fn config(&self) -> &LipSyncConfig {
        &self.config
    }

    /// Whether a clock, audio handle, pending synthesis, or deferred play is still live.
    pub fn needs_frames(&self) -> bool {
        self.clock.is_animating()
            || self.highlighter.is_attached()
            || !self.audio.is_empty()
            || !self.deferred.is_empty()
            || self
                .session
                .as_ref()
                .is_some_and(|s| s.synthesis.as_ref().is_some_and(|h| !h.is_finished()))
    }

    fn spawn_synthesis(&self, session: u64, text: &str, rate: f64) -> Option<JoinHandle<()>> {
        let request = SynthesisRequest::new(text, rate, &self.config.voice);
        let tx = self.synth_tx.clone();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            let _ = tx.send(SynthesisOutcome {
                session,
                result: Err(LipSyncError::Synthesis(
                    "no async runtime available".to_owned(),
                )),
            });
            return None;
        };

        debug!(session, request_id = %request.request_id, "requesting synthesis");
        let synthesizer = Arc::clone(&self.synthesizer);
        Some(runtime.spawn(async move {
            let result = synthesizer.synthesize(request).await;
            let _ = tx.send(SynthesisOutcome { session, result });
        }))
    }

    fn drain_synthesis(&mut self) {
        let outcomes: Vec<_> = std::iter::from_fn(|| self.synth_rx.try_recv().ok()).collect();
        for outcome in outcomes {
            let Some(live) = self.session.as_mut().filter(|s| s.id == outcome.session) else {
                debug!(session = outcome.session, "dropping synthesis result for stale session");
                continue;
            };
            live.synthesis = None;

            match outcome.result {
                Ok(handle) => {
                    if let Err(e) = self.audio.attach(outcome.session, handle) {
                        self.fail_playback(outcome.session, e);
                        continue;
                    }
                    self.hold_loop_for_audio(outcome.session);
                }
                Err(e) => {
                    warn!(
                        session = outcome.session,
                        error = %e,
                        "synthesis failed; continuing on estimated clock"
                    );
                    self.emit(SessionEvent::SynthesisFailed {
                        session: outcome.session,
                        error: e,
                    });
                }
            }
        }
    }

    fn drain_audio_events(&mut self) {
        let Some(session) = self.audio.session() else {
            return;
        };
        for event in self.audio.drain_events() {
            match event {
                AudioEvent::BeganPlaying => {
                    if self.highlighter.is_attached() {
                        continue;
                    }
                    if let Some(live) = self.session.as_ref() {
                        self.highlighter.attach(&live.text);
                    }
                    info!(session, "audio playing; word highlight attached");
                    self.emit(SessionEvent::AudioAttached { session });
                }
                AudioEvent::Ended => {
                    self.highlighter.ended();
                    self.audio.detach();
                    info!(session, "audio ended");
                    self.emit(SessionEvent::AudioEnded { session });
                    self.on_natural_end();
                    return;
                }
                AudioEvent::Errored(message) => {
                    self.fail_playback(session, LipSyncError::Playback(message));
                    return;
                }
            }
        }
    }

    fn on_clock_completed(&mut self) {
        let Some(live) = self.session.as_mut() else {
            return;
        };
        live.clock_done = true;
        let (session, text, playback_rate) = (live.id, live.text.clone(), live.playback_rate);
        info!(session, "session completed");
        self.emit(SessionEvent::Completed {
            session,
            text,
            playback_rate,
        });
        self.on_natural_end();
    }

    /// Schedule the loop replay once per session.
    ///
    /// Waits for the clock to complete and for any attached audio to end.
    fn on_natural_end(&mut self) {
        if !self.looping || !self.audio.is_empty() {
            return;
        }
        let Some(live) = self.session.as_mut() else {
            return;
        };
        if live.loop_scheduled || !live.clock_done {
            return;
        }
        live.loop_scheduled = true;
        let text = live.text.clone();
        let due = self.time.now() + self.config.session.loop_delay();
        debug!(session = live.id, ?due, "scheduling loop replay");
        self.deferred.schedule(due, Deferred::Loop { text });
    }

    /// Audio that arrives after the clock finished defers an already scheduled replay.
    fn hold_loop_for_audio(&mut self, session: u64) {
        let Some(live) = self.session.as_mut().filter(|s| s.id == session) else {
            return;
        };
        if !live.loop_scheduled {
            return;
        }
        live.loop_scheduled = false;
        self.deferred
            .cancel_where(|action| matches!(action, Deferred::Loop { .. }));
        debug!(session, "late audio attached; loop replay waits for it to end");
    }

    fn fail_playback(&mut self, session: u64, error: LipSyncError) {
        error!(session, error = %error, "audio playback failed");
        self.emit(SessionEvent::PlaybackFailed { session, error });
        self.halt(StopReason::PlaybackFailed);
    }

    fn halt(&mut self, reason: StopReason) {
        self.deferred.clear();
        match self.session.take() {
            Some(live) => self.teardown(live, reason),
            None => {
                self.clock.stop();
                self.highlighter.detach();
                self.audio.detach();
            }
        }
    }

    fn teardown(&mut self, live: ActiveSession, reason: StopReason) {
        if let Some(task) = live.synthesis {
            task.abort();
        }
        let was_active = !live.clock_done || !self.audio.is_empty();
        self.clock.stop();
        self.highlighter.detach();
        self.audio.detach();
        if was_active {
            info!(session = live.id, ?reason, "session stopped");
            self.emit(SessionEvent::Stopped {
                session: live.id,
                reason,
            });
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

impl Drop for LipSyncController {
    fn drop(&mut self) {
        if let Some(task) = self.session.as_mut().and_then(|s| s.synthesis.take()) {
            task.abort();
        }
        self.audio.detach();
    }
}
