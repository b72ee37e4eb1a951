//! Single-slot owner for the live audio handle.

use super::{AudioEvent, AudioHandle};
use crate::error::Result;
use crate::sync::AudioPosition;
use tracing::debug;

struct Attached {
    session: u64,
    handle: Box<dyn AudioHandle>,
}

/// Holds at most one audio handle, tagged with the session that owns it.
///
/// Replacing the handle is always detach-then-attach: the old handle is
/// paused and dropped before the new one starts.
#[derive(Default)]
pub struct AudioSlot {
    attached: Option<Attached>,
}

impl AudioSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detach whatever is held, then start `handle` for `session`.
    ///
    /// # Errors
    ///
    /// Returns the handle's playback error. The slot is left empty.
    pub fn attach(&mut self, session: u64, mut handle: Box<dyn AudioHandle>) -> Result<()> {
        self.detach();
        handle.play()?;
        debug!(session, "audio handle attached");
        self.attached = Some(Attached { session, handle });
        Ok(())
    }

    /// Pause and drop the held handle. Returns the session it belonged to.
    pub fn detach(&mut self) -> Option<u64> {
        let mut attached = self.attached.take()?;
        attached.handle.pause();
        debug!(session = attached.session, "audio handle detached");
        Some(attached.session)
    }

    /// Drain every pending event from the held handle.
    pub fn drain_events(&mut self) -> Vec<AudioEvent> {
        let Some(attached) = self.attached.as_mut() else {
            return Vec::new();
        };
        std::iter::from_fn(|| attached.handle.poll_event()).collect()
    }

    pub fn position(&self) -> Option<AudioPosition> {
        self.attached.as_ref().map(|a| AudioPosition {
            current_time: a.handle.current_time(),
            duration: a.handle.duration(),
            paused: a.handle.is_paused(),
        })
    }

    pub fn session(&self) -> Option<u64> {
        self.attached.as_ref().map(|a| a.session)
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_none()
    }
}

impl std::fmt::Debug for AudioSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSlot")
            .field("session", &self.session())
            .finish()
    }
}
