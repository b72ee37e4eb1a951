//! Fixed-interval frame driver for a shared controller.

use super::LipSyncController;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Call [`LipSyncController::on_frame`] every `interval` until `cancel` fires.
///
/// The lock is held only for the duration of one frame, so UI code can call
/// `play()`/`stop()` on the same controller between frames.
pub fn spawn_frame_loop(
    controller: Arc<Mutex<LipSyncController>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!(?interval, "frame loop started");

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let Ok(mut ctl) = controller.lock() else {
                        error!("controller lock poisoned; stopping frame loop");
                        break;
                    };
                    ctl.on_frame();
                }
            }
        }
        debug!("frame loop stopped");
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::config::LipSyncConfig;
    use crate::session::SessionEvent;
    use crate::test_utils::drain_events;
    use crate::timing::{SystemTime, TimeSource};
    use crate::tts::SilentSynthesizer;
    use crate::viseme::Viseme;

    #[tokio::test(start_paused = true)]
    async fn drives_session_to_completion() {
        let time: Arc<dyn TimeSource> = Arc::new(SystemTime::new());
        let synth = Arc::new(SilentSynthesizer::new(Arc::clone(&time), 120.0));
        let controller = Arc::new(Mutex::new(LipSyncController::new(
            LipSyncConfig::default(),
            synth,
            time,
        )));
        let mut events = controller.lock().unwrap().subscribe();
        controller.lock().unwrap().play("hi there");

        let cancel = CancellationToken::new();
        let handle = spawn_frame_loop(
            Arc::clone(&controller),
            Duration::from_millis(16),
            cancel.clone(),
        );

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(controller.lock().unwrap().snapshot().is_animating);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let snap = controller.lock().unwrap().snapshot();
        assert_eq!(snap.viseme, Viseme::Rest);
        assert!(!snap.is_animating);
        assert_eq!(snap.highlighted_word, None);

        cancel.cancel();
        handle.await.unwrap();

        let events = drain_events(&mut events);
        assert!(events.iter().any(|e| matches!(e, SessionEvent::AudioAttached { .. })));
        assert!(events.iter().any(|e| matches!(e, SessionEvent::AudioEnded { .. })));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SessionEvent::Completed { .. }))
                .count(),
            1
        );
    }
}
