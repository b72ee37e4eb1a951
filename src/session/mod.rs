//! Playback sessions: the controller, its events, and the frame driver.

pub mod controller;
pub mod frame_loop;
pub mod messages;

pub use controller::LipSyncController;
pub use frame_loop::spawn_frame_loop;
pub use messages::{LipSyncSnapshot, SessionEvent, StopReason};
