//! The two independent timing drivers.
//!
//! - [`EstimatedClock`] owns the mouth shape. It runs from text length alone
//!   and never waits for audio.
//! - [`WordHighlighter`] owns the word highlight. It follows the real audio
//!   position and only runs while an audio handle is attached.
//!
//! They are advanced from the same frame callback but never read each other.

pub mod estimated;
pub mod highlight;

pub use estimated::{ClockTick, EstimatedClock, estimate_duration, word_count};
pub use highlight::{AudioPosition, HighlightTick, WordHighlighter};
