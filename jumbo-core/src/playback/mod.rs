//! Sequence playback
//!
//! Turns queued steps into expressions, captions, and tones.

pub mod controller;

pub use controller::{
    PlaybackController, PlaybackEvent, BOOT_STATUS, IDLE_STATUS, RESUME_STATUS,
};
