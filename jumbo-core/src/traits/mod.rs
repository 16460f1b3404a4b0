//! Collaborator traits
//!
//! The core never talks to hardware directly. Time, tones, and status text
//! go through these traits; the firmware and the tests provide the
//! implementations.

pub mod clock;
pub mod output;

pub use clock::{Clock, ManualClock};
pub use output::{StatusSink, ToneDriver};
