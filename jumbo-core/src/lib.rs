//! Board-agnostic core logic for the Jumbo face
//!
//! This crate contains all animation and playback logic that does not
//! depend on specific hardware:
//!
//! - Eyelid parameters and the expression table
//! - Per-eye animation engine (expression morphing, blink state machine, gaze)
//! - Bounded sequence queue of captioned steps
//! - Playback controller that times steps and drives both eyes
//! - Collaborator traits (clock, tone, status sink)
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod face;
pub mod playback;
pub mod sequence;
pub mod traits;
