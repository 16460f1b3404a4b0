//! Hardware driver implementations
//!
//! This crate provides GPIO-level drivers used by the Jumbo face, written
//! against `embedded-hal` so they run on any board:
//!
//! - Active buzzer implementing the core tone trait
//! - Standby push button

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod buzzer;

pub use button::{StandbyButton, DEFAULT_LOCKOUT_MS};
pub use buzzer::Buzzer;
