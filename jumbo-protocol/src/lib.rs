//! Jumbo step feed protocol
//!
//! This crate defines the UART protocol between the Jumbo face (device) and
//! the host that supplies sequence steps. The host pushes steps; the device
//! asks for more when its queue runs low and reports backpressure when full.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬─────┬──────┬─────────────┬──────────┐
//! │ START │ LEN │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B  │ 1B   │ 0–200B      │ 1B       │
//! └───────┴─────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Step payloads are `postcard`-encoded [`jumbo_core::sequence::SequenceStep`]s.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{DeviceMessage, HostMessage, MAX_STATUS_LEN};
