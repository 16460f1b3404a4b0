//! Face rendering for the Jumbo face
//!
//! This crate provides:
//! - `Shape`, the closed set of primitives everything is drawn from
//! - `EyeRenderer`, which turns an `EyeFrame` snapshot into shapes
//! - `TextBox`, word-wrapped monospace text
//! - `FaceScreen`, the full-screen composition, which also acts as the
//!   status/caption sink for the playback controller
//!
//! # Architecture
//!
//! Everything draws through `embedded-graphics` onto any 1-bit
//! `DrawTarget`. The firmware supplies an SSD1306 framebuffer; tests use an
//! in-memory one.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod eye;
pub mod screen;
pub mod shapes;
pub mod text;

// Re-export key types
pub use eye::EyeRenderer;
pub use screen::{FaceScreen, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use shapes::Shape;
pub use text::{font_for_height, Align, TextBox, WordWrap};
