//! Configuration types
//!
//! Board-agnostic configuration structures for animation timing, eye layout,
//! and the sequence feed, plus the `face.toml` reader that fills them.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
