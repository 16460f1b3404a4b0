//! Eye animation
//!
//! Each eye is an independent engine: expression morphing and blinking run
//! side by side on the same tick, and the sleep expression overrides the
//! blink lid for as long as it is active.

pub mod blink;
pub mod expression;
pub mod eye;
pub mod geometry;
pub mod params;

pub use blink::{Blink, BlinkState};
pub use expression::{params_for, Expression};
pub use eye::{Eye, EyeFrame, DEFAULT_GAZE_MARGIN};
pub use geometry::{EyeGeometry, Offset, Point};
pub use params::EyelidParams;
