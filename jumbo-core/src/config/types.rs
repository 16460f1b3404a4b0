//! Configuration type definitions
//!
//! One immutable [`FaceConfig`] is built at startup (from `face.toml` or the
//! defaults below) and handed to the constructors that need it. Nothing in
//! here changes after boot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::face::{EyeGeometry, Expression, Point, DEFAULT_GAZE_MARGIN};

/// Blink phase durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlinkConfig {
    /// Lid travel time when closing (ms)
    pub close_ms: u32,
    /// Time held fully closed (ms)
    pub closed_pause_ms: u32,
    /// Lid travel time when opening (ms)
    pub open_ms: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            close_ms: 80,
            closed_pause_ms: 50,
            open_ms: 80,
        }
    }
}

impl BlinkConfig {
    /// Length of a full blink cycle (ms)
    pub const fn cycle_ms(&self) -> u32 {
        self.close_ms + self.closed_pause_ms + self.open_ms
    }
}

/// Step playback behavior
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaybackConfig {
    /// Morph time when a step starts (ms)
    pub step_morph_ms: u32,
    /// Morph time when falling back to sleep (ms)
    pub idle_morph_ms: u32,
    /// Probability of an autonomous blink on any awake tick
    pub blink_chance: f32,
    /// Expression used for step names that match nothing
    pub fallback: Expression,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_morph_ms: 500,
            idle_morph_ms: 1000,
            blink_chance: 0.015,
            fallback: Expression::Angry,
        }
    }
}

impl PlaybackConfig {
    /// Blink chance clamped to a valid probability
    pub fn blink_probability(&self) -> f64 {
        if self.blink_chance.is_finite() {
            self.blink_chance.clamp(0.0, 1.0) as f64
        } else {
            0.0
        }
    }
}

/// Placement of the two eyes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutConfig {
    /// Viewer's left eye
    pub left: EyeGeometry,
    /// Viewer's right eye
    pub right: EyeGeometry,
    /// Gap kept between pupil and eye edge when gazing (px)
    pub gaze_margin: u16,
}

impl Default for LayoutConfig {
    /// Two 20px eyes on a 128x64 panel
    fn default() -> Self {
        Self {
            left: EyeGeometry::new(Point::new(32, 26), 20, true),
            right: EyeGeometry::new(Point::new(96, 26), 20, false),
            gaze_margin: DEFAULT_GAZE_MARGIN,
        }
    }
}

/// Producer-side refill behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeedConfig {
    /// Ask for more steps when fewer than this many are queued
    pub low_water: u8,
    /// Minimum time between refill requests (ms)
    pub refill_interval_ms: u32,
    /// Time a boot request may go unanswered before it is repeated (ms)
    pub boot_retry_ms: u32,
    /// How long each boot milestone stays on screen (ms)
    pub boot_hold_ms: u32,
    /// Host silence after which the link counts as lost (ms, 0 = never)
    pub link_timeout_ms: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            low_water: 5,
            refill_interval_ms: 10_000,
            boot_retry_ms: 2_000,
            boot_hold_ms: 1_000,
            link_timeout_ms: 15_000,
        }
    }
}

/// Display panel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// 7-bit I2C address of the panel
    pub i2c_address: u8,
    /// Panel contrast (0-255)
    pub contrast: u8,
    /// Frame period (ms)
    pub frame_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            i2c_address: 0x3C,
            contrast: 0xCF,
            frame_ms: 30,
        }
    }
}

/// Complete face configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceConfig {
    pub blink: BlinkConfig,
    pub playback: PlaybackConfig,
    pub layout: LayoutConfig,
    pub feed: FeedConfig,
    pub display: DisplayConfig,
}
