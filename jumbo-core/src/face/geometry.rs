//! Screen-space geometry for the eyes

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Sub-pixel offset from an eye centre
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.dx * self.dx + self.dy * self.dy)
    }

    /// Shrink to at most `max` length, keeping direction
    ///
    /// Vectors already within `max` are returned unchanged. A negative bound
    /// collapses to zero.
    pub fn clamp_magnitude(self, max: f32) -> Self {
        let max = max.max(0.0);
        let dist = self.magnitude();
        if dist > max && dist > 0.0 {
            let ratio = max / dist;
            Self::new(self.dx * ratio, self.dy * ratio)
        } else {
            self
        }
    }
}

/// Placement and size of one eye on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EyeGeometry {
    /// Centre of the eye disc
    pub center: Point,
    /// Eye disc radius (px)
    pub radius: u16,
    /// Unscaled pupil radius (px)
    pub pupil_radius: u16,
    /// Viewer's left eye (outer corner on the left)
    pub is_left: bool,
}

impl EyeGeometry {
    /// Geometry with the default pupil size (radius / 1.6)
    pub fn new(center: Point, radius: u16, is_left: bool) -> Self {
        Self {
            center,
            radius,
            pupil_radius: (radius as u32 * 5 / 8) as u16,
            is_left,
        }
    }

    /// Longest gaze offset that keeps the pupil `margin` px inside the eye
    pub fn gaze_limit(&self, margin: u16) -> f32 {
        self.radius as f32 - self.pupil_radius as f32 - margin as f32
    }
}
