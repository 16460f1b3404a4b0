//! Eyelid parameter set
//!
//! Five scalars describing one eye's lid geometry and pupil scale at one
//! instant. Offsets are fractions of the eye radius measured from the eye
//! centre: negative values sit toward the top of the eye, positive toward
//! the bottom.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Eyelid geometry and pupil scale for one eye
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EyelidParams {
    /// Top lid edge at the outer (ear) corner
    pub top_outer: f32,
    /// Top lid edge at the inner (nose) corner
    pub top_inner: f32,
    /// Bottom lid edge at the outer corner
    pub bottom_outer: f32,
    /// Bottom lid edge at the inner corner
    pub bottom_inner: f32,
    /// Pupil scale (1.0 = normal, <1.0 constricted, >1.0 dilated)
    pub pupil_scale: f32,
}

impl EyelidParams {
    /// Create a parameter set
    pub const fn new(
        top_outer: f32,
        top_inner: f32,
        bottom_outer: f32,
        bottom_inner: f32,
        pupil_scale: f32,
    ) -> Self {
        Self {
            top_outer,
            top_inner,
            bottom_outer,
            bottom_inner,
            pupil_scale,
        }
    }

    /// Linearly interpolate toward `target`
    ///
    /// `t` is clamped to `[0, 1]`, so the result never overshoots either end.
    pub fn lerp(&self, target: &Self, t: f32) -> Self {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: f32, b: f32| a + (b - a) * t;

        Self {
            top_outer: mix(self.top_outer, target.top_outer),
            top_inner: mix(self.top_inner, target.top_inner),
            bottom_outer: mix(self.bottom_outer, target.bottom_outer),
            bottom_inner: mix(self.bottom_inner, target.bottom_inner),
            pupil_scale: mix(self.pupil_scale, target.pupil_scale),
        }
    }

    /// All five scalars as an array, in declaration order
    pub const fn to_array(&self) -> [f32; 5] {
        [
            self.top_outer,
            self.top_inner,
            self.bottom_outer,
            self.bottom_inner,
            self.pupil_scale,
        ]
    }

    /// Check that every scalar is finite
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}
