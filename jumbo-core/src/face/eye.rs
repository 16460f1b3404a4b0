//! Eye animation engine
//!
//! One engine per eye. It owns the expression morph (a timed linear blend
//! from wherever the lids currently are to the target expression), the blink
//! state machine, and the gaze offset. The renderer only ever reads the
//! [`EyeFrame`] snapshot produced after each tick.

use super::blink::{progress, Blink, BlinkState};
use super::expression::Expression;
use super::geometry::{EyeGeometry, Offset, Point};
use super::params::EyelidParams;
use crate::config::BlinkConfig;

/// Default gap between pupil edge and eye edge when looking around (px)
pub const DEFAULT_GAZE_MARGIN: u16 = 2;

/// Period divisor of the happy bounce (ms per radian)
const BOUNCE_PERIOD_MS: f32 = 50.0;

/// Peak amplitude of the happy bounce (px)
const BOUNCE_AMPLITUDE_PX: f32 = 1.5;

/// Read-only snapshot handed to the renderer each frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeFrame {
    /// Eye placement and size
    pub geometry: EyeGeometry,
    /// Expression being shown or morphed toward
    pub expression: Expression,
    /// Interpolated lid parameters
    pub params: EyelidParams,
    /// Fraction of the eye height covered by the blink lid, top-down
    pub blink_percent: f32,
    /// Pupil offset from the eye centre
    pub gaze: Offset,
    /// Vertical jiggle applied to the whole eye (px, truncated toward zero)
    pub bounce_px: i32,
}

impl EyeFrame {
    /// Pupil is hidden once the blink lid fully covers the eye
    pub fn pupil_visible(&self) -> bool {
        self.blink_percent < 1.0
    }

    /// Pupil radius after applying the pupil scale
    pub fn scaled_pupil_radius(&self) -> u32 {
        let r = self.geometry.pupil_radius as f32 * self.params.pupil_scale;
        if r.is_finite() && r > 0.0 {
            r as u32
        } else {
            0
        }
    }
}

/// Animation engine for a single eye
#[derive(Debug, Clone)]
pub struct Eye {
    geometry: EyeGeometry,
    timing: BlinkConfig,
    gaze_margin: u16,

    expression: Expression,
    current: EyelidParams,
    start: EyelidParams,
    target: EyelidParams,
    morph_start_ms: u32,
    morph_duration_ms: u32,
    animating: bool,

    blink: Blink,
    gaze: Offset,
    bounce_px: i32,
}

impl Eye {
    /// Create an eye already shut in the sleep expression
    pub fn new(geometry: EyeGeometry, timing: BlinkConfig, gaze_margin: u16) -> Self {
        let sleep = Expression::Sleep.params();
        Self {
            geometry,
            timing,
            gaze_margin,
            expression: Expression::Sleep,
            current: sleep,
            start: sleep,
            target: sleep,
            morph_start_ms: 0,
            morph_duration_ms: 0,
            animating: false,
            blink: Blink::new(),
            gaze: Offset::ZERO,
            bounce_px: 0,
        }
    }

    /// Morph toward `expression` over `duration_ms`
    ///
    /// The blend starts from the current interpolated lids, so retargeting
    /// mid-morph never jumps. A zero duration snaps immediately.
    pub fn set_expression(&mut self, expression: Expression, duration_ms: u32, now_ms: u32) {
        self.expression = expression;
        self.target = expression.params();
        self.start = self.current;
        self.morph_start_ms = now_ms;
        self.morph_duration_ms = duration_ms;
        self.animating = true;

        if duration_ms == 0 {
            self.current = self.target;
            self.animating = false;
        }
    }

    /// Start a blink if the eye is resting
    pub fn trigger_blink(&mut self, now_ms: u32) -> bool {
        self.blink.trigger(now_ms)
    }

    /// Point the pupil toward `target`, keeping it inside the eye
    pub fn set_gaze(&mut self, target: Point) {
        let raw = Offset::new(
            (target.x - self.geometry.center.x) as f32,
            (target.y - self.geometry.center.y) as f32,
        );
        self.gaze = raw.clamp_magnitude(self.geometry.gaze_limit(self.gaze_margin));
    }

    /// Advance morph and blink to `now_ms`
    pub fn tick(&mut self, now_ms: u32) {
        if self.animating {
            let elapsed = now_ms.wrapping_sub(self.morph_start_ms);
            let t = progress(elapsed, self.morph_duration_ms);
            if t >= 1.0 {
                self.current = self.target;
                self.animating = false;
            } else {
                self.current = self.start.lerp(&self.target, t);
            }
        }

        self.bounce_px = if self.expression == Expression::Happy && !self.animating {
            (libm::sinf(now_ms as f32 / BOUNCE_PERIOD_MS) * BOUNCE_AMPLITUDE_PX) as i32
        } else {
            0
        };

        if self.expression.is_sleep() {
            self.blink.hold_closed();
            return;
        }

        self.blink.tick(now_ms, &self.timing);
    }

    /// Snapshot for the renderer
    pub fn frame(&self) -> EyeFrame {
        EyeFrame {
            geometry: self.geometry,
            expression: self.expression,
            params: self.current,
            blink_percent: self.blink.percent(),
            gaze: self.gaze,
            bounce_px: self.bounce_px,
        }
    }

    pub fn expression(&self) -> Expression {
        self.expression
    }

    pub fn params(&self) -> EyelidParams {
        self.current
    }

    pub fn target_params(&self) -> EyelidParams {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn blink_state(&self) -> BlinkState {
        self.blink.state()
    }

    pub fn blink_percent(&self) -> f32 {
        self.blink.percent()
    }

    pub fn gaze(&self) -> Offset {
        self.gaze
    }

    pub fn geometry(&self) -> &EyeGeometry {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eye() -> Eye {
        Eye::new(
            EyeGeometry::new(Point::new(32, 26), 20, true),
            BlinkConfig::default(),
            DEFAULT_GAZE_MARGIN,
        )
    }

    fn awake_eye(expression: Expression) -> Eye {
        let mut e = eye();
        e.set_expression(expression, 0, 0);
        e.tick(0);
        e
    }

    #[test]
    fn test_starts_asleep() {
        let e = eye();
        assert_eq!(e.expression(), Expression::Sleep);
        assert_eq!(e.params(), Expression::Sleep.params());
        assert!(!e.is_animating());
    }

    #[test]
    fn test_zero_duration_snaps() {
        for expr in Expression::ALL {
            let mut e = eye();
            e.set_expression(expr, 0, 100);
            assert_eq!(e.params(), expr.params());
            assert!(!e.is_animating());
        }
    }

    #[test]
    fn test_morph_completes_at_duration() {
        let mut e = awake_eye(Expression::Angry);
        e.set_expression(Expression::Shocked, 500, 1000);
        assert!(e.is_animating());

        e.tick(1500);
        assert_eq!(e.params(), Expression::Shocked.params());
        assert!(!e.is_animating());
    }

    #[test]
    fn test_morph_halfway() {
        let mut e = awake_eye(Expression::Angry);
        e.set_expression(Expression::Happy, 400, 0);
        e.tick(200);

        let p = e.params();
        assert!((p.top_outer - -0.65).abs() < 1e-6);
        assert!((p.top_inner - -0.15).abs() < 1e-6);
        assert!((p.bottom_outer - 0.65).abs() < 1e-6);
        assert!(e.is_animating());
    }

    #[test]
    fn test_retarget_mid_morph_starts_from_current() {
        let mut e = awake_eye(Expression::Angry);
        e.set_expression(Expression::Happy, 400, 0);
        e.tick(200);
        let midway = e.params();

        e.set_expression(Expression::Sad, 400, 200);
        e.tick(200);
        assert_eq!(e.params(), midway);
    }

    #[test]
    fn test_blink_runs_during_morph() {
        let mut e = awake_eye(Expression::Calm);
        e.set_expression(Expression::Angry, 500, 0);
        assert!(e.trigger_blink(0));

        e.tick(80);
        assert_eq!(e.blink_state(), BlinkState::Closed);
        assert!(e.is_animating());
    }

    #[test]
    fn test_blink_round_trip() {
        let mut e = awake_eye(Expression::Calm);
        e.trigger_blink(10);
        let mut now = 10;
        while now <= 10 + 80 + 50 + 80 + 10 {
            now += 5;
            e.tick(now);
        }
        assert_eq!(e.blink_state(), BlinkState::Resting);
        assert_eq!(e.blink_percent(), 0.0);
    }

    #[test]
    fn test_sleep_forces_closed() {
        let mut e = awake_eye(Expression::Happy);
        e.set_expression(Expression::Sleep, 1000, 0);
        for now in (0..3000).step_by(33) {
            e.tick(now);
            assert_eq!(e.blink_percent(), 1.0);
            assert_eq!(e.blink_state(), BlinkState::Closed);
        }
        assert!(!e.frame().pupil_visible());
    }

    #[test]
    fn test_blink_trigger_ignored_while_asleep() {
        let mut e = eye();
        e.tick(0);
        assert!(!e.trigger_blink(10));
    }

    #[test]
    fn test_wakes_from_sleep() {
        let mut e = eye();
        e.tick(0);
        e.set_expression(Expression::Calm, 500, 1000);
        e.tick(1000);
        assert_eq!(e.blink_state(), BlinkState::Opening);
        e.tick(1080);
        assert_eq!(e.blink_state(), BlinkState::Resting);
        assert_eq!(e.blink_percent(), 0.0);
    }

    #[test]
    fn test_gaze_far_target_clamped() {
        let mut e = eye();
        e.set_gaze(Point::new(32 + 300, 26 + 400));
        let g = e.gaze();
        assert!((g.magnitude() - 6.0).abs() < 1e-4);
        assert!((g.dx - 3.6).abs() < 1e-4);
        assert!((g.dy - 4.8).abs() < 1e-4);
    }

    #[test]
    fn test_gaze_near_target_unchanged() {
        let mut e = eye();
        e.set_gaze(Point::new(35, 22));
        assert_eq!(e.gaze(), Offset::new(3.0, -4.0));
    }

    #[test]
    fn test_happy_bounce_only_when_settled() {
        let mut e = awake_eye(Expression::Angry);
        e.set_expression(Expression::Happy, 500, 0);
        e.tick(79);
        assert_eq!(e.frame().bounce_px, 0);

        e.tick(579); // settled; sin(579/50) ~ -0.88
        assert_eq!(e.frame().bounce_px, -1);
    }

    #[test]
    fn test_happy_bounce_truncates_toward_zero() {
        let mut e = awake_eye(Expression::Happy);
        // sin(0.4) * 1.5 ~ 0.58
        e.tick(20);
        assert_eq!(e.frame().bounce_px, 0);
        // sin(1.6) * 1.5 ~ 1.5
        e.tick(80);
        assert_eq!(e.frame().bounce_px, 1);
        // sin(4.6) * 1.5 ~ -1.49
        e.tick(230);
        assert_eq!(e.frame().bounce_px, -1);
    }

    #[test]
    fn test_scaled_pupil_radius() {
        let e = awake_eye(Expression::Shocked);
        assert_eq!(e.frame().scaled_pupil_radius(), 6);
    }

    proptest! {
        #[test]
        fn prop_morph_stays_within_band(
            from in 0usize..6,
            to in 0usize..6,
            duration in 1u32..5000,
            at in 0u32..6000,
        ) {
            let from = Expression::ALL[from];
            let to = Expression::ALL[to];
            let mut e = awake_eye(from);
            e.set_expression(to, duration, 0);
            e.tick(at);

            let a = from.params().to_array();
            let b = to.params().to_array();
            let c = e.params().to_array();
            for i in 0..5 {
                let lo = a[i].min(b[i]) - 1e-6;
                let hi = a[i].max(b[i]) + 1e-6;
                prop_assert!(c[i] >= lo && c[i] <= hi);
            }
            if at >= duration {
                prop_assert_eq!(e.params(), to.params());
                prop_assert!(!e.is_animating());
            }
        }

        #[test]
        fn prop_gaze_never_exceeds_limit(x in -500i32..500, y in -500i32..500) {
            let mut e = eye();
            e.set_gaze(Point::new(x, y));
            prop_assert!(e.gaze().magnitude() <= 6.0 + 1e-4);
        }
    }
}
