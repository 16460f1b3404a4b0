//! Blink state machine
//!
//! Cycles Resting → Closing → Closed → Opening → Resting, independent of
//! expression morphing. Each transition is stamped with the tick time so the
//! next phase can be measured from it.

use crate::config::BlinkConfig;

/// Blink phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkState {
    /// Eye open, waiting for a trigger
    Resting,
    /// Lid coming down
    Closing,
    /// Lid fully down, holding
    Closed,
    /// Lid going back up
    Opening,
}

/// Blink state machine for one eye
#[derive(Debug, Clone)]
pub struct Blink {
    state: BlinkState,
    /// 0.0 = fully open, 1.0 = fully closed
    percent: f32,
    /// Tick time of the last state change (ms)
    changed_ms: u32,
}

impl Default for Blink {
    fn default() -> Self {
        Self::new()
    }
}

impl Blink {
    /// Create a resting blink machine
    pub const fn new() -> Self {
        Self {
            state: BlinkState::Resting,
            percent: 0.0,
            changed_ms: 0,
        }
    }

    /// Current phase
    pub fn state(&self) -> BlinkState {
        self.state
    }

    /// Fraction of the eye covered by the lid
    pub fn percent(&self) -> f32 {
        self.percent
    }

    /// Start a blink
    ///
    /// Only valid from `Resting`. Returns true if a blink was started.
    pub fn trigger(&mut self, now_ms: u32) -> bool {
        if self.state != BlinkState::Resting {
            return false;
        }
        self.state = BlinkState::Closing;
        self.changed_ms = now_ms;
        true
    }

    /// Hold the eye fully shut, bypassing the phase timing
    ///
    /// The stamp is left untouched, so once the hold is released the machine
    /// leaves `Closed` on the next tick.
    pub fn hold_closed(&mut self) {
        self.state = BlinkState::Closed;
        self.percent = 1.0;
    }

    /// Advance the machine to `now_ms`
    pub fn tick(&mut self, now_ms: u32, timing: &BlinkConfig) {
        let elapsed = now_ms.wrapping_sub(self.changed_ms);

        match self.state {
            BlinkState::Resting => {
                self.percent = 0.0;
            }
            BlinkState::Closing => {
                let p = progress(elapsed, timing.close_ms);
                self.percent = p;
                if p >= 1.0 {
                    self.state = BlinkState::Closed;
                    self.changed_ms = now_ms;
                }
            }
            BlinkState::Closed => {
                self.percent = 1.0;
                if elapsed >= timing.closed_pause_ms {
                    self.state = BlinkState::Opening;
                    self.changed_ms = now_ms;
                }
            }
            BlinkState::Opening => {
                let p = progress(elapsed, timing.open_ms);
                self.percent = 1.0 - p;
                if p >= 1.0 {
                    self.state = BlinkState::Resting;
                }
            }
        }
    }
}

/// Fraction of `duration_ms` covered by `elapsed_ms`, clamped to [0, 1]
///
/// A zero duration completes immediately.
pub(crate) fn progress(elapsed_ms: u32, duration_ms: u32) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f32 / duration_ms as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> BlinkConfig {
        BlinkConfig::default()
    }

    #[test]
    fn test_starts_resting() {
        let blink = Blink::new();
        assert_eq!(blink.state(), BlinkState::Resting);
        assert_eq!(blink.percent(), 0.0);
    }

    #[test]
    fn test_trigger_only_from_resting() {
        let mut blink = Blink::new();
        assert!(blink.trigger(0));
        assert_eq!(blink.state(), BlinkState::Closing);
        assert!(!blink.trigger(10));
    }

    #[test]
    fn test_full_cycle() {
        let t = timing();
        let mut blink = Blink::new();
        blink.trigger(1000);

        blink.tick(1040, &t);
        assert_eq!(blink.state(), BlinkState::Closing);
        assert_eq!(blink.percent(), 0.5);

        blink.tick(1080, &t);
        assert_eq!(blink.state(), BlinkState::Closed);
        assert_eq!(blink.percent(), 1.0);

        blink.tick(1130, &t);
        assert_eq!(blink.state(), BlinkState::Opening);

        blink.tick(1170, &t);
        assert_eq!(blink.percent(), 0.5);

        blink.tick(1210, &t);
        assert_eq!(blink.state(), BlinkState::Resting);
        assert_eq!(blink.percent(), 0.0);
    }

    #[test]
    fn test_percent_monotonic_per_phase() {
        let t = timing();
        let mut blink = Blink::new();
        blink.trigger(0);

        let mut last = 0.0;
        let mut now = 0;
        while blink.state() == BlinkState::Closing {
            now += 7;
            blink.tick(now, &t);
            assert!(blink.percent() >= last);
            last = blink.percent();
        }

        while blink.state() != BlinkState::Opening {
            now += 7;
            blink.tick(now, &t);
        }

        last = blink.percent();
        while blink.state() == BlinkState::Opening {
            now += 7;
            blink.tick(now, &t);
            assert!(blink.percent() <= last);
            last = blink.percent();
        }
        assert_eq!(blink.percent(), 0.0);
    }

    #[test]
    fn test_zero_durations_do_not_divide_by_zero() {
        let t = BlinkConfig {
            close_ms: 0,
            closed_pause_ms: 0,
            open_ms: 0,
        };
        let mut blink = Blink::new();
        blink.trigger(5);
        blink.tick(5, &t);
        assert_eq!(blink.state(), BlinkState::Closed);
        blink.tick(5, &t);
        assert_eq!(blink.state(), BlinkState::Opening);
        blink.tick(5, &t);
        assert_eq!(blink.state(), BlinkState::Resting);
        assert_eq!(blink.percent(), 0.0);
    }

    #[test]
    fn test_hold_closed_then_release() {
        let t = timing();
        let mut blink = Blink::new();
        blink.hold_closed();
        assert_eq!(blink.state(), BlinkState::Closed);
        assert_eq!(blink.percent(), 1.0);

        // Released long after the last stamp: opens right away
        blink.tick(10_000, &t);
        assert_eq!(blink.state(), BlinkState::Opening);
        blink.tick(10_080, &t);
        assert_eq!(blink.state(), BlinkState::Resting);
    }

    #[test]
    fn test_clock_wraparound() {
        let t = timing();
        let mut blink = Blink::new();
        blink.trigger(u32::MAX - 20);
        blink.tick(59, &t); // 80ms later across the wrap
        assert_eq!(blink.state(), BlinkState::Closed);
    }
}
