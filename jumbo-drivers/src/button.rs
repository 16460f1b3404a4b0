//! Standby button
//!
//! Active-low push button that toggles standby. A press only counts on the
//! released → pressed edge, and presses closer together than the lockout are
//! ignored.

use embedded_hal::digital::InputPin;

/// Minimum time between accepted presses (ms)
pub const DEFAULT_LOCKOUT_MS: u32 = 500;

/// Button that flips the standby flag
pub struct StandbyButton<P> {
    pin: P,
    lockout_ms: u32,
    last_accepted_ms: Option<u32>,
    was_pressed: bool,
    standby: bool,
}

impl<P: InputPin> StandbyButton<P> {
    pub fn new(pin: P, lockout_ms: u32) -> Self {
        Self {
            pin,
            lockout_ms,
            last_accepted_ms: None,
            was_pressed: false,
            standby: false,
        }
    }

    /// Current standby state
    pub fn is_standby(&self) -> bool {
        self.standby
    }

    /// Sample the pin
    ///
    /// Returns the new standby state when a press was accepted.
    pub fn poll(&mut self, now_ms: u32) -> Result<Option<bool>, P::Error> {
        let pressed = self.pin.is_low()?;
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;

        if !edge {
            return Ok(None);
        }

        let locked = self
            .last_accepted_ms
            .is_some_and(|last| now_ms.wrapping_sub(last) < self.lockout_ms);
        if locked {
            return Ok(None);
        }

        self.last_accepted_ms = Some(now_ms);
        self.standby = !self.standby;
        Ok(Some(self.standby))
    }
}
