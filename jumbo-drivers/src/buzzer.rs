//! Active buzzer output
//!
//! An active buzzer has a single pitch, so a tone is just the pin held high
//! for a while. The driver never blocks: [`ToneDriver::play_tone`] switches
//! the pin on and [`Buzzer::tick`] switches it off once the time is up.

use embedded_hal::digital::OutputPin;
use jumbo_core::traits::{Clock, ToneDriver};

/// Single-pitch buzzer on a GPIO pin
pub struct Buzzer<P, C> {
    pin: P,
    clock: C,
    started_ms: u32,
    duration_ms: u32,
    sounding: bool,
}

impl<P: OutputPin, C: Clock> Buzzer<P, C> {
    /// Create a silent buzzer
    pub fn new(mut pin: P, clock: C) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self {
            pin,
            clock,
            started_ms: 0,
            duration_ms: 0,
            sounding: false,
        })
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }

    /// Silence the buzzer once its tone has run out
    pub fn tick(&mut self) -> Result<(), P::Error> {
        if self.sounding
            && self.clock.now_ms().wrapping_sub(self.started_ms) >= self.duration_ms
        {
            self.pin.set_low()?;
            self.sounding = false;
        }
        Ok(())
    }

    /// Silence immediately
    pub fn stop(&mut self) -> Result<(), P::Error> {
        self.sounding = false;
        self.pin.set_low()
    }
}

impl<P: OutputPin, C: Clock> ToneDriver for Buzzer<P, C> {
    /// Start a tone unless one is already playing
    ///
    /// A request that arrives mid-tone is dropped, not queued or extended.
    fn play_tone(&mut self, duration_ms: u32) {
        if self.sounding || duration_ms == 0 {
            return;
        }
        if self.pin.set_high().is_ok() {
            self.started_ms = self.clock.now_ms();
            self.duration_ms = duration_ms;
            self.sounding = true;
        }
    }
}
