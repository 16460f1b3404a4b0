//! Millisecond time source

use core::cell::Cell;

/// Source of the current time
///
/// Time is a free-running millisecond counter that may wrap; consumers only
/// ever look at differences computed with `wrapping_sub`.
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub const fn new(start_ms: u32) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now_ms: u32) {
        self.now.set(now_ms);
    }

    /// Move forward by `delta_ms`, wrapping at `u32::MAX`
    pub fn advance(&self, delta_ms: u32) {
        self.now.set(self.now.get().wrapping_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
