//! Embassy-backed clock

use embassy_time::Instant;
use jumbo_core::traits::Clock;

/// Milliseconds since boot, truncated to `u32`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
