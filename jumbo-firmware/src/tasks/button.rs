//! Standby button task

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};
use jumbo_core::traits::Clock;
use jumbo_drivers::{StandbyButton, DEFAULT_LOCKOUT_MS};

use crate::channels::set_standby;
use crate::clock::EmbassyClock;

/// Button sampling period
const POLL_MS: u64 = 10;

/// Button task - toggles standby on each accepted press
#[embassy_executor::task]
pub async fn button_task(pin: Input<'static>) {
    info!("Button task started");

    let mut button = StandbyButton::new(pin, DEFAULT_LOCKOUT_MS);
    let mut ticker = Ticker::every(Duration::from_millis(POLL_MS));

    loop {
        ticker.next().await;

        match button.poll(EmbassyClock.now_ms()) {
            Ok(Some(standby)) => {
                info!("Standby {}", if standby { "on" } else { "off" });
                set_standby(standby);
            }
            Ok(None) => {}
            Err(e) => match e {},
        }
    }
}
