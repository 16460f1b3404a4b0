//! Frame tick task
//!
//! Paces the face task: one signal per frame, carrying the timestamp the
//! frame should be computed for.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use jumbo_core::traits::Clock;

use crate::clock::EmbassyClock;

/// Signal to notify the face task of a new frame
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - sends a timestamp every `frame_ms`
#[embassy_executor::task]
pub async fn tick_task(frame_ms: u32) {
    info!("Tick task started ({}ms frames)", frame_ms);

    let mut ticker = Ticker::every(Duration::from_millis(frame_ms.max(1) as u64));

    loop {
        ticker.next().await;
        // A slow frame just coalesces with the next one
        TICK_SIGNAL.signal(EmbassyClock.now_ms());
    }
}
