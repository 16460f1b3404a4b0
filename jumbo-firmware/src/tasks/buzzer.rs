//! Buzzer task
//!
//! Owns the buzzer pin. Tone requests arrive over [`TONE_CHANNEL`]; between
//! requests the task wakes periodically to switch a finished tone off.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_time::Timer;
use jumbo_core::traits::ToneDriver;
use jumbo_drivers::Buzzer;

use crate::channels::TONE_CHANNEL;
use crate::clock::EmbassyClock;

/// How often a running tone is checked for expiry
const CHECK_MS: u64 = 10;

/// Buzzer task - plays tones requested by the face task
#[embassy_executor::task]
pub async fn buzzer_task(pin: Output<'static>) {
    info!("Buzzer task started");

    let mut buzzer = match Buzzer::new(pin, EmbassyClock) {
        Ok(buzzer) => buzzer,
        Err(e) => match e {},
    };

    loop {
        if buzzer.is_sounding() {
            match select(TONE_CHANNEL.receive(), Timer::after_millis(CHECK_MS)).await {
                Either::First(duration_ms) => {
                    // Dropped by the driver while a tone is already playing
                    debug!("Tone {}ms requested mid-tone", duration_ms);
                    buzzer.play_tone(duration_ms);
                }
                Either::Second(()) => {}
            }
        } else {
            let duration_ms = TONE_CHANNEL.receive().await;
            debug!("Tone {}ms", duration_ms);
            buzzer.play_tone(duration_ms);
        }

        if let Err(e) = buzzer.tick() {
            match e {}
        }
    }
}
