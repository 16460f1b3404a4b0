//! Face task
//!
//! Runs the playback controller once per frame, renders both eyes plus the
//! status or caption line, and pushes the result to the panel.
//!
//! While in standby the controller is not ticked at all: the eyes stay shut
//! and any step that was playing keeps its clock running.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use jumbo_core::config::FaceConfig;
use jumbo_core::playback::{PlaybackController, BOOT_STATUS, IDLE_STATUS};
use jumbo_core::traits::{StatusSink, ToneDriver};
use jumbo_display::FaceScreen;
use rand::rngs::SmallRng;

use super::tick::TICK_SIGNAL;
use crate::channels::{with_queue, STANDBY_SIGNAL, STATUS_NOTICE, TONE_CHANNEL};
use crate::display::Ssd1306;

/// Panel type driven by the face task
pub type FacePanel = Ssd1306<I2c<'static, I2C0, Async>>;

/// Controller outputs: text goes to the screen, tones to the buzzer task
struct FaceOutputs<'a> {
    screen: &'a mut FaceScreen,
}

impl ToneDriver for FaceOutputs<'_> {
    fn play_tone(&mut self, duration_ms: u32) {
        if TONE_CHANNEL.try_send(duration_ms).is_err() {
            warn!("Tone channel full, dropping {}ms tone", duration_ms);
        }
    }
}

impl StatusSink for FaceOutputs<'_> {
    fn show_status(&mut self, text: &str) {
        self.screen.show_status(text);
    }

    fn show_caption(&mut self, text: &str) {
        self.screen.show_caption(text);
    }
}

/// Face task - animates and draws the face
#[embassy_executor::task]
pub async fn face_task(mut panel: FacePanel, config: &'static FaceConfig, rng: SmallRng) {
    info!("Face task started");

    let mut controller = PlaybackController::new(config, rng);
    let mut screen = FaceScreen::new();
    controller.begin(&mut screen);

    let mut standby = false;

    loop {
        let now_ms = TICK_SIGNAL.wait().await;

        if let Some(enter) = STANDBY_SIGNAL.try_take() {
            if enter != standby {
                standby = enter;
                if standby {
                    info!("Entering standby");
                    controller.force_sleep(now_ms, &mut screen);
                } else {
                    info!("Leaving standby");
                    controller.resume(&mut screen);
                }
            }
        }

        if !standby {
            let mut out = FaceOutputs {
                screen: &mut screen,
            };
            let event = with_queue(|queue| controller.tick(now_ms, queue, &mut out));
            if let Some(event) = event {
                debug!("Playback: {:?}", event);
            }
        }

        match STATUS_NOTICE.try_take() {
            Some(Some(text)) => screen.show_notice(&text),
            Some(None) => {
                screen.clear_notice();
                // Booted with nothing to play yet
                if screen.status() == BOOT_STATUS {
                    screen.show_status(IDLE_STATUS);
                }
            }
            None => {}
        }

        // Drawing only touches the RAM buffer
        let drawn = match screen.render(&controller.frames(), controller.is_playing(), &mut panel)
        {
            Ok(drawn) => drawn,
            Err(e) => match e {},
        };

        if drawn {
            if let Err(e) = panel.flush().await {
                warn!("Panel flush failed: {:?}", e);
            }
        }
    }
}
