//! Jumbo - Animated Face Firmware
//!
//! Main firmware binary for an RP2040 driving a 128x64 SSD1306 panel with
//! two animated eyes. A host feeds timed steps (expression, caption, tone)
//! over UART; the face plays them in order and dozes off when the queue
//! runs dry.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use jumbo_core::config::FaceConfig;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::config::load_config;
use crate::display::Ssd1306;

mod channels;
mod clock;
mod config;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Panel bus speed
const I2C_FREQUENCY_HZ: u32 = 400_000;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

// Configuration is shared by reference with every task
static FACE_CONFIG: StaticCell<FaceConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Jumbo firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static FaceConfig = FACE_CONFIG.init(load_config());

    // Setup UART for the host link (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for host communication");

    // Setup I2C for the OLED (GPIO5=SCL, GPIO4=SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);

    let mut panel = Ssd1306::new(i2c, config.display.i2c_address);
    match panel.init(config.display.contrast).await {
        Ok(()) => info!("Panel initialized"),
        // Keep running: the panel may come up later and flushes retry each frame
        Err(e) => error!("Panel init failed: {:?}", e),
    }

    // Buzzer on GPIO15, standby button on GPIO14 (to ground)
    let buzzer_pin = Output::new(p.PIN_15, Level::Low);
    let button_pin = Input::new(p.PIN_14, Pull::Up);

    // Autonomous blinks only need to look random
    let rng = SmallRng::seed_from_u64(RoscRng.next_u64());

    spawner.spawn(tasks::tick_task(config.display.frame_ms)).unwrap();
    spawner.spawn(tasks::face_task(panel, config, rng)).unwrap();
    spawner.spawn(tasks::feed_task(rx, tx, &config.feed)).unwrap();
    spawner.spawn(tasks::buzzer_task(buzzer_pin)).unwrap();
    spawner.spawn(tasks::button_task(button_pin)).unwrap();

    info!("All tasks spawned");
}
