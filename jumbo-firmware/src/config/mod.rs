//! Configuration loading
//!
//! The face configuration is compiled into the image from `face.toml`.
//! build.rs already rejects a malformed file, so a parse failure here means
//! the on-device reader and the build-time check disagree; the face still
//! comes up on the defaults.

use defmt::*;
use jumbo_core::config::{parse_config, FaceConfig};

/// Embedded configuration (compiled into firmware)
/// Edit face.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../face.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load_config() -> FaceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config loaded: frame={}ms, blink_chance={}, low_water={}",
                config.display.frame_ms, config.playback.blink_chance, config.feed.low_water
            );
            config
        }
        Err(e) => {
            error!("face.toml rejected ({:?}), using defaults", e);
            FaceConfig::default()
        }
    }
}
