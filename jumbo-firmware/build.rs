//! Build script for jumbo-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates face.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Expression names a step or the fallback may use
const EXPRESSIONS: &[&str] = &["angry", "happy", "shocked", "sad", "calm", "sleep"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate face.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=face.toml");

    let config_path = Path::new("face.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: face.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds face.toml at build time.                    ║\n\
            ║  Please create one in the jumbo-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read face.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in face.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_playback(&config, &mut errors);
    validate_layout(&config, &mut errors);
    validate_display(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in face.toml                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=face.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only known sections, each a table
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !["blink", "playback", "layout", "feed", "display"].contains(&name.as_str()) {
            errors.push(format!("Unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::Table> {
    config.get(name).and_then(toml::Value::as_table)
}

fn validate_playback(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(playback) = section(config, "playback") else {
        return;
    };

    if let Some(chance) = playback.get("blink_chance") {
        match chance.as_float() {
            Some(c) if (0.0..=1.0).contains(&c) => {}
            _ => errors.push("[playback] blink_chance must be a float in 0.0-1.0".into()),
        }
    }

    if let Some(fallback) = playback.get("fallback") {
        match fallback.as_str() {
            Some(name) if EXPRESSIONS.contains(&name.trim().to_ascii_lowercase().as_str()) => {}
            _ => errors.push(format!(
                "[playback] fallback must be one of: {}",
                EXPRESSIONS.join(", ")
            )),
        }
    }
}

fn validate_layout(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(layout) = section(config, "layout") else {
        return;
    };

    if let Some(radius) = layout.get("radius") {
        match radius.as_integer() {
            Some(r) if (1..=32).contains(&r) => {}
            _ => errors.push("[layout] radius must be 1-32".into()),
        }
    }

    for key in ["left_x", "right_x"] {
        if let Some(toml::Value::Integer(x)) = layout.get(key) {
            if !(0..128).contains(x) {
                errors.push(format!("[layout] {} must be 0-127", key));
            }
        }
    }
    for key in ["left_y", "right_y"] {
        if let Some(toml::Value::Integer(y)) = layout.get(key) {
            if !(0..64).contains(y) {
                errors.push(format!("[layout] {} must be 0-63", key));
            }
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = section(config, "display") else {
        return;
    };

    if let Some(addr) = display.get("i2c_address") {
        match addr.as_integer() {
            Some(a) if (0x08..=0x77).contains(&a) => {}
            _ => errors.push("[display] i2c_address must be a 7-bit address".into()),
        }
    }

    if let Some(frame) = display.get("frame_ms") {
        match frame.as_integer() {
            Some(ms) if ms > 0 => {}
            _ => errors.push("[display] frame_ms must be positive".into()),
        }
    }
}
