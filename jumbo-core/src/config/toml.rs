//! Minimal TOML reader for `face.toml`
//!
//! Handles only the subset the face configuration needs. It does NOT
//! aim to be a general TOML parser.
//!
//! Supported features:
//! - `[section]` headers
//! - `key = value` pairs (integer, hex integer, float, quoted string)
//! - Comments (`# ...`), whole-line or trailing
//!
//! Keys not listed below are ignored so older firmware accepts newer files.
//! Anything not set keeps its default from [`FaceConfig::default`].

use super::types::FaceConfig;
use crate::face::{EyeGeometry, Expression, Point};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Blink,
    Playback,
    Layout,
    Feed,
    Display,
}

/// Eye placement collected across the `[layout]` keys
struct LayoutDraft {
    left: Point,
    right: Point,
    radius: u16,
}

/// Parse a `face.toml` document
pub fn parse_config(input: &str) -> Result<FaceConfig, ParseError> {
    let mut config = FaceConfig::default();
    let mut layout = LayoutDraft {
        left: config.layout.left.center,
        right: config.layout.right.center,
        radius: config.layout.left.radius,
    };
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config, &mut layout)?;
    }

    config.layout.left = EyeGeometry::new(layout.left, layout.radius, true);
    config.layout.right = EyeGeometry::new(layout.right, layout.radius, false);
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "blink" => Ok(Section::Blink),
        "playback" => Ok(Section::Playback),
        "layout" => Ok(Section::Layout),
        "feed" => Ok(Section::Feed),
        "display" => Ok(Section::Display),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

/// Parse a decimal or `0x` hex integer
fn parse_int<T>(value: &str) -> Result<T, ParseError>
where
    T: TryFrom<u64>,
{
    let cleaned = without_underscores(value);
    let parsed = match cleaned.as_str().strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => cleaned.as_str().parse::<u64>(),
    };
    parsed
        .ok()
        .and_then(|v| T::try_from(v).ok())
        .ok_or(ParseError::InvalidValue)
}

fn parse_i32(value: &str) -> Result<i32, ParseError> {
    match value.strip_prefix('-') {
        Some(rest) => parse_int::<u32>(rest)
            .ok()
            .and_then(|v| 0i32.checked_sub_unsigned(v))
            .ok_or(ParseError::InvalidValue),
        None => parse_int(value),
    }
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ParseError::InvalidValue)
}

fn parse_expression(value: &str) -> Result<Expression, ParseError> {
    Expression::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut FaceConfig,
    layout: &mut LayoutDraft,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {}
        Section::Blink => {
            let b = &mut config.blink;
            match key {
                "close_ms" => b.close_ms = parse_int(value)?,
                "closed_pause_ms" => b.closed_pause_ms = parse_int(value)?,
                "open_ms" => b.open_ms = parse_int(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Playback => {
            let p = &mut config.playback;
            match key {
                "step_morph_ms" => p.step_morph_ms = parse_int(value)?,
                "idle_morph_ms" => p.idle_morph_ms = parse_int(value)?,
                "blink_chance" => {
                    let chance = parse_float(value)?;
                    if !(0.0..=1.0).contains(&chance) {
                        return Err(ParseError::InvalidValue);
                    }
                    p.blink_chance = chance;
                }
                "fallback" => p.fallback = parse_expression(value)?,
                _ => {}
            }
        }
        Section::Layout => match key {
            "left_x" => layout.left.x = parse_i32(value)?,
            "left_y" => layout.left.y = parse_i32(value)?,
            "right_x" => layout.right.x = parse_i32(value)?,
            "right_y" => layout.right.y = parse_i32(value)?,
            "radius" => {
                layout.radius = parse_int(value)?;
                if layout.radius == 0 {
                    return Err(ParseError::InvalidValue);
                }
            }
            "gaze_margin" => config.layout.gaze_margin = parse_int(value)?,
            _ => {}
        },
        Section::Feed => {
            let f = &mut config.feed;
            match key {
                "low_water" => f.low_water = parse_int(value)?,
                "refill_interval_ms" => f.refill_interval_ms = parse_int(value)?,
                "boot_retry_ms" => f.boot_retry_ms = parse_int(value)?,
                "boot_hold_ms" => f.boot_hold_ms = parse_int(value)?,
                "link_timeout_ms" => f.link_timeout_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Display => {
            let d = &mut config.display;
            match key {
                "i2c_address" => d.i2c_address = parse_int(value)?,
                "contrast" => d.contrast = parse_int(value)?,
                "frame_ms" => {
                    d.frame_ms = parse_int(value)?;
                    if d.frame_ms == 0 {
                        return Err(ParseError::InvalidValue);
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Integer literal with `_` separators removed
fn without_underscores(value: &str) -> heapless::String<24> {
    let mut out = heapless::String::new();
    for ch in value.chars().filter(|&c| c != '_') {
        // Overlong literals fail to parse anyway
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Jumbo face
[blink]
close_ms = 60
closed_pause_ms = 40   # hold
open_ms = 100

[playback]
step_morph_ms = 400
blink_chance = 0.05
fallback = "calm"

[layout]
left_x = 30
right_x = 98
radius = 18

[feed]
low_water = 3
refill_interval_ms = 15_000

[display]
i2c_address = 0x3D
"#;

    #[test]
    fn test_parse_sample() {
        let cfg = parse_config(SAMPLE).unwrap();
        assert_eq!(cfg.blink.close_ms, 60);
        assert_eq!(cfg.blink.closed_pause_ms, 40);
        assert_eq!(cfg.blink.open_ms, 100);
        assert_eq!(cfg.playback.step_morph_ms, 400);
        assert_eq!(cfg.playback.idle_morph_ms, 1000);
        assert!((cfg.playback.blink_chance - 0.05).abs() < 1e-6);
        assert_eq!(cfg.playback.fallback, Expression::Calm);
        assert_eq!(cfg.layout.left.center, Point::new(30, 26));
        assert_eq!(cfg.layout.right.center, Point::new(98, 26));
        assert_eq!(cfg.layout.left.radius, 18);
        assert!(!cfg.layout.right.is_left);
        assert_eq!(cfg.feed.low_water, 3);
        assert_eq!(cfg.feed.refill_interval_ms, 15_000);
        assert_eq!(cfg.feed.link_timeout_ms, 0);
        assert_eq!(cfg.display.i2c_address, 0x3D);
        assert_eq!(cfg.display.frame_ms, 30);
    }

    #[test]
    fn test_empty_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), FaceConfig::default());
        assert_eq!(parse_config("# nothing\n\n").unwrap(), FaceConfig::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let cfg = parse_config("[blink]\nsparkle = true\nopen_ms = 90\n").unwrap();
        assert_eq!(cfg.blink.open_ms, 90);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert_eq!(
            parse_config("[mouth]\nsize = 3\n"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(parse_config("[blink\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert_eq!(
            parse_config("[blink]\nclose_ms = soon\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[playback]\nblink_chance = 1.5\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[playback]\nfallback = \"grumpy\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[display]\ni2c_address = 300\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[layout]\nradius = 0\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_missing_equals_rejected() {
        assert_eq!(parse_config("[blink]\nclose_ms\n"), Err(ParseError::InvalidLine));
    }

    #[test]
    fn test_negative_coordinates() {
        let cfg = parse_config("[layout]\nleft_y = -4\n").unwrap();
        assert_eq!(cfg.layout.left.center.y, -4);
    }

    #[test]
    fn test_hash_inside_string_kept() {
        assert_eq!(strip_comment(r#"fallback = "a#b" # c"#), r#"fallback = "a#b" "#);
    }
}
