//! Simple TOML parser for eye configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `eyes.toml`. It does NOT support the full TOML grammar and never allocates.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - [eye.name] headers, one per display, in order
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys outside section headers

use heapless::String as HString;

use super::types::{EyeConfig, IrisMode, RigConfig, MAX_NAME_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value does not parse as the expected type
    InvalidValue,
    /// More eyes than the rig supports
    TooManyItems,
    /// Two `[eye.*]` sections with the same name
    DuplicateEye,
}

/// Current parsing context
#[derive(Debug, Clone)]
enum Section {
    Root,
    Display,
    Animation,
    Iris,
    LightSensor,
    Eye,
}

/// Parse TOML configuration into RigConfig
///
/// Only syntax and value types are checked here; see
/// [`RigConfig::validate`] for cross-field rules.
pub fn parse_config(input: &str) -> Result<RigConfig, ParseError> {
    let mut config = RigConfig::new();
    let mut section = Section::Root;
    let mut current_eye: Option<EyeConfig> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            save_eye(&mut config, &mut current_eye)?;

            let (next, eye) = parse_section_header(&line[1..line.len() - 1])?;
            section = next;
            current_eye = eye;
            continue;
        }

        // Parse key = value
        if let Some((key, value)) = parse_key_value(line) {
            apply_value(&section, key, value, &mut config, &mut current_eye)?;
        } else {
            return Err(ParseError::InvalidValue);
        }
    }

    // Save final section
    save_eye(&mut config, &mut current_eye)?;

    Ok(config)
}

/// Parse a section header like "display" or "eye.left"
fn parse_section_header(header: &str) -> Result<(Section, Option<EyeConfig>), ParseError> {
    let header = header.trim();

    if let Some((kind, name)) = header.split_once('.') {
        if kind.trim() != "eye" {
            return Err(ParseError::InvalidSection);
        }
        let name = parse_string(name.trim())?;
        if name.is_empty() || name.contains('.') {
            return Err(ParseError::InvalidSection);
        }
        let name: HString<MAX_NAME_LEN> =
            HString::try_from(name).map_err(|_| ParseError::InvalidSection)?;
        let eye = EyeConfig {
            name,
            ..EyeConfig::default()
        };
        return Ok((Section::Eye, Some(eye)));
    }

    let section = match header {
        "display" => Section::Display,
        "animation" => Section::Animation,
        "iris" => Section::Iris,
        "light_sensor" => Section::LightSensor,
        _ => return Err(ParseError::InvalidSection),
    };
    Ok((section, None))
}

/// Drop a trailing comment unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut buf: HString<24> = HString::new();
    for c in value.chars().filter(|&c| c != '_') {
        buf.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    buf.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value; integers are accepted too
fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse iris mode
fn parse_iris_mode(value: &str) -> Result<IrisMode, ParseError> {
    match parse_string(value)? {
        "autonomous" | "Autonomous" => Ok(IrisMode::Autonomous),
        "light_sensor" | "LightSensor" => Ok(IrisMode::LightSensor),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: &Section,
    key: &str,
    value: &str,
    config: &mut RigConfig,
    current_eye: &mut Option<EyeConfig>,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {} // No root keys
        Section::Display => {
            let d = &mut config.display;
            match key {
                "width" => d.width = parse_int(value)?,
                "height" => d.height = parse_int(value)?,
                "spi_frequency" => d.spi_frequency = parse_int(value)?,
                "max_failures" => d.max_failures = parse_int(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Animation => {
            let a = &mut config.animation;
            match key {
                "tracking" => a.tracking = parse_bool(value)?,
                "autoblink" => a.autoblink = parse_bool(value)?,
                "iris_min" => a.iris_min = parse_int(value)?,
                "iris_max" => a.iris_max = parse_int(value)?,
                _ => {}
            }
        }
        Section::Iris => {
            let i = &mut config.iris;
            match key {
                "mode" => i.mode = parse_iris_mode(value)?,
                "cycle_us" => i.cycle_us = parse_int(value)?,
                _ => {}
            }
        }
        Section::LightSensor => {
            let l = &mut config.light_sensor;
            match key {
                "min" => l.min = parse_int(value)?,
                "max" => l.max = parse_int(value)?,
                "curve" => l.curve = Some(parse_float(value)?),
                "smooth" => l.smooth = parse_bool(value)?,
                "flip" => l.flip = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Eye => {
            let e = current_eye.as_mut().ok_or(ParseError::InvalidSection)?;
            match key {
                "rotation" => e.rotation = parse_int(value)?,
                "mirror" => e.mirror = parse_bool(value)?,
                "gaze_offset_x" => e.gaze_offset_x = parse_int(value)?,
                "gaze_offset_y" => e.gaze_offset_y = parse_int(value)?,
                _ => {}
            }
        }
    }

    Ok(())
}

/// Save the eye section being built
fn save_eye(config: &mut RigConfig, current_eye: &mut Option<EyeConfig>) -> Result<(), ParseError> {
    if let Some(eye) = current_eye.take() {
        if config.eyes.iter().any(|e| e.name == eye.name) {
            return Err(ParseError::DuplicateEye);
        }
        config.eyes.push(eye).map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(())
}
