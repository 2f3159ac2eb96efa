//! Build script for gazer-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates eyes.toml at compile time
//! - Generates the eye art tables for the configured screen size

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[path = "build/eye_art.rs"]
mod eye_art;

/// Largest screen the SSD1351 can drive
const PANEL_SIZE: i64 = 128;

fn main() {
    setup_linker();
    let (width, height) = validate_config();
    generate_art(width, height);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=build/eye_art.rs");
}

fn generate_art(width: usize, height: usize) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    if let Err(e) = eye_art::generate(&out_dir.join("eye_assets.rs"), width, height) {
        fail("Failed to write eye art", &[e.to_string()]);
    }
}

/// Panic with a boxed list of errors
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> Vec<String> {
    msg.lines()
        .map(|line| {
            if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Validate eyes.toml and return the screen size
fn validate_config() -> (usize, usize) {
    // Re-run if eyes.toml changes
    println!("cargo:rerun-if-changed=eyes.toml");

    let config_path = Path::new("eyes.toml");
    if !config_path.exists() {
        fail(
            "eyes.toml not found",
            &["Create one in the gazer-firmware directory".to_string()],
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read eyes.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail("Invalid TOML syntax in eyes.toml", &format_error_lines(&e.to_string())),
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    let size = validate_display(&config, &mut errors);
    validate_animation(&config, &mut errors);
    validate_iris(&config, &mut errors);
    validate_light_sensor(&config, &mut errors);
    validate_eyes(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in eyes.toml", &errors);
    }

    println!("cargo:warning=eyes.toml validated successfully");
    size
}

fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for key in table.keys() {
        if !["display", "animation", "iris", "light_sensor", "eye"].contains(&key.as_str()) {
            errors.push(format!("unknown section [{}]", key));
        }
    }
}

/// Integer in `lo..=hi`, or the default when absent
fn int_in(
    section: &str,
    table: Option<&toml::Value>,
    key: &str,
    lo: i64,
    hi: i64,
    default: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match table.and_then(|t| t.get(key)) {
        None => default,
        Some(toml::Value::Integer(v)) if (lo..=hi).contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, lo, hi));
            default
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
    }
}

fn check_bool(section: &str, table: Option<&toml::Value>, key: &str, errors: &mut Vec<String>) {
    if let Some(v) = table.and_then(|t| t.get(key)) {
        if !v.is_bool() {
            errors.push(format!("[{}] {} must be true or false", section, key));
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) -> (usize, usize) {
    let display = config.get("display");
    let width = int_in("display", display, "width", 1, PANEL_SIZE, PANEL_SIZE, errors);
    let height = int_in("display", display, "height", 1, PANEL_SIZE, PANEL_SIZE, errors);
    int_in("display", display, "spi_frequency", 1, 62_500_000, 16_000_000, errors);
    int_in("display", display, "max_failures", 1, 255, 8, errors);
    (width as usize, height as usize)
}

fn validate_animation(config: &toml::Value, errors: &mut Vec<String>) {
    let animation = config.get("animation");
    check_bool("animation", animation, "tracking", errors);
    check_bool("animation", animation, "autoblink", errors);
    let min = int_in("animation", animation, "iris_min", 0, 1023, 120, errors);
    let max = int_in("animation", animation, "iris_max", 0, 1023, 720, errors);
    if min >= max {
        errors.push("[animation] iris_min must be below iris_max".to_string());
    }
}

fn validate_iris(config: &toml::Value, errors: &mut Vec<String>) {
    let iris = config.get("iris");
    match iris.and_then(|t| t.get("mode")) {
        None => {}
        Some(toml::Value::String(mode)) if ["autonomous", "light_sensor"].contains(&mode.as_str()) => {}
        Some(_) => errors.push("[iris] mode must be 'autonomous' or 'light_sensor'".to_string()),
    }
    int_in("iris", iris, "cycle_us", 1, u32::MAX as i64, 10_000_000, errors);
}

fn validate_light_sensor(config: &toml::Value, errors: &mut Vec<String>) {
    let light = config.get("light_sensor");
    let min = int_in("light_sensor", light, "min", 0, 1023, 30, errors);
    let max = int_in("light_sensor", light, "max", 0, 1023, 980, errors);
    if min >= max {
        errors.push("[light_sensor] min must be below max".to_string());
    }
    check_bool("light_sensor", light, "smooth", errors);
    check_bool("light_sensor", light, "flip", errors);

    let curve = match light.and_then(|t| t.get("curve")) {
        None => return,
        Some(toml::Value::Float(v)) => *v,
        Some(toml::Value::Integer(v)) => *v as f64,
        Some(_) => {
            errors.push("[light_sensor] curve must be a number".to_string());
            return;
        }
    };
    if !curve.is_finite() || curve <= 0.0 {
        errors.push("[light_sensor] curve must be positive".to_string());
    }
}

fn validate_eyes(config: &toml::Value, errors: &mut Vec<String>) {
    let eyes = match config.get("eye") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[eye] must contain [eye.<name>] tables".to_string());
            return;
        }
        None => {
            errors.push("Missing [eye.*] section - at least one eye is required".to_string());
            return;
        }
    };

    if eyes.is_empty() || eyes.len() > 2 {
        errors.push(format!("1 or 2 [eye.*] sections required, found {}", eyes.len()));
    }

    for (name, eye) in eyes {
        let section = format!("eye.{}", name);
        if name.len() > 16 {
            errors.push(format!("[{}] name longer than 16 characters", section));
        }
        if !eye.is_table() {
            errors.push(format!("[{}] must be a table", section));
            continue;
        }
        int_in(&section, Some(eye), "rotation", 0, 3, 0, errors);
        check_bool(&section, Some(eye), "mirror", errors);
        int_in(&section, Some(eye), "gaze_offset_x", -1023, 1023, 0, errors);
        int_in(&section, Some(eye), "gaze_offset_y", -1023, 1023, 0, errors);
    }
}
