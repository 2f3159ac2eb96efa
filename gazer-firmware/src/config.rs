//! Embedded configuration
//!
//! `eyes.toml` is compiled into the image; build.rs has already checked
//! it, so a failure here means the file and the parser disagree.

use defmt::*;

use gazer_core::config::{load, RigConfig};

/// Embedded configuration (compiled into firmware)
/// Edit eyes.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../eyes.toml");

/// Parse the embedded configuration, falling back to the defaults
pub fn load_embedded() -> RigConfig {
    match load(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: {} eye(s), iris {}-{}, mode {}",
                config.eyes.len(),
                config.animation.iris_min,
                config.animation.iris_max,
                config.iris.mode
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            warn!("Using default configuration");
            RigConfig::default()
        }
    }
}
