//! Configuration types and parsing

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;

/// Errors from [`load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    Parse(ParseError),
    Invalid(ConfigError),
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Parse and validate a configuration file
pub fn load(input: &str) -> Result<RigConfig, LoadError> {
    let config = parse_config(input)?;
    config.validate()?;
    Ok(config)
}
