use std::{fs, io, path::Path};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_writer::{FIXED_RESERVE, MAX_INITIAL_CAPACITY, MAX_RESERVE, VARIABLE_SLACK};

/// Tunables for embedding the codec in a larger system.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CodecConfiguration {
    pub writer: WriterConfig,
}

/// Scratch buffer sizing for [`crate::ValueWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Bytes allocated for the scratch buffer up front.
    pub initial_capacity: usize,
    /// Bytes reserved for entries with a bounded encoded size.
    pub fixed_reserve: usize,
    /// Extra bytes reserved on top of a variable-length payload.
    pub variable_slack: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            fixed_reserve: FIXED_RESERVE,
            variable_slack: VARIABLE_SLACK,
        }
    }
}

impl WriterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let reserve = self.fixed_reserve;
        let slack = self.variable_slack;
        let capacity = self.initial_capacity;
        check_range("fixed_reserve", reserve, FIXED_RESERVE, MAX_RESERVE)?;
        check_range("variable_slack", slack, VARIABLE_SLACK, MAX_RESERVE)?;
        check_range("initial_capacity", capacity, 0, MAX_INITIAL_CAPACITY)
    }
}

fn check_range(name: &str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "writer.{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl CodecConfiguration {
    pub const FILE_NAME: &'static str = "relir.toml";

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `relir.toml` from `dir`, writing out the defaults if it does not exist yet.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(Self::FILE_NAME);
        if path.exists() {
            log::debug!("loading codec configuration from {}", path.display());
            let content = fs::read_to_string(&path)?;
            return Self::from_toml_str(&content);
        }

        let config = Self::default();
        let content = toml::to_string(&config)?;
        if let Err(err) = fs::write(&path, content) {
            warn!(
                "Couldn't write default codec configuration to {}. Reason: {}",
                path.display(),
                err
            );
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.writer.validate()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let content = "[writer]\nvariable_slack = 32\n";
        let config = CodecConfiguration::from_toml_str(content).unwrap();
        assert_eq!(config.writer.variable_slack, 32);
        assert_eq!(config.writer.fixed_reserve, FIXED_RESERVE);
        assert_eq!(config.writer.initial_capacity, 256);

        let empty = CodecConfiguration::from_toml_str("").unwrap();
        assert_eq!(empty, CodecConfiguration::default());
    }

    #[test]
    fn reserve_below_minimum_is_rejected() {
        let result = CodecConfiguration::from_toml_str("[writer]\nfixed_reserve = 8\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn oversized_values_are_rejected() {
        let slack = format!("[writer]\nvariable_slack = {}\n", i64::MAX);
        let result = CodecConfiguration::from_toml_str(&slack);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let config = WriterConfig {
            initial_capacity: 0,
            fixed_reserve: FIXED_RESERVE,
            variable_slack: usize::MAX,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = WriterConfig {
            initial_capacity: MAX_INITIAL_CAPACITY + 1,
            ..WriterConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WriterConfig {
            fixed_reserve: MAX_RESERVE,
            variable_slack: MAX_RESERVE,
            ..WriterConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let result = CodecConfiguration::from_toml_str("writer = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CodecConfiguration::FILE_NAME);
        assert!(!path.exists());

        let first = CodecConfiguration::load(dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(first, CodecConfiguration::default());

        fs::write(&path, "[writer]\ninitial_capacity = 4096\n").unwrap();
        let second = CodecConfiguration::load(dir.path()).unwrap();
        assert_eq!(second.writer.initial_capacity, 4096);
    }
}
