//! Engine configuration.
//!
//! Loaded from TOML, with environment variable overrides:
//! - `POLYMATH_MATRIX`: `matrix` or `array`
//! - `POLYMATH_PRECISION`: significant digits for decimals

use polymath_core::DecimalContext;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Container kind returned by constructors such as `eye`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixMode {
    #[default]
    Matrix,
    Array,
}

impl MatrixMode {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "matrix" => Some(MatrixMode::Matrix),
            "array" => Some(MatrixMode::Array),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    pub matrix: MatrixMode,
    /// Significant digits for decimals created by the engine
    pub precision: u32,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self { matrix: MatrixMode::Matrix, precision: DecimalContext::DEFAULT_PRECISION }
    }
}

impl MathConfig {
    pub const MAX_PRECISION: u32 = 1000;

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: MathConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let toml_content = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), toml_content)?;
        Ok(())
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Invalid values are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("POLYMATH_MATRIX") {
            match MatrixMode::parse(&val) {
                Some(mode) => self.matrix = mode,
                None => warn!(value = %val, "ignoring invalid POLYMATH_MATRIX"),
            }
        }

        if let Ok(val) = env::var("POLYMATH_PRECISION") {
            match val.parse::<u32>() {
                Ok(p) if (1..=Self::MAX_PRECISION).contains(&p) => self.precision = p,
                _ => warn!(value = %val, "ignoring invalid POLYMATH_PRECISION"),
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.precision == 0 || self.precision > Self::MAX_PRECISION {
            return Err(ConfigError::Validation(format!(
                "precision must be between 1 and {}, got {}",
                Self::MAX_PRECISION,
                self.precision
            )));
        }
        Ok(())
    }

    pub fn decimal_context(&self) -> DecimalContext {
        DecimalContext::new(self.precision)
    }
}
