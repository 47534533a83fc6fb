use std::path::Path;

use perch_input::InputConfig;
use perch_motion::MotionConfig;
use perch_registry::RegistryConfig;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Complete configuration for a [`SitSession`](crate::SitSession).
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub registry: RegistryConfig,
    pub motion: MotionConfig,
    pub input: InputConfig,
}

impl SessionConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(std::fs::File::open(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("registry.search_radius", self.registry.search_radius)?;
        positive(
            "registry.indicator_scale_divisor",
            self.registry.indicator_scale_divisor,
        )?;
        positive("motion.duration", self.motion.duration)?;
        positive("input.buttons.width", self.input.buttons.width)?;
        positive("input.buttons.height", self.input.buttons.height)?;
        if self.input.toggle_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "input.toggle_key",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}
