//! Engine configuration
//!
//! Defaults cover normal use; a JSON file can override any field:
//!
//! ```json
//! { "clamp_tolerance_stops": 0.05, "default_increment": "third", "addr": "127.0.0.1:3000" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::IncrementStep;
use crate::CLAMP_TOLERANCE_STOPS;

/// Largest accepted clamp tolerance; at half a stop every value would snap
pub const MAX_CLAMP_TOLERANCE_STOPS: f64 = 0.5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stops past a table edge that still snap to the edge
    pub clamp_tolerance_stops: f64,
    /// Increment used when a request does not name one
    pub default_increment: IncrementStep,
    /// HTTP listen address
    pub addr: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clamp_tolerance_stops: CLAMP_TOLERANCE_STOPS,
            default_increment: IncrementStep::Third,
            addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl EngineConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.clamp_tolerance_stops;
        if !(0.0..MAX_CLAMP_TOLERANCE_STOPS).contains(&tolerance) {
            return Err(ConfigError::Invalid(format!(
                "clamp_tolerance_stops must be in [0, {}), got {}",
                MAX_CLAMP_TOLERANCE_STOPS, tolerance
            )));
        }
        if self.addr.trim().is_empty() {
            return Err(ConfigError::Invalid("addr must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "default_increment": "half" }"#).unwrap();
        assert_eq!(config.default_increment, IncrementStep::Half);
        assert_eq!(config.clamp_tolerance_stops, CLAMP_TOLERANCE_STOPS);
        assert_eq!(config.addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_rejects_wide_tolerance() {
        let err = EngineConfig::from_json(r#"{ "clamp_tolerance_stops": 0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(EngineConfig::from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "default_increment": "quarter" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("evsolve-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "clamp_tolerance_stops": 0.1 }"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.clamp_tolerance_stops, 0.1);

        assert!(matches!(EngineConfig::load("/nonexistent/evsolve.json"), Err(ConfigError::Io(_))));
    }
}
