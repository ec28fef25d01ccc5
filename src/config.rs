//! Configuration for the event flow manager

use serde::{Deserialize, Serialize};

/// Default bound on the number of ancestors walked for one dispatch
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Errors that can occur while loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value was out of range
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Tunables for [`EventFlowManager`](crate::events::EventFlowManager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Maximum ancestor path length before a dispatch is refused as
    /// structurally broken
    pub max_depth: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FlowConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
