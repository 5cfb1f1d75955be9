// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! Supports both programmatic and file-based (TOML) configuration:
//!
//! ```toml
//! default_strategy = "positional"
//! string_policy = "replace"
//! max_depth = 128
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Deepest accepted value nesting unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Strategy used for object types without an explicit registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultStrategy {
    /// Field names travel with the values.
    #[default]
    Named,
    /// Only value order travels; keys are implicit.
    Positional,
}

/// Handling of characters outside ASCII in string payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringPolicy {
    /// Reject on encode, treat as malformed on decode.
    #[default]
    Strict,
    /// Substitute `?` for every non-ASCII character.
    Replace,
}

/// Codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Fallback strategy for unregistered object types.
    #[serde(default)]
    pub default_strategy: DefaultStrategy,

    /// Non-ASCII string handling.
    #[serde(default)]
    pub string_policy: StringPolicy,

    /// Maximum value nesting depth on encode and decode.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_strategy: DefaultStrategy::default(),
            string_policy: StringPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the fallback strategy.
    pub fn default_strategy(mut self, strategy: DefaultStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Set the string policy.
    pub fn string_policy(mut self, policy: StringPolicy) -> Self {
        self.string_policy = policy;
        self
    }

    /// Set the maximum nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}
