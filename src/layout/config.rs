//! Configuration for the layout builder

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::attribute::Platform;
use crate::types::{Insets, LayoutDirection};

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for constraint declaration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Capability profile; decides whether margin attributes exist
    pub platform: Platform,

    /// How leading/trailing resolve to left/right
    pub direction: LayoutDirection,

    /// Layout margins given to new items
    pub default_margins: Insets,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Touch,
            direction: LayoutDirection::LeftToRight,
            default_margins: Insets::uniform(8.0),
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_default_margins(mut self, margins: Insets) -> Self {
        self.default_margins = margins;
        self
    }
}
