//! Configuration loading and typed config structures for Traverse.
//!
//! The configuration lives in `traverse-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure, a loader that
//! reads and validates the file, and the conversion into the
//! [`MovementConfig`] threaded through the movement crate.

use std::path::Path;

use serde::Deserialize;
use traverse_movement::MovementConfig;
use traverse_movement::config::{DEFAULT_THREAT_REVERSE_RANGE, DEFAULT_WANDER_DISTANCE};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds values the engine cannot run with.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `traverse-config.yaml`. Every field has a
/// default, so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Seed and run length.
    #[serde(default)]
    pub world: WorldConfig,

    /// Terrain search costs.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Display toggles.
    #[serde(default)]
    pub visualizer: VisualizerConfig,

    /// Traffic and wander tunables.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Fatigue applied when moves land.
    #[serde(default)]
    pub fatigue: FatigueConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a search cost or the fatigue
    /// recovery rate is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.swamp_cost == 0 || self.layout.plain_cost == 0 {
            return Err(ConfigError::Invalid {
                reason: "layout.swamp_cost and layout.plain_cost must be at least 1".to_owned(),
            });
        }
        if self.fatigue.fatigue_recovery == 0 {
            return Err(ConfigError::Invalid {
                reason: "fatigue.fatigue_recovery must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// The movement tunables derived from this configuration.
    pub const fn movement(&self) -> MovementConfig {
        MovementConfig {
            swamp_cost: self.layout.swamp_cost,
            plain_cost: self.layout.plain_cost,
            visualizer_enabled: self.visualizer.enabled,
            show_path_searches: self.visualizer.show_path_searches,
            threat_reverse_range: self.routing.threat_reverse_range,
            wander_distance: self.routing.wander_distance,
            border_offset: self.routing.border_offset,
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of ticks the engine binary runs.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            ticks: default_ticks(),
        }
    }
}

/// Terrain costs handed to path search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayoutConfig {
    /// Cost of a swamp tile.
    #[serde(default = "default_swamp_cost")]
    pub swamp_cost: u32,

    /// Cost of a plain tile.
    #[serde(default = "default_plain_cost")]
    pub plain_cost: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            swamp_cost: default_swamp_cost(),
            plain_cost: default_plain_cost(),
        }
    }
}

/// Visualization toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VisualizerConfig {
    /// Master switch.
    #[serde(default)]
    pub enabled: bool,

    /// Send every path search to the visualizer.
    #[serde(default)]
    pub show_path_searches: bool,
}

/// Traffic and wander tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoutingConfig {
    /// Guard range that toggles reverse routing.
    #[serde(default = "default_threat_reverse_range")]
    pub threat_reverse_range: u32,

    /// Distance window for bounded wandering.
    #[serde(default = "default_wander_distance")]
    pub wander_distance: u32,

    /// Border band offset; `0` makes the outer ring of a region border.
    #[serde(default)]
    pub border_offset: i32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            threat_reverse_range: default_threat_reverse_range(),
            wander_distance: default_wander_distance(),
            border_offset: 0,
        }
    }
}

/// Fatigue applied when moves land, and recovered every tick.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FatigueConfig {
    /// Fatigue gained by stepping onto plain terrain.
    #[serde(default = "default_plain_fatigue")]
    pub plain_fatigue: u32,

    /// Fatigue gained by stepping onto swamp.
    #[serde(default = "default_swamp_fatigue")]
    pub swamp_fatigue: u32,

    /// Fatigue recovered by every agent at the end of each tick.
    #[serde(default = "default_fatigue_recovery")]
    pub fatigue_recovery: u32,
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            plain_fatigue: default_plain_fatigue(),
            swamp_fatigue: default_swamp_fatigue(),
            fatigue_recovery: default_fatigue_recovery(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_ticks() -> u64 {
    20
}

const fn default_swamp_cost() -> u32 {
    10
}

const fn default_plain_cost() -> u32 {
    2
}

const fn default_threat_reverse_range() -> u32 {
    DEFAULT_THREAT_REVERSE_RANGE
}

const fn default_wander_distance() -> u32 {
    DEFAULT_WANDER_DISTANCE
}

const fn default_plain_fatigue() -> u32 {
    2
}

const fn default_swamp_fatigue() -> u32 {
    10
}

const fn default_fatigue_recovery() -> u32 {
    2
}

fn default_log_level() -> String {
    "info".to_owned()
}
