//! # Compliance Configuration
//!
//! YAML-based configuration with environment-specific overrides. A single
//! `compliance-config.yaml` carries the base values plus optional
//! `development`/`test`/`production` sections merged over them.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use compliance_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let debug = manager.config().allocation.debug_assignment_algorithm;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

use crate::constants::env_vars;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Root configuration structure mirroring compliance-config.yaml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ComplianceConfig {
    /// Allocation engine settings
    #[serde(default)]
    pub allocation: AllocationConfig,

    /// Structured logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Host inventory checks for agreement management
    #[serde(default)]
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AllocationConfig {
    /// Log the intermediate state of every allocation pass at debug level
    #[serde(default)]
    pub debug_assignment_algorithm: bool,
    /// Reject allocation runs whose agreements reference unknown hosts
    #[serde(default = "default_true")]
    pub validate_host_references: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            debug_assignment_algorithm: false,
            validate_host_references: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InventoryConfig {
    /// Refuse to associate agreements with hosts missing from the inventory
    #[serde(default = "default_true")]
    pub reject_unknown_hosts: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            reject_unknown_hosts: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl ComplianceConfig {
    /// Apply environment variable overrides to configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(debug) = env::var(env_vars::DEBUG_ASSIGNMENT) {
            self.allocation.debug_assignment_algorithm =
                debug.parse().unwrap_or(self.allocation.debug_assignment_algorithm);
            info!(
                "Assignment debug override: {}",
                self.allocation.debug_assignment_algorithm
            );
        }

        if let Ok(level) = env::var(env_vars::LOG_LEVEL) {
            let level = level.to_lowercase();
            if LOG_LEVELS.contains(&level.as_str()) {
                info!("Log level override: {}", level);
                self.logging.level = level;
            }
        }

        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.logging.level.is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "logging.level",
                "logging configuration",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigurationError::invalid_value(
                "logging.level",
                self.logging.level.clone(),
                format!("must be one of {LOG_LEVELS:?}"),
            ));
        }

        Ok(())
    }
}
