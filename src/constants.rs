//! # System Constants
//!
//! Licensing units, metric names and environment variable names shared by the
//! allocation engine, the services and the configuration layer.

/// Metric names as they appear in the license-type catalog
pub mod metrics {
    pub const PROCESSOR_PERPETUAL: &str = "Processor Perpetual";
    pub const COMPUTER_PERPETUAL: &str = "Computer Perpetual";
    pub const NAMED_USER_PLUS_PERPETUAL: &str = "Named User Plus Perpetual";
}

/// Licensing unit conventions
pub mod units {
    /// Named users that make up one processor-equivalent license
    pub const NAMED_USERS_PER_PROCESSOR: f64 = 25.0;
}

/// Environment variables read by configuration and logging
pub mod env_vars {
    pub const COMPLIANCE_ENV: &str = "COMPLIANCE_ENV";
    pub const APP_ENV: &str = "APP_ENV";
    pub const DEBUG_ASSIGNMENT: &str = "COMPLIANCE_DEBUG_ASSIGNMENT";
    pub const LOG_LEVEL: &str = "COMPLIANCE_LOG_LEVEL";
    pub const CONFIG_DIR: &str = "COMPLIANCE_CONFIG_DIR";
}

/// System-wide constants
pub mod system {
    /// Default environment when none is configured
    pub const DEFAULT_ENVIRONMENT: &str = "development";

    /// Configuration file names searched in the config directory
    pub const CONFIG_FILE_NAMES: &[&str] = &["compliance-config.yaml", "compliance-config.yml"];

    /// Environments whose sections are merged over the base configuration
    pub const KNOWN_ENVIRONMENTS: &[&str] = &["development", "test", "production"];
}
