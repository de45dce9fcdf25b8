//! # Structured Logging Module
//!
//! Environment-aware structured logging for allocation runs and agreement
//! management. Console output is human readable by default and switches to
//! JSON lines when the logging configuration asks for it.

use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::allocation::AllocationReport;
use crate::config::LoggingConfig;
use crate::constants::{env_vars, system};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    let environment = get_environment();
    let config = LoggingConfig {
        level: get_log_level(&environment),
        json: environment == "production",
    };
    init_structured_logging_with(&config);
}

/// Initialize structured logging from an explicit logging configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Only the first
/// call in a process installs a subscriber.
pub fn init_structured_logging_with(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

        let console_layer = if config.json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // A subscriber may already be installed by the embedding process
        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %get_environment(),
            level = %config.level,
            json = config.json,
            "STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var(env_vars::COMPLIANCE_ENV)
        .or_else(|_| std::env::var(env_vars::APP_ENV))
        .unwrap_or_else(|_| system::DEFAULT_ENVIRONMENT.to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "test" => "debug".to_string(),
        "development" => "debug".to_string(),
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log a one-line summary of an allocation run
pub fn log_allocation_run(source: &str, agreements: usize, report: &AllocationReport) {
    tracing::info!(
        source = %source,
        agreements = agreements,
        resolved_hosts = report.resolved_hosts,
        unresolved_hosts = report.unresolved_hosts,
        diagnostics = report.diagnostics.len(),
        compliant = report.is_compliant(),
        timestamp = %report.generated_at.to_rfc3339(),
        "ALLOCATION_RUN"
    );
}

/// Log structured data for agreement management operations
pub fn log_agreement_operation(
    operation: &str,
    agreement_id: Option<&str>,
    license_type_id: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        agreement_id = agreement_id,
        license_type_id = license_type_id,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "AGREEMENT_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
