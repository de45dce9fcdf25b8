//! # Error Types
//!
//! Structured errors for the compliance core using thiserror. The allocation
//! engine absorbs almost every data problem into its diagnostics; the variants
//! here cover the hard failures surfaced to callers.

use crate::config::ConfigurationError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Host not found in inventory: {hostname}")]
    HostNotFound { hostname: String },

    #[error("Agreement not found: {agreement_id}")]
    AgreementNotFound { agreement_id: String },

    #[error("Associated license type not found: {id}")]
    AssociatedLicenseTypeNotFound { id: Uuid },

    #[error("License type not found: {license_type_id}")]
    LicenseTypeNotFound { license_type_id: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Store operation failed: {operation}: {message}")]
    Store { operation: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ComplianceError {
    pub fn host_not_found(hostname: impl Into<String>) -> Self {
        Self::HostNotFound {
            hostname: hostname.into(),
        }
    }

    pub fn store(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether the error rejects the caller's input rather than signalling
    /// an infrastructure failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::HostNotFound { .. }
                | Self::AgreementNotFound { .. }
                | Self::AssociatedLicenseTypeNotFound { .. }
                | Self::LicenseTypeNotFound { .. }
                | Self::InvalidRequest(_)
        )
    }
}

impl From<serde_json::Error> for ComplianceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ComplianceError>;
