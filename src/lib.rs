#![allow(clippy::doc_markdown)] // Allow technical terms like YAML, JSON in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # License Compliance Core
//!
//! License allocation engine that reconciles purchased database license
//! agreements against the licenses a fleet of hosts actually consumes.
//!
//! ## Overview
//!
//! Every run takes a snapshot of agreements, the license-type catalog and
//! per-host consumption, and answers two questions: how much of each
//! agreement is still available, and which hosts still lack coverage. A
//! negative availability is a compliance deficit.
//!
//! ## Module Organization
//!
//! - [`allocation`] - The allocation engine and its passes
//! - [`models`] - Agreements, license types and host usages
//! - [`services`] - Agreement management and search over the stores
//! - [`store`] - Async store traits and the in-memory backend
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - Structured logging initialisation and helpers
//! - [`validation`] - Request validation
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use compliance_core::allocation::{AllocationContext, AllocationEngine};
//! use compliance_core::models::{Agreement, HostUsage, LicenseMetric, LicenseType};
//!
//! let context = AllocationContext::new(vec![LicenseType::new(
//!     "L10006",
//!     LicenseMetric::NamedUserPlusPerpetual,
//!     &["Oracle EE"],
//! )]);
//!
//! let mut agreements = vec![Agreement::new("AGR-7", "L10006", 50.0).with_hosts(&["db01"])];
//! let mut hosts = vec![HostUsage::new("db01", "Oracle EE", 3.0)];
//!
//! let report = AllocationEngine::new(context)
//!     .allocate(&mut agreements, &mut hosts)
//!     .unwrap();
//!
//! // 50 named users cover two processor licenses of three
//! assert_eq!(hosts[0].license_count, 1.0);
//! assert_eq!(agreements[0].available_count, -25.0);
//! assert!(!report.is_compliant());
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod allocation;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

pub use allocation::{
    AllocationContext, AllocationEngine, AllocationReport, Diagnostic, DiagnosticKind,
    LicenseCompliance,
};
pub use config::{ComplianceConfig, ConfigManager};
pub use error::{ComplianceError, Result};
pub use models::{
    Agreement, AssociatedHost, AssociatedLicenseType, AssociatedLicenseTypeRequest, HostUsage,
    LicenseMetric, LicenseType, StoredAgreement,
};
pub use services::{AgreementSearchFilter, AgreementSearchOutcome, AgreementService};
pub use store::{InMemoryStore, StoreSet};
