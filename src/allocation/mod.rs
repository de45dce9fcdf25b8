//! # License Allocation Engine
//!
//! Assigns purchased license units to the hosts consuming them and computes
//! what every agreement has left.
//!
//! ## Pipeline
//!
//! 1. **Alias resolution** ([`alias_resolver`]): host license names to license types
//! 2. **Agreement enrichment** ([`enrichment`]): metric and metric-derived counts
//! 3. **Ordering** ([`ordering`]): agreement and host priority
//! 4. **Direct allocation** ([`direct`]): agreements to their associated hosts
//! 5. **Catch-all allocation** ([`catch_all`]): leftovers to any matching host
//! 6. **Finalization** ([`finalizer`]): shortfalls and associated-host totals
//!
//! The engine performs no I/O. It mutates the agreements and host usages it
//! is given and returns a report with the anomalies it observed. Only a
//! host usage with an out-of-range balance or a dangling host reference
//! aborts a run, and both are checked before anything is mutated.
//!
//! ```rust
//! use compliance_core::allocation::{AllocationContext, AllocationEngine};
//! use compliance_core::models::{Agreement, HostUsage, LicenseMetric, LicenseType};
//!
//! let context = AllocationContext::new(vec![LicenseType::new(
//!     "A90611",
//!     LicenseMetric::ProcessorPerpetual,
//!     &["Oracle ENT"],
//! )]);
//! let engine = AllocationEngine::new(context);
//!
//! let mut agreements = vec![Agreement::new("AGR-1", "A90611", 10.0).with_hosts(&["db01"])];
//! let mut hosts = vec![HostUsage::new("db01", "Oracle ENT", 15.0)];
//!
//! let report = engine.allocate(&mut agreements, &mut hosts).unwrap();
//! assert_eq!(agreements[0].available_count, -5.0);
//! assert!(report.diagnostics.is_empty());
//! ```

pub mod alias_resolver;
pub mod catch_all;
pub mod context;
pub mod cover_status;
pub mod coverage;
pub mod diagnostics;
pub mod direct;
pub mod enrichment;
pub mod finalizer;
pub mod index;
pub mod ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{ComplianceError, Result};
use crate::models::{Agreement, HostUsage};
use crate::validation;

pub use context::AllocationContext;
pub use cover_status::{CoverStatus, LicenseCompliance};
pub use coverage::{cover_host, Coverage};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use index::{HostUsageIndex, LicenseTypeCatalog};

/// Outcome of one allocation run besides the mutated records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationReport {
    pub resolved_hosts: usize,
    pub unresolved_hosts: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub license_compliance: Vec<LicenseCompliance>,
    pub generated_at: DateTime<Utc>,
}

impl AllocationReport {
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn is_compliant(&self) -> bool {
        self.license_compliance.iter().all(|lc| lc.compliant)
    }
}

/// Runs the full allocation pipeline over one snapshot
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    context: AllocationContext,
}

impl AllocationEngine {
    pub fn new(context: AllocationContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AllocationContext {
        &self.context
    }

    /// Reject the run if any associated host is missing from the inventory.
    /// Skipped when the context carries no inventory.
    pub fn validate_host_references(&self, agreements: &[Agreement]) -> Result<()> {
        let Some(known_hosts) = self.context.known_hosts() else {
            return Ok(());
        };

        for agreement in agreements {
            if let Some(missing) = agreement
                .hosts
                .iter()
                .find(|host| !known_hosts.contains(&host.hostname))
            {
                return Err(ComplianceError::host_not_found(missing.hostname.clone()));
            }
        }

        Ok(())
    }

    /// Allocate agreement units to host usages in place.
    ///
    /// On return `agreements` is in priority order with final availability
    /// and associated-host totals, and `hosts` is in priority order with
    /// their remaining uncovered balances.
    #[instrument(skip_all, fields(agreements = agreements.len(), hosts = hosts.len()))]
    pub fn allocate(
        &self,
        agreements: &mut [Agreement],
        hosts: &mut [HostUsage],
    ) -> Result<AllocationReport> {
        validation::validate_host_usages(hosts)?;
        self.validate_host_references(agreements)?;

        let context = &self.context;
        let mut diagnostics = Diagnostics::new();

        let resolved_hosts = alias_resolver::resolve_aliases(context, hosts, &mut diagnostics);
        enrichment::fill_agreements_info(context, agreements, &mut diagnostics);

        ordering::sort_agreements(agreements);
        ordering::sort_host_usages(hosts);
        self.debug_state("Sorted agreements and hosts", agreements, hosts);

        let index = HostUsageIndex::build(hosts);
        direct::assign_to_associated_hosts(context, agreements, hosts, &index, &mut diagnostics);

        // Positions in the index refer to the old order
        ordering::sort_host_usages(hosts);
        let index = HostUsageIndex::build(hosts);
        self.debug_state("Resorted hosts after direct allocation", agreements, hosts);

        catch_all::assign_from_catch_all_agreements(context, agreements, hosts, &mut diagnostics);

        let statuses =
            finalizer::finalize_coverage(context, agreements, hosts, &index, &mut diagnostics);

        let report = AllocationReport {
            resolved_hosts,
            unresolved_hosts: hosts.len() - resolved_hosts,
            diagnostics: diagnostics.into_vec(),
            license_compliance: cover_status::license_compliance(&statuses),
            generated_at: Utc::now(),
        };

        info!(
            agreements = agreements.len(),
            hosts = hosts.len(),
            resolved_hosts = report.resolved_hosts,
            anomalies = report.diagnostics.len(),
            compliant = report.is_compliant(),
            "Allocation finished"
        );

        Ok(report)
    }

    fn debug_state(&self, stage: &str, agreements: &[Agreement], hosts: &[HostUsage]) {
        if !self.context.debug() {
            return;
        }

        debug!(
            stage = stage,
            agreements = %serde_json::to_string(agreements).unwrap_or_default(),
            hosts = %serde_json::to_string(hosts).unwrap_or_default(),
            "Allocation state"
        );
    }
}
