//! Distributes what is left of catch-all agreements to any consuming host.

use tracing::debug;

use crate::models::{Agreement, HostUsage};

use super::context::AllocationContext;
use super::coverage::cover_host;
use super::diagnostics::{DiagnosticKind, Diagnostics};

/// Walk host usages in slice order and cover each uncovered one from the
/// catch-all agreements, in agreement slice order, whose license type lists
/// the host's license name as an alias.
///
/// Catch-all coverage does not credit any associated-host record.
pub fn assign_from_catch_all_agreements(
    context: &AllocationContext,
    agreements: &mut [Agreement],
    hosts: &mut [HostUsage],
    diagnostics: &mut Diagnostics,
) {
    for host in hosts.iter_mut() {
        if host.license_count <= 0.0 {
            continue;
        }

        for agreement in agreements.iter_mut() {
            if !agreement.catch_all || !agreement.has_capacity() {
                continue;
            }

            let Some(aliases) = context.catalog().aliases_of(&agreement.license_type_id) else {
                continue;
            };

            for alias in aliases {
                if !agreement.has_capacity() {
                    break;
                }

                if &host.license_name != alias {
                    continue;
                }

                match cover_host(agreement, host) {
                    Some(coverage) if context.debug() => debug!(
                        metric = ?agreement.metric,
                        unlimited = agreement.unlimited,
                        covered = coverage.host_units,
                        hostname = %host.name,
                        license_name = %alias,
                        available_count = agreement.available_count,
                        "Covered host from catch-all agreement"
                    ),
                    Some(_) => {}
                    None => diagnostics.record(
                        DiagnosticKind::UnknownMetric,
                        agreement.agreement_id.clone(),
                        format!(
                            "cannot cover host '{}' from catch-all: unknown metric {:?}",
                            host.name,
                            agreement.metric.as_ref().map(|m| m.as_str())
                        ),
                    ),
                }
            }
        }
    }

    if context.debug() {
        debug!(
            hosts = %serde_json::to_string(&*hosts).unwrap_or_default(),
            "Catch-all distribution finished"
        );
    }
}
