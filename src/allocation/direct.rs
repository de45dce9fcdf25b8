//! Distributes each agreement's units to the hosts explicitly associated with it.

use tracing::debug;

use crate::models::{Agreement, HostUsage};

use super::context::AllocationContext;
use super::coverage::cover_host;
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::index::HostUsageIndex;
use super::ordering::sort_associated_hosts;

/// Assign available units of every agreement, in slice order, to its
/// associated hosts that consume any alias of its license type.
///
/// Associated hosts are served largest uncovered count first. Scanning stops
/// as soon as the agreement runs out of capacity.
pub fn assign_to_associated_hosts(
    context: &AllocationContext,
    agreements: &mut [Agreement],
    hosts: &mut [HostUsage],
    index: &HostUsageIndex,
    diagnostics: &mut Diagnostics,
) {
    debug_assert!(index.matches(hosts), "host index is stale");

    for (position, agreement) in agreements.iter_mut().enumerate() {
        // Unknown license types were reported when the views were filled
        let Some(aliases) = context.catalog().aliases_of(&agreement.license_type_id) else {
            continue;
        };

        sort_associated_hosts(agreement, aliases, hosts, index);

        if context.debug() {
            debug!(
                position = position,
                agreement = %serde_json::to_string(&*agreement).unwrap_or_default(),
                "Distributing agreement licenses to associated hosts"
            );
        }

        for host_position in 0..agreement.hosts.len() {
            for alias in aliases {
                if !agreement.has_capacity() {
                    break;
                }

                let hostname = &agreement.hosts[host_position].hostname;
                let Some(usage_position) = index.position(alias, hostname) else {
                    continue;
                };

                let usage = &mut hosts[usage_position];
                if usage.license_count <= 0.0 {
                    continue;
                }

                match cover_host(agreement, usage) {
                    Some(coverage) => {
                        agreement.hosts[host_position].covered_licenses_count += coverage.credited;

                        if context.debug() {
                            debug!(
                                hostname = %usage.name,
                                license_name = %alias,
                                covered = coverage.host_units,
                                host_covered_count =
                                    agreement.hosts[host_position].covered_licenses_count,
                                host_license_count = usage.license_count,
                                available_count = agreement.available_count,
                                "Covered associated host"
                            );
                        }
                    }
                    None => diagnostics.record(
                        DiagnosticKind::UnknownMetric,
                        agreement.agreement_id.clone(),
                        format!(
                            "cannot cover host '{}': unknown metric {:?}",
                            usage.name,
                            agreement.metric.as_ref().map(|m| m.as_str())
                        ),
                    ),
                }
            }

            if !agreement.has_capacity() {
                break;
            }
        }
    }
}
