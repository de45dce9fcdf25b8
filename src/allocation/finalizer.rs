//! # Shortfall & Coverage Finalizer
//!
//! Computes, for every agreement, how much demand its hosts still leave
//! uncovered and charges that shortfall against `available_count`. The
//! associated-host totals (`total_covered_licenses_count`,
//! `consumed_licenses_count`) are filled here from the final host balances.
//!
//! The shortfall applied by a run is kept in `uncovered_count` and restored
//! before recomputing, so finalizing an already finalized snapshot leaves it
//! unchanged.

use std::collections::BTreeMap;

use tracing::debug;

use crate::constants::units::NAMED_USERS_PER_PROCESSOR;
use crate::models::{Agreement, HostUsage, MetricFamily};

use super::context::AllocationContext;
use super::cover_status::{cover_status_by_license_name, CoverStatus};
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::index::HostUsageIndex;

/// Finalize coverage and availability of every agreement.
///
/// Returns the per-license-name totals the shortfalls were computed from.
pub fn finalize_coverage(
    context: &AllocationContext,
    agreements: &mut [Agreement],
    hosts: &[HostUsage],
    index: &HostUsageIndex,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, CoverStatus> {
    debug_assert!(index.matches(hosts), "host index is stale");

    let statuses = cover_status_by_license_name(hosts);

    for agreement in agreements.iter_mut() {
        let Some(aliases) = context.catalog().aliases_of(&agreement.license_type_id) else {
            continue;
        };

        let family = agreement.metric.as_ref().and_then(|m| m.family());
        let mut uncovered_by_associated_hosts = 0.0;
        let mut uncovered_by_all_hosts = 0.0;

        for alias in aliases {
            for associated in agreement.hosts.iter_mut() {
                let Some(position) = index.position(alias, &associated.hostname) else {
                    continue;
                };
                let host = &hosts[position];

                match family {
                    Some(MetricFamily::ProcessorEquivalent) => {
                        associated.total_covered_licenses_count = host.covered_count();
                        associated.consumed_licenses_count = host.original_count;
                        uncovered_by_associated_hosts += host.license_count;
                    }
                    Some(MetricFamily::NamedUser) => {
                        associated.total_covered_licenses_count =
                            host.covered_count() * NAMED_USERS_PER_PROCESSOR;
                        associated.consumed_licenses_count =
                            host.original_count * NAMED_USERS_PER_PROCESSOR;
                        uncovered_by_associated_hosts +=
                            host.license_count * NAMED_USERS_PER_PROCESSOR;
                    }
                    None => diagnostics.record(
                        DiagnosticKind::UnknownMetric,
                        agreement.agreement_id.clone(),
                        format!(
                            "cannot total coverage of host '{}': unknown metric",
                            associated.hostname
                        ),
                    ),
                }
            }

            if let Some(status) = statuses.get(alias) {
                uncovered_by_all_hosts += status.uncovered();
            }
        }

        let uncovered = if agreement.catch_all {
            uncovered_by_all_hosts
        } else {
            uncovered_by_associated_hosts
        };

        let available_before = agreement.available_count + agreement.uncovered_count;
        agreement.uncovered_count = 0.0;

        if uncovered > 0.0 {
            let idle_threshold = if agreement.is_named_user() {
                NAMED_USERS_PER_PROCESSOR
            } else {
                0.0
            };

            if available_before > idle_threshold {
                diagnostics.record(
                    DiagnosticKind::IdleCapacity,
                    agreement.agreement_id.clone(),
                    format!(
                        "{} licenses still available while {} are uncovered (license type {})",
                        available_before, uncovered, agreement.license_type_id
                    ),
                );
            }

            agreement.uncovered_count = uncovered;
        }

        agreement.available_count = available_before - agreement.uncovered_count;

        if context.debug() {
            debug!(
                agreement_id = %agreement.agreement_id,
                license_type_id = %agreement.license_type_id,
                uncovered = uncovered,
                available_count = agreement.available_count,
                "Finalized agreement coverage"
            );
        }
    }

    statuses
}
