//! Maps raw license names on host usages to license-type ids.

use tracing::debug;

use crate::models::HostUsage;

use super::context::AllocationContext;
use super::diagnostics::{DiagnosticKind, Diagnostics};

/// Set `license_type_id` on every host usage whose license name is an alias
/// of a catalog license type. The first matching license type wins.
///
/// Unresolved hosts keep `license_type_id = None`; no agreement alias can
/// match them, so they take no part in allocation. Returns the number of
/// resolved hosts.
pub fn resolve_aliases(
    context: &AllocationContext,
    hosts: &mut [HostUsage],
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut resolved = 0;

    for host in hosts.iter_mut() {
        match context.catalog().resolve_alias(&host.license_name) {
            Some(license_type) => {
                host.license_type_id = Some(license_type.id.clone());
                resolved += 1;
            }
            None => {
                host.license_type_id = None;
                diagnostics.record(
                    DiagnosticKind::UnresolvedAlias,
                    host.name.clone(),
                    format!(
                        "no license type has alias '{}' (count {})",
                        host.license_name, host.original_count
                    ),
                );
            }
        }
    }

    debug!(
        resolved = resolved,
        unresolved = hosts.len() - resolved,
        "Resolved host license aliases"
    );

    resolved
}
