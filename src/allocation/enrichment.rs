//! Completes agreement views from the license-type catalog before ordering.

use crate::models::{Agreement, LicenseMetric};

use super::context::AllocationContext;
use super::diagnostics::{DiagnosticKind, Diagnostics};

/// Copy description and metric from each agreement's license type and
/// populate the metric-derived count used for ordering.
///
/// Processor licenses fill `licenses_count`, named-user licenses fill
/// `users_count`. Agreements with an unknown license type are left without a
/// metric and contribute no coverage.
pub fn fill_agreements_info(
    context: &AllocationContext,
    agreements: &mut [Agreement],
    diagnostics: &mut Diagnostics,
) {
    for agreement in agreements.iter_mut() {
        let Some(license_type) = context.catalog().get(&agreement.license_type_id) else {
            diagnostics.record(
                DiagnosticKind::UnknownLicenseType,
                agreement.agreement_id.clone(),
                format!("unknown license type id '{}'", agreement.license_type_id),
            );
            continue;
        };

        agreement.item_description = license_type.item_description.clone();
        agreement.metric = Some(license_type.metric.clone());

        match license_type.metric {
            LicenseMetric::ProcessorPerpetual => agreement.licenses_count = agreement.count,
            LicenseMetric::NamedUserPlusPerpetual => agreement.users_count = agreement.count,
            _ => {}
        }
    }
}
