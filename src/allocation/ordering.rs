//! Canonical priority orders for agreements, host usages and associated hosts.
//!
//! Allocation mutates the very fields these orders use as keys, so passes
//! re-sort from current state rather than reusing an earlier order.

use std::cmp::Ordering;

use crate::models::{Agreement, HostUsage};

use super::index::HostUsageIndex;

/// Non-catch-all before catch-all, limited before unlimited, then larger
/// user counts first, then larger license counts first.
pub fn agreement_priority(a: &Agreement, b: &Agreement) -> Ordering {
    a.catch_all
        .cmp(&b.catch_all)
        .then_with(|| a.unlimited.cmp(&b.unlimited))
        .then_with(|| b.users_count.total_cmp(&a.users_count))
        .then_with(|| b.licenses_count.total_cmp(&a.licenses_count))
}

/// Larger uncovered counts first, then host name and license name descending
pub fn host_priority(a: &HostUsage, b: &HostUsage) -> Ordering {
    b.license_count
        .total_cmp(&a.license_count)
        .then_with(|| b.name.cmp(&a.name))
        .then_with(|| b.license_name.cmp(&a.license_name))
}

pub fn sort_agreements(agreements: &mut [Agreement]) {
    agreements.sort_by(agreement_priority);
}

/// Re-sorting invalidates any `HostUsageIndex` built over `hosts`
pub fn sort_host_usages(hosts: &mut [HostUsage]) {
    hosts.sort_by(host_priority);
}

/// Order an agreement's associated hosts by their largest current uncovered
/// count across every alias of the agreement's license type.
pub fn sort_associated_hosts(
    agreement: &mut Agreement,
    aliases: &[String],
    hosts: &[HostUsage],
    index: &HostUsageIndex,
) {
    let max_license_count = |hostname: &str| -> f64 {
        aliases
            .iter()
            .filter_map(|alias| index.position(alias, hostname))
            .map(|position| hosts[position].license_count)
            .fold(0.0, f64::max)
    };

    agreement.hosts.sort_by(|a, b| {
        max_license_count(&b.hostname).total_cmp(&max_license_count(&a.hostname))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_counts(mut agreement: Agreement, users: f64, licenses: f64) -> Agreement {
        agreement.users_count = users;
        agreement.licenses_count = licenses;
        agreement
    }

    #[test]
    fn test_agreement_order_follows_tie_break_chain() {
        let mut agreements = vec![
            Agreement::new("C", "LT", 10.0).catch_all(),
            with_counts(Agreement::new("B", "LT", 5.0).unlimited(), 0.0, 5.0),
            with_counts(Agreement::new("A", "LT", 20.0), 0.0, 20.0),
        ];

        sort_agreements(&mut agreements);

        let order: Vec<&str> = agreements.iter().map(|a| a.agreement_id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_users_count_outranks_licenses_count() {
        let mut agreements = vec![
            with_counts(Agreement::new("P", "LT", 40.0), 0.0, 40.0),
            with_counts(Agreement::new("U", "LT", 3.0), 3.0, 0.0),
            with_counts(Agreement::new("P2", "LT", 60.0), 0.0, 60.0),
        ];

        sort_agreements(&mut agreements);

        let order: Vec<&str> = agreements.iter().map(|a| a.agreement_id.as_str()).collect();
        assert_eq!(order, vec!["U", "P2", "P"]);
    }

    #[test]
    fn test_host_order() {
        let mut hosts = vec![
            HostUsage::new("alpha", "Oracle ENT", 2.0),
            HostUsage::new("beta", "Oracle ENT", 2.0),
            HostUsage::new("beta", "Diagnostics Pack", 2.0),
            HostUsage::new("gamma", "Oracle ENT", 8.0),
        ];

        sort_host_usages(&mut hosts);

        let order: Vec<(&str, &str)> = hosts
            .iter()
            .map(|h| (h.name.as_str(), h.license_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("gamma", "Oracle ENT"),
                ("beta", "Oracle ENT"),
                ("beta", "Diagnostics Pack"),
                ("alpha", "Oracle ENT"),
            ]
        );
    }

    #[test]
    fn test_associated_hosts_use_largest_alias_count() {
        let hosts = vec![
            HostUsage::new("db01", "Oracle ENT", 2.0),
            HostUsage::new("db02", "Oracle ENT", 3.0),
            HostUsage::new("db01", "Oracle EE", 6.0),
        ];
        let index = HostUsageIndex::build(&hosts);
        let aliases = vec!["Oracle ENT".to_string(), "Oracle EE".to_string()];
        let mut agreement =
            Agreement::new("AGR", "LT", 10.0).with_hosts(&["db03", "db02", "db01"]);

        sort_associated_hosts(&mut agreement, &aliases, &hosts, &index);

        let order: Vec<&str> = agreement.hosts.iter().map(|h| h.hostname.as_str()).collect();
        assert_eq!(order, vec!["db01", "db02", "db03"]);
    }
}
