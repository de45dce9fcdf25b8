//! Consumption versus coverage totals per license name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::HostUsage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverStatus {
    pub consumed: f64,
    pub covered: f64,
}

impl CoverStatus {
    pub fn uncovered(&self) -> f64 {
        self.consumed - self.covered
    }
}

/// Compliance of one license name across the whole fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseCompliance {
    pub license_name: String,
    pub consumed: f64,
    pub covered: f64,
    pub compliant: bool,
}

/// Totals over every host usage regardless of association
pub fn cover_status_by_license_name(hosts: &[HostUsage]) -> BTreeMap<String, CoverStatus> {
    let mut statuses: BTreeMap<String, CoverStatus> = BTreeMap::new();

    for host in hosts {
        let status = statuses.entry(host.license_name.clone()).or_default();
        status.consumed += host.original_count;
        status.covered += host.covered_count();
    }

    statuses
}

pub fn license_compliance(statuses: &BTreeMap<String, CoverStatus>) -> Vec<LicenseCompliance> {
    statuses
        .iter()
        .map(|(license_name, status)| LicenseCompliance {
            license_name: license_name.clone(),
            consumed: status.consumed,
            covered: status.covered,
            compliant: status.covered >= status.consumed,
        })
        .collect()
}
