//! Derived lookup indexes used by the allocation passes.
//!
//! `HostUsageIndex` stores positions into the host-usage slice it was built
//! from. Sorting that slice invalidates every position, so the index is
//! rebuilt wholesale after each re-sort and never patched in place.

use std::collections::HashMap;

use crate::models::{HostUsage, LicenseType};

/// License name -> host name -> position in the backing host-usage slice
///
/// Assumes no cluster shares a name with a host.
#[derive(Debug, Clone, Default)]
pub struct HostUsageIndex {
    by_license: HashMap<String, HashMap<String, usize>>,
    len: usize,
}

impl HostUsageIndex {
    pub fn build(hosts: &[HostUsage]) -> Self {
        let mut by_license: HashMap<String, HashMap<String, usize>> = HashMap::new();

        for (position, host) in hosts.iter().enumerate() {
            by_license
                .entry(host.license_name.clone())
                .or_default()
                .insert(host.name.clone(), position);
        }

        Self {
            by_license,
            len: hosts.len(),
        }
    }

    /// Position of the usage record of `hostname` under `license_name`
    pub fn position(&self, license_name: &str, hostname: &str) -> Option<usize> {
        self.by_license
            .get(license_name)
            .and_then(|hosts| hosts.get(hostname))
            .copied()
    }

    pub fn has_license(&self, license_name: &str) -> bool {
        self.by_license.contains_key(license_name)
    }

    /// Whether every stored position still points at the record it was
    /// built from
    pub fn matches(&self, hosts: &[HostUsage]) -> bool {
        self.len == hosts.len()
            && self.by_license.iter().all(|(license_name, by_host)| {
                by_host.iter().all(|(hostname, &position)| {
                    hosts.get(position).is_some_and(|host| {
                        host.name == *hostname && host.license_name == *license_name
                    })
                })
            })
    }
}

/// License-type catalog keyed by id, preserving catalog order for iteration
#[derive(Debug, Clone, Default)]
pub struct LicenseTypeCatalog {
    license_types: Vec<LicenseType>,
    by_id: HashMap<String, usize>,
}

impl LicenseTypeCatalog {
    pub fn new(license_types: Vec<LicenseType>) -> Self {
        let by_id = license_types
            .iter()
            .enumerate()
            .map(|(position, lt)| (lt.id.clone(), position))
            .collect();

        Self {
            license_types,
            by_id,
        }
    }

    pub fn get(&self, license_type_id: &str) -> Option<&LicenseType> {
        self.by_id
            .get(license_type_id)
            .map(|&position| &self.license_types[position])
    }

    pub fn aliases_of(&self, license_type_id: &str) -> Option<&[String]> {
        self.get(license_type_id).map(|lt| lt.aliases.as_slice())
    }

    /// First license type, in catalog order, listing `license_name` as an alias
    pub fn resolve_alias(&self, license_name: &str) -> Option<&LicenseType> {
        self.license_types
            .iter()
            .find(|lt| lt.has_alias(license_name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LicenseType> {
        self.license_types.iter()
    }

    pub fn len(&self) -> usize {
        self.license_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.license_types.is_empty()
    }
}
