//! Explicit per-run context handed to every allocation component.

use std::collections::HashSet;

use crate::config::AllocationConfig;
use crate::models::LicenseType;

use super::index::LicenseTypeCatalog;

/// Everything the allocation passes need besides the records they mutate
#[derive(Debug, Clone, Default)]
pub struct AllocationContext {
    catalog: LicenseTypeCatalog,
    debug: bool,
    known_hosts: Option<HashSet<String>>,
}

impl AllocationContext {
    pub fn new(license_types: Vec<LicenseType>) -> Self {
        Self {
            catalog: LicenseTypeCatalog::new(license_types),
            debug: false,
            known_hosts: None,
        }
    }

    pub fn from_config(config: &AllocationConfig, license_types: Vec<LicenseType>) -> Self {
        Self::new(license_types).with_debug(config.debug_assignment_algorithm)
    }

    /// Emit the intermediate state of every pass at debug level
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Host inventory that associated host names are validated against
    pub fn with_known_hosts<I, S>(mut self, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_hosts = Some(hostnames.into_iter().map(Into::into).collect());
        self
    }

    pub fn catalog(&self) -> &LicenseTypeCatalog {
        &self.catalog
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn known_hosts(&self) -> Option<&HashSet<String>> {
        self.known_hosts.as_ref()
    }
}
