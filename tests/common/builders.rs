//! Test data builders for allocation scenarios

#![allow(dead_code)] // Not every test binary uses every builder

use compliance_core::models::{
    Agreement, AssociatedLicenseTypeRequest, HostUsage, LicenseMetric, LicenseType,
};

pub const PROCESSOR_TYPE: &str = "A90611";
pub const NAMED_USER_TYPE: &str = "A90650";
pub const COMPUTER_TYPE: &str = "L10006";

/// Catalog used by most scenarios
///
/// "Oracle ENT" is an alias of both the processor and the named-user type;
/// alias resolution picks the processor type because it comes first.
pub fn catalog() -> Vec<LicenseType> {
    vec![
        LicenseType::new(
            PROCESSOR_TYPE,
            LicenseMetric::ProcessorPerpetual,
            &["Oracle ENT", "Oracle ENT Cluster"],
        )
        .with_description("Oracle Database Enterprise Edition"),
        LicenseType::new(
            NAMED_USER_TYPE,
            LicenseMetric::NamedUserPlusPerpetual,
            &["Oracle EE", "Oracle ENT"],
        )
        .with_description("Oracle Database Enterprise Edition NUP"),
        LicenseType::new(COMPUTER_TYPE, LicenseMetric::ComputerPerpetual, &["Oracle STD"])
            .with_description("Oracle Database Standard Edition"),
    ]
}

/// Builder pattern for allocation agreement views
pub struct AgreementBuilder {
    agreement_id: String,
    license_type_id: String,
    count: f64,
    unlimited: bool,
    catch_all: bool,
    hosts: Vec<String>,
}

impl AgreementBuilder {
    pub fn new(agreement_id: &str, license_type_id: &str) -> Self {
        Self {
            agreement_id: agreement_id.to_string(),
            license_type_id: license_type_id.to_string(),
            count: 0.0,
            unlimited: false,
            catch_all: false,
            hosts: Vec::new(),
        }
    }

    pub fn with_count(mut self, count: f64) -> Self {
        self.count = count;
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.unlimited = true;
        self
    }

    pub fn catch_all(mut self) -> Self {
        self.catch_all = true;
        self
    }

    pub fn with_host(mut self, hostname: &str) -> Self {
        self.hosts.push(hostname.to_string());
        self
    }

    pub fn request(self) -> AssociatedLicenseTypeRequest {
        AssociatedLicenseTypeRequest {
            id: None,
            agreement_id: self.agreement_id,
            csi: "CSI-1".to_string(),
            license_type_id: self.license_type_id,
            reference_number: String::new(),
            unlimited: self.unlimited,
            count: self.count,
            catch_all: self.catch_all,
            hosts: self.hosts,
        }
    }

    pub fn build(self) -> Agreement {
        self.request().to_allocation_view()
    }
}

pub fn host(name: &str, license_name: &str, count: f64) -> HostUsage {
    HostUsage::new(name, license_name, count)
}

pub fn find<'a>(agreements: &'a [Agreement], agreement_id: &str) -> &'a Agreement {
    agreements
        .iter()
        .find(|a| a.agreement_id == agreement_id)
        .unwrap_or_else(|| panic!("agreement {agreement_id} missing"))
}

pub fn find_host<'a>(hosts: &'a [HostUsage], name: &str, license_name: &str) -> &'a HostUsage {
    hosts
        .iter()
        .find(|h| h.name == name && h.license_name == license_name)
        .unwrap_or_else(|| panic!("host usage {name}/{license_name} missing"))
}
