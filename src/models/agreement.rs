use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::license_type::LicenseMetric;

/// Host explicitly linked to an agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedHost {
    pub hostname: String,
    /// Units credited by this agreement during direct allocation
    #[serde(default)]
    pub covered_licenses_count: f64,
    /// Units of the host covered by any agreement
    #[serde(default)]
    pub total_covered_licenses_count: f64,
    #[serde(default)]
    pub consumed_licenses_count: f64,
}

impl AssociatedHost {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            covered_licenses_count: 0.0,
            total_covered_licenses_count: 0.0,
            consumed_licenses_count: 0.0,
        }
    }
}

/// Allocation view of one purchased license part of an agreement
///
/// `available_count` starts at the purchased `count` and only decreases.
/// A negative balance is a compliance deficit, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    /// Identifier of the associated license type this view was built from
    pub id: Uuid,
    pub agreement_id: String,
    #[serde(default)]
    pub csi: String,
    pub license_type_id: String,
    #[serde(default)]
    pub item_description: String,
    /// Copied from the license type before allocation
    #[serde(default)]
    pub metric: Option<LicenseMetric>,
    #[serde(default)]
    pub reference_number: String,
    #[serde(default)]
    pub unlimited: bool,
    #[serde(default)]
    pub catch_all: bool,
    pub count: f64,
    #[serde(default)]
    pub licenses_count: f64,
    #[serde(default)]
    pub users_count: f64,
    pub available_count: f64,
    /// Shortfall subtracted from `available_count` by the last finalization
    #[serde(default)]
    pub uncovered_count: f64,
    #[serde(default)]
    pub hosts: Vec<AssociatedHost>,
}

impl Agreement {
    pub fn new(agreement_id: impl Into<String>, license_type_id: impl Into<String>, count: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            agreement_id: agreement_id.into(),
            csi: String::new(),
            license_type_id: license_type_id.into(),
            item_description: String::new(),
            metric: None,
            reference_number: String::new(),
            unlimited: false,
            catch_all: false,
            count,
            licenses_count: 0.0,
            users_count: 0.0,
            available_count: count,
            uncovered_count: 0.0,
            hosts: Vec::new(),
        }
    }

    pub fn unlimited(mut self) -> Self {
        self.unlimited = true;
        self
    }

    pub fn catch_all(mut self) -> Self {
        self.catch_all = true;
        self
    }

    pub fn with_hosts(mut self, hostnames: &[&str]) -> Self {
        self.hosts = hostnames.iter().map(|h| AssociatedHost::new(*h)).collect();
        self
    }

    /// Whether the agreement can still cover demand
    pub fn has_capacity(&self) -> bool {
        self.unlimited || self.available_count > 0.0
    }

    pub fn is_named_user(&self) -> bool {
        self.metric
            .as_ref()
            .is_some_and(LicenseMetric::is_named_user)
    }

    pub fn associated_host(&self, hostname: &str) -> Option<&AssociatedHost> {
        self.hosts.iter().find(|h| h.hostname == hostname)
    }
}

/// Purchased license part of a stored agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedLicenseType {
    pub id: Uuid,
    pub license_type_id: String,
    #[serde(default)]
    pub reference_number: String,
    #[serde(default)]
    pub unlimited: bool,
    pub count: f64,
    #[serde(default)]
    pub catch_all: bool,
    #[serde(default)]
    pub hosts: Vec<String>,
}

/// Agreement record as persisted by the agreement store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAgreement {
    pub id: Uuid,
    pub agreement_id: String,
    #[serde(default)]
    pub csi: String,
    #[serde(default)]
    pub license_types: Vec<AssociatedLicenseType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New StoredAgreement for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStoredAgreement {
    pub agreement_id: String,
    pub csi: String,
}

/// Request to add or update one associated license type of an agreement
///
/// `id` identifies the part being updated and is ignored on add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedLicenseTypeRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub agreement_id: String,
    #[serde(default)]
    pub csi: String,
    pub license_type_id: String,
    #[serde(default)]
    pub reference_number: String,
    #[serde(default)]
    pub unlimited: bool,
    pub count: f64,
    #[serde(default)]
    pub catch_all: bool,
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl AssociatedLicenseTypeRequest {
    /// Allocation view of the requested part, as if it had just been stored
    pub fn to_allocation_view(&self) -> Agreement {
        let mut agreement = Agreement::new(
            self.agreement_id.clone(),
            self.license_type_id.clone(),
            self.count,
        );
        if let Some(id) = self.id {
            agreement.id = id;
        }
        agreement.csi = self.csi.clone();
        agreement.reference_number = self.reference_number.clone();
        agreement.unlimited = self.unlimited;
        agreement.catch_all = self.catch_all;
        agreement.hosts = self.hosts.iter().map(AssociatedHost::new).collect();
        agreement
    }

    /// Build the stored part for this request under the given id
    pub fn to_part(&self, id: Uuid) -> AssociatedLicenseType {
        AssociatedLicenseType {
            id,
            license_type_id: self.license_type_id.clone(),
            reference_number: self.reference_number.clone(),
            unlimited: self.unlimited,
            count: self.count,
            catch_all: self.catch_all,
            hosts: self.hosts.clone(),
        }
    }
}

impl StoredAgreement {
    pub fn create(new_agreement: NewStoredAgreement) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            agreement_id: new_agreement.agreement_id,
            csi: new_agreement.csi,
            license_types: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn associated_license_type(&self, id: Uuid) -> Option<&AssociatedLicenseType> {
        self.license_types.iter().find(|lt| lt.id == id)
    }

    pub fn associated_license_type_mut(&mut self, id: Uuid) -> Option<&mut AssociatedLicenseType> {
        self.license_types.iter_mut().find(|lt| lt.id == id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Flatten into one allocation view per associated license type
    pub fn to_allocation_views(&self) -> Vec<Agreement> {
        self.license_types
            .iter()
            .map(|part| Agreement {
                id: part.id,
                agreement_id: self.agreement_id.clone(),
                csi: self.csi.clone(),
                license_type_id: part.license_type_id.clone(),
                item_description: String::new(),
                metric: None,
                reference_number: part.reference_number.clone(),
                unlimited: part.unlimited,
                catch_all: part.catch_all,
                count: part.count,
                licenses_count: 0.0,
                users_count: 0.0,
                available_count: part.count,
                uncovered_count: 0.0,
                hosts: part.hosts.iter().map(AssociatedHost::new).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_start_with_full_availability() {
        let mut stored = StoredAgreement::create(NewStoredAgreement {
            agreement_id: "AGR-1".to_string(),
            csi: "CSI-9".to_string(),
        });
        stored.license_types.push(AssociatedLicenseType {
            id: Uuid::new_v4(),
            license_type_id: "A90611".to_string(),
            reference_number: "REF".to_string(),
            unlimited: false,
            count: 12.0,
            catch_all: true,
            hosts: vec!["db01".to_string(), "db02".to_string()],
        });

        let views = stored.to_allocation_views();
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.agreement_id, "AGR-1");
        assert_eq!(view.csi, "CSI-9");
        assert_eq!(view.available_count, 12.0);
        assert!(view.catch_all);
        assert_eq!(view.hosts.len(), 2);
        assert_eq!(view.hosts[1].covered_licenses_count, 0.0);
    }

    #[test]
    fn test_capacity() {
        let agreement = Agreement::new("AGR", "LT", 0.0);
        assert!(!agreement.has_capacity());
        assert!(agreement.clone().unlimited().has_capacity());

        let mut negative = Agreement::new("AGR", "LT", 5.0);
        negative.available_count = -3.0;
        assert!(!negative.has_capacity());
    }
}
