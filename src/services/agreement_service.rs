use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::allocation::{AllocationContext, AllocationEngine, AllocationReport};
use crate::config::ComplianceConfig;
use crate::error::{ComplianceError, Result};
use crate::logging::{log_agreement_operation, log_allocation_run};
use crate::models::{
    Agreement, AssociatedLicenseTypeRequest, LicenseType, NewStoredAgreement, StoredAgreement,
};
use crate::store::StoreSet;
use crate::validation;

use super::agreement_filter::AgreementSearchFilter;

/// Agreement views matching a search, after a full allocation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementSearchOutcome {
    pub agreements: Vec<Agreement>,
    pub report: AllocationReport,
}

/// Manages the associated license types of stored agreements and runs the
/// allocation engine over the stored fleet for searches
#[derive(Debug, Clone)]
pub struct AgreementService {
    stores: StoreSet,
    config: ComplianceConfig,
}

impl AgreementService {
    pub fn new(stores: StoreSet, config: ComplianceConfig) -> Self {
        Self { stores, config }
    }

    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    /// Add an associated license type to the agreement with the request's
    /// `agreement_id`, creating the agreement when it does not exist yet.
    ///
    /// Returns the id of the stored agreement.
    #[instrument(skip(self, request), fields(agreement_id = %request.agreement_id))]
    pub async fn add_associated_license_type(
        &self,
        request: AssociatedLicenseTypeRequest,
    ) -> Result<Uuid> {
        validation::validate_add_request(&request)?;
        self.check_hosts(&request.hosts).await?;
        let license_type = self.license_type(&request.license_type_id).await?;

        let existing = self
            .stores
            .agreements
            .find_agreement(&request.agreement_id)
            .await?;
        let is_new = existing.is_none();
        let mut agreement = existing.unwrap_or_else(|| {
            StoredAgreement::create(NewStoredAgreement {
                agreement_id: request.agreement_id.clone(),
                csi: request.csi.clone(),
            })
        });

        let mut part = request.to_part(Uuid::new_v4());
        part.license_type_id = license_type.id;
        agreement.license_types.push(part);

        let id = if is_new {
            self.stores.agreements.insert_agreement(agreement).await?
        } else {
            agreement.touch();
            let id = agreement.id;
            self.stores.agreements.update_agreement(agreement).await?;
            id
        };

        log_agreement_operation(
            "add_associated_license_type",
            Some(request.agreement_id.as_str()),
            Some(request.license_type_id.as_str()),
            if is_new { "created" } else { "updated" },
            None,
        );

        Ok(id)
    }

    /// Overwrite the associated license type identified by `request.id`
    #[instrument(skip(self, request), fields(id = ?request.id))]
    pub async fn update_associated_license_type(
        &self,
        request: AssociatedLicenseTypeRequest,
    ) -> Result<()> {
        validation::validate_update_request(&request)?;
        let id = request.id.ok_or_else(|| {
            ComplianceError::InvalidRequest("Associated license type id is required".to_string())
        })?;
        self.check_hosts(&request.hosts).await?;

        let mut agreement = self
            .stores
            .agreements
            .find_by_associated_license_type(id)
            .await?;
        let license_type = self.license_type(&request.license_type_id).await?;

        let part = agreement
            .associated_license_type_mut(id)
            .ok_or(ComplianceError::AssociatedLicenseTypeNotFound { id })?;
        *part = request.to_part(id);
        part.license_type_id = license_type.id;
        agreement.touch();

        let agreement_id = agreement.agreement_id.clone();
        self.stores.agreements.update_agreement(agreement).await?;

        log_agreement_operation(
            "update_associated_license_type",
            Some(agreement_id.as_str()),
            Some(request.license_type_id.as_str()),
            "updated",
            None,
        );

        Ok(())
    }

    /// Remove an associated license type; the agreement goes with its last part
    #[instrument(skip(self))]
    pub async fn delete_associated_license_type(&self, id: Uuid) -> Result<()> {
        let mut agreement = self
            .stores
            .agreements
            .find_by_associated_license_type(id)
            .await?;

        if agreement.license_types.len() <= 1 {
            self.stores.agreements.remove_agreement(agreement.id).await?;
            log_agreement_operation(
                "delete_associated_license_type",
                Some(agreement.agreement_id.as_str()),
                None,
                "agreement_removed",
                None,
            );
            return Ok(());
        }

        agreement.license_types.retain(|part| part.id != id);
        agreement.touch();
        let agreement_id = agreement.agreement_id.clone();
        self.stores.agreements.update_agreement(agreement).await?;

        log_agreement_operation(
            "delete_associated_license_type",
            Some(agreement_id.as_str()),
            None,
            "part_removed",
            None,
        );

        Ok(())
    }

    /// Associate a host with a license part. Already associated hosts are
    /// left alone.
    #[instrument(skip(self))]
    pub async fn add_host_to_associated_license_type(&self, id: Uuid, hostname: &str) -> Result<()> {
        validation::validate_hostname(hostname)?;

        let mut agreement = self
            .stores
            .agreements
            .find_by_associated_license_type(id)
            .await?;
        let part = agreement
            .associated_license_type(id)
            .ok_or(ComplianceError::AssociatedLicenseTypeNotFound { id })?;

        if part.hosts.iter().any(|h| h == hostname) {
            debug!(hostname, "Host already associated");
            return Ok(());
        }

        self.check_hosts(&[hostname.to_string()]).await?;

        if let Some(part) = agreement.associated_license_type_mut(id) {
            part.hosts.push(hostname.to_string());
        }
        agreement.touch();
        self.stores.agreements.update_agreement(agreement).await
    }

    /// Dissociate a host from a license part. Unknown hosts are ignored.
    #[instrument(skip(self))]
    pub async fn remove_host_from_associated_license_type(
        &self,
        id: Uuid,
        hostname: &str,
    ) -> Result<()> {
        let mut agreement = self
            .stores
            .agreements
            .find_by_associated_license_type(id)
            .await?;
        let part = agreement
            .associated_license_type_mut(id)
            .ok_or(ComplianceError::AssociatedLicenseTypeNotFound { id })?;

        let Some(position) = part.hosts.iter().position(|h| h == hostname) else {
            return Ok(());
        };

        part.hosts.remove(position);
        agreement.touch();
        self.stores.agreements.update_agreement(agreement).await
    }

    /// Allocate every stored agreement against the current fleet and return
    /// the views matching `filter`
    #[instrument(skip_all)]
    pub async fn search_associated_license_types(
        &self,
        filter: &AgreementSearchFilter,
    ) -> Result<AgreementSearchOutcome> {
        let stored = self.stores.agreements.list_agreements().await?;
        let license_types = self.stores.license_types.list_license_types().await?;
        let mut hosts = self.stores.usages.list_host_usages().await?;

        let mut agreements: Vec<Agreement> = stored
            .iter()
            .flat_map(StoredAgreement::to_allocation_views)
            .collect();

        let mut context = AllocationContext::from_config(&self.config.allocation, license_types);
        if self.config.allocation.validate_host_references {
            let hostnames = self.stores.inventory.list_hostnames().await?;
            context = context.with_known_hosts(hostnames);
        }

        let engine = AllocationEngine::new(context);
        let report = engine.allocate(&mut agreements, &mut hosts)?;
        log_allocation_run("search", agreements.len(), &report);

        let total = agreements.len();
        agreements.retain(|agreement| filter.matches(agreement));
        info!(total, matched = agreements.len(), "Agreement search completed");

        Ok(AgreementSearchOutcome { agreements, report })
    }

    /// Fail with `HostNotFound` for the first host missing from the inventory
    pub async fn check_hosts(&self, hosts: &[String]) -> Result<()> {
        if hosts.is_empty() || !self.config.inventory.reject_unknown_hosts {
            return Ok(());
        }

        let known = self.stores.inventory.list_hostnames().await?;
        if let Some(missing) = hosts.iter().find(|h| !known.contains(h.as_str())) {
            warn!(hostname = %missing, "Host not found in inventory");
            return Err(ComplianceError::host_not_found(missing.clone()));
        }

        Ok(())
    }

    async fn license_type(&self, license_type_id: &str) -> Result<LicenseType> {
        self.stores
            .license_types
            .find_license_type(license_type_id)
            .await?
            .ok_or_else(|| ComplianceError::LicenseTypeNotFound {
                license_type_id: license_type_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HostUsage, LicenseMetric};
    use crate::store::InMemoryStore;
    use std::sync::Arc;

    fn store() -> Arc<InMemoryStore> {
        Arc::new(
            InMemoryStore::new()
                .with_license_types(vec![LicenseType::new(
                    "PROC",
                    LicenseMetric::ProcessorPerpetual,
                    &["Oracle ENT"],
                )])
                .with_host_usages(vec![HostUsage::new("db01", "Oracle ENT", 4.0)])
                .with_hostnames(["db01", "db02"]),
        )
    }

    fn request(hosts: &[&str]) -> AssociatedLicenseTypeRequest {
        AssociatedLicenseTypeRequest {
            id: None,
            agreement_id: "AGR-1".to_string(),
            csi: "CSI-1".to_string(),
            license_type_id: "PROC".to_string(),
            reference_number: String::new(),
            unlimited: false,
            count: 10.0,
            catch_all: false,
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_second_part_joins_existing_agreement() {
        let store = store();
        let service = AgreementService::new(StoreSet::shared(store.clone()), ComplianceConfig::default());

        let first = service.add_associated_license_type(request(&["db01"])).await.unwrap();
        let second = service.add_associated_license_type(request(&["db02"])).await.unwrap();

        assert_eq!(first, second);
        let agreements = store.agreements();
        assert_eq!(agreements.len(), 1);
        assert_eq!(agreements[0].license_types.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_host_is_rejected() {
        let service = AgreementService::new(StoreSet::shared(store()), ComplianceConfig::default());

        let err = service
            .add_associated_license_type(request(&["ghost"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ComplianceError::HostNotFound { ref hostname } if hostname == "ghost"));
    }

    #[tokio::test]
    async fn test_search_runs_allocation() {
        let service = AgreementService::new(StoreSet::shared(store()), ComplianceConfig::default());
        service.add_associated_license_type(request(&["db01"])).await.unwrap();

        let outcome = service
            .search_associated_license_types(&AgreementSearchFilter::default())
            .await
            .unwrap();

        assert_eq!(outcome.agreements.len(), 1);
        assert_eq!(outcome.agreements[0].available_count, 6.0);
        assert!(outcome.report.is_compliant());
    }
}
