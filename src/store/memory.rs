use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{AgreementStore, HostInventory, LicenseTypeStore, UsageStore};
use crate::error::{ComplianceError, Result};
use crate::models::{HostUsage, LicenseType, StoredAgreement};

/// Process-local backend for every store trait
///
/// Agreements keep insertion order so repeated allocation runs see the same
/// input order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    agreements: RwLock<Vec<StoredAgreement>>,
    license_types: RwLock<Vec<LicenseType>>,
    host_usages: RwLock<Vec<HostUsage>>,
    hostnames: RwLock<HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_license_types(self, license_types: Vec<LicenseType>) -> Self {
        *self.license_types.write() = license_types;
        self
    }

    pub fn with_host_usages(self, host_usages: Vec<HostUsage>) -> Self {
        *self.host_usages.write() = host_usages;
        self
    }

    pub fn with_hostnames<I, S>(self, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.hostnames.write() = hostnames.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_agreements(self, agreements: Vec<StoredAgreement>) -> Self {
        *self.agreements.write() = agreements;
        self
    }

    /// Snapshot of the stored agreements
    pub fn agreements(&self) -> Vec<StoredAgreement> {
        self.agreements.read().clone()
    }
}

#[async_trait]
impl AgreementStore for InMemoryStore {
    async fn list_agreements(&self) -> Result<Vec<StoredAgreement>> {
        Ok(self.agreements.read().clone())
    }

    async fn find_agreement(&self, agreement_id: &str) -> Result<Option<StoredAgreement>> {
        Ok(self
            .agreements
            .read()
            .iter()
            .find(|a| a.agreement_id == agreement_id)
            .cloned())
    }

    async fn find_by_associated_license_type(&self, id: Uuid) -> Result<StoredAgreement> {
        self.agreements
            .read()
            .iter()
            .find(|a| a.associated_license_type(id).is_some())
            .cloned()
            .ok_or(ComplianceError::AssociatedLicenseTypeNotFound { id })
    }

    async fn insert_agreement(&self, agreement: StoredAgreement) -> Result<Uuid> {
        let mut agreements = self.agreements.write();
        if agreements.iter().any(|a| a.id == agreement.id) {
            return Err(ComplianceError::store(
                "insert_agreement",
                format!("duplicate agreement id {}", agreement.id),
            ));
        }

        let id = agreement.id;
        debug!(id = %id, agreement_id = %agreement.agreement_id, "Inserted agreement");
        agreements.push(agreement);
        Ok(id)
    }

    async fn update_agreement(&self, agreement: StoredAgreement) -> Result<()> {
        let mut agreements = self.agreements.write();
        let slot = agreements
            .iter_mut()
            .find(|a| a.id == agreement.id)
            .ok_or_else(|| ComplianceError::AgreementNotFound {
                agreement_id: agreement.agreement_id.clone(),
            })?;

        *slot = agreement;
        Ok(())
    }

    async fn remove_agreement(&self, id: Uuid) -> Result<()> {
        let mut agreements = self.agreements.write();
        let before = agreements.len();
        agreements.retain(|a| a.id != id);

        if agreements.len() == before {
            return Err(ComplianceError::AgreementNotFound {
                agreement_id: id.to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl LicenseTypeStore for InMemoryStore {
    async fn list_license_types(&self) -> Result<Vec<LicenseType>> {
        Ok(self.license_types.read().clone())
    }

    async fn find_license_type(&self, id: &str) -> Result<Option<LicenseType>> {
        Ok(self
            .license_types
            .read()
            .iter()
            .find(|lt| lt.id == id)
            .cloned())
    }
}

#[async_trait]
impl UsageStore for InMemoryStore {
    async fn list_host_usages(&self) -> Result<Vec<HostUsage>> {
        Ok(self.host_usages.read().clone())
    }
}

#[async_trait]
impl HostInventory for InMemoryStore {
    async fn list_hostnames(&self) -> Result<HashSet<String>> {
        Ok(self.hostnames.read().clone())
    }
}
