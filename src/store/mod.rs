//! # Stores
//!
//! Async seams to the collaborators that own agreements, the license-type
//! catalog, fleet consumption and the host inventory. The allocation engine
//! never touches them; [`crate::services::AgreementService`] loads snapshots
//! from them and persists agreement changes back.

pub mod memory;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{HostUsage, LicenseType, StoredAgreement};

pub use memory::InMemoryStore;

/// Persistence of stored agreements
#[async_trait]
pub trait AgreementStore: Send + Sync {
    /// All agreements in insertion order
    async fn list_agreements(&self) -> Result<Vec<StoredAgreement>>;

    /// Agreement by its business identifier
    async fn find_agreement(&self, agreement_id: &str) -> Result<Option<StoredAgreement>>;

    /// Agreement owning the associated license type with the given id.
    /// Fails with `AssociatedLicenseTypeNotFound` when no agreement owns it.
    async fn find_by_associated_license_type(&self, id: Uuid) -> Result<StoredAgreement>;

    async fn insert_agreement(&self, agreement: StoredAgreement) -> Result<Uuid>;

    /// Replace the agreement with the same `id`
    async fn update_agreement(&self, agreement: StoredAgreement) -> Result<()>;

    async fn remove_agreement(&self, id: Uuid) -> Result<()>;
}

/// Read access to the license-type catalog
#[async_trait]
pub trait LicenseTypeStore: Send + Sync {
    async fn list_license_types(&self) -> Result<Vec<LicenseType>>;

    async fn find_license_type(&self, id: &str) -> Result<Option<LicenseType>>;
}

/// Per-host license consumption
#[async_trait]
pub trait UsageStore: Send + Sync {
    async fn list_host_usages(&self) -> Result<Vec<HostUsage>>;
}

/// Hosts that may be associated with agreements
#[async_trait]
pub trait HostInventory: Send + Sync {
    async fn list_hostnames(&self) -> Result<HashSet<String>>;
}

/// The collaborators an [`crate::services::AgreementService`] works against
#[derive(Clone)]
pub struct StoreSet {
    pub agreements: Arc<dyn AgreementStore>,
    pub license_types: Arc<dyn LicenseTypeStore>,
    pub usages: Arc<dyn UsageStore>,
    pub inventory: Arc<dyn HostInventory>,
}

impl StoreSet {
    /// Use one backend for every collaborator
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: AgreementStore + LicenseTypeStore + UsageStore + HostInventory + 'static,
    {
        Self {
            agreements: store.clone(),
            license_types: store.clone(),
            usages: store.clone(),
            inventory: store,
        }
    }
}

impl std::fmt::Debug for StoreSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSet").finish_non_exhaustive()
    }
}
