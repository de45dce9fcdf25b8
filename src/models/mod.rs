pub mod agreement;
pub mod host_usage;
pub mod license_type;

// Re-export core models for easy access
pub use agreement::{
    Agreement, AssociatedHost, AssociatedLicenseType, AssociatedLicenseTypeRequest, NewStoredAgreement,
    StoredAgreement,
};
pub use host_usage::HostUsage;
pub use license_type::{LicenseMetric, LicenseType, MetricFamily};
