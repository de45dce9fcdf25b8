//! Input validation for agreement management
//!
//! Rejects malformed associated-license-type requests before any store or
//! inventory lookup happens.

use std::collections::HashSet;

use crate::error::{ComplianceError, Result};
use crate::models::{AssociatedLicenseTypeRequest, HostUsage};

/// Maximum length of identifier-like fields
const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Maximum number of hosts associated with one license part
const MAX_ASSOCIATED_HOSTS: usize = 10_000;

/// Validates a request to add an associated license type
pub fn validate_add_request(request: &AssociatedLicenseTypeRequest) -> Result<()> {
    validate_identifier("agreement_id", &request.agreement_id)?;
    validate_identifier("license_type_id", &request.license_type_id)?;
    validate_optional_field("csi", &request.csi)?;
    validate_optional_field("reference_number", &request.reference_number)?;
    validate_count(request.count)?;
    validate_hosts(&request.hosts)?;

    Ok(())
}

/// Validates a request to update an associated license type
pub fn validate_update_request(request: &AssociatedLicenseTypeRequest) -> Result<()> {
    if request.id.is_none() {
        return Err(ComplianceError::InvalidRequest(
            "Associated license type id is required for update".to_string(),
        ));
    }

    validate_add_request(request)
}

/// Validates a single hostname
pub fn validate_hostname(hostname: &str) -> Result<()> {
    validate_identifier("hostname", hostname)
}

/// Validates host usages fed to an allocation run
///
/// Counts must be finite and the uncovered balance must lie within
/// `0..=original_count`.
pub fn validate_host_usages(hosts: &[HostUsage]) -> Result<()> {
    hosts.iter().try_for_each(validate_host_usage)
}

fn validate_host_usage(host: &HostUsage) -> Result<()> {
    if !host.original_count.is_finite() || host.original_count < 0.0 {
        return Err(ComplianceError::InvalidRequest(format!(
            "{} ({}): consumption must be a non-negative number, got {}",
            host.name, host.license_name, host.original_count
        )));
    }

    if !host.license_count.is_finite()
        || host.license_count < 0.0
        || host.license_count > host.original_count
    {
        return Err(ComplianceError::InvalidRequest(format!(
            "{} ({}): uncovered balance {} outside 0..={}",
            host.name, host.license_name, host.license_count, host.original_count
        )));
    }

    Ok(())
}

fn validate_identifier(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ComplianceError::InvalidRequest(format!(
            "{field} must not be empty"
        )));
    }

    validate_optional_field(field, value)
}

fn validate_optional_field(field: &str, value: &str) -> Result<()> {
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ComplianceError::InvalidRequest(format!(
            "{field} too long: {} chars (max: {MAX_IDENTIFIER_LENGTH})",
            value.len()
        )));
    }

    Ok(())
}

fn validate_count(count: f64) -> Result<()> {
    if !count.is_finite() || count < 0.0 {
        return Err(ComplianceError::InvalidRequest(format!(
            "count must be a non-negative number, got {count}"
        )));
    }

    Ok(())
}

fn validate_hosts(hosts: &[String]) -> Result<()> {
    if hosts.len() > MAX_ASSOCIATED_HOSTS {
        return Err(ComplianceError::InvalidRequest(format!(
            "Too many associated hosts: {} (max: {MAX_ASSOCIATED_HOSTS})",
            hosts.len()
        )));
    }

    let mut seen = HashSet::with_capacity(hosts.len());
    for host in hosts {
        validate_hostname(host)?;
        if !seen.insert(host.as_str()) {
            return Err(ComplianceError::InvalidRequest(format!(
                "Host associated more than once: {host}"
            )));
        }
    }

    Ok(())
}
