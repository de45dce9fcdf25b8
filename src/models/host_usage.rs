use serde::{Deserialize, Serialize};

/// Consumption of one license name by one host or cluster
///
/// `license_count` is the balance still uncovered by agreements. It starts
/// equal to `original_count` and only decreases during allocation. Records
/// deserialized without a balance start fully uncovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HostUsageRecord")]
pub struct HostUsage {
    pub name: String,
    pub license_name: String,
    pub original_count: f64,
    pub license_count: f64,
    /// Filled by alias resolution
    pub license_type_id: Option<String>,
}

/// Wire form of a host usage with an optional balance
#[derive(Deserialize)]
struct HostUsageRecord {
    name: String,
    license_name: String,
    original_count: f64,
    #[serde(default)]
    license_count: Option<f64>,
    #[serde(default)]
    license_type_id: Option<String>,
}

impl From<HostUsageRecord> for HostUsage {
    fn from(record: HostUsageRecord) -> Self {
        Self {
            license_count: record.license_count.unwrap_or(record.original_count),
            name: record.name,
            license_name: record.license_name,
            original_count: record.original_count,
            license_type_id: record.license_type_id,
        }
    }
}

impl HostUsage {
    pub fn new(name: impl Into<String>, license_name: impl Into<String>, count: f64) -> Self {
        Self {
            name: name.into(),
            license_name: license_name.into(),
            original_count: count,
            license_count: count,
            license_type_id: None,
        }
    }

    /// Units of consumption already covered by agreements
    pub fn covered_count(&self) -> f64 {
        self.original_count - self.license_count
    }

    pub fn is_uncovered(&self) -> bool {
        self.license_count > 0.0
    }
}
