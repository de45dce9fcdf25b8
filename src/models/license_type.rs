use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::metrics;

/// Licensing unit convention of a license type
///
/// Catalog values outside the known set are preserved in `Other` so they can
/// be reported; the engine applies no coverage for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LicenseMetric {
    ProcessorPerpetual,
    ComputerPerpetual,
    NamedUserPlusPerpetual,
    Other(String),
}

/// Coverage family a metric belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricFamily {
    /// One unit covers one processor-equivalent license
    ProcessorEquivalent,
    /// Counted in named users, 25 per processor-equivalent license
    NamedUser,
}

impl LicenseMetric {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ProcessorPerpetual => metrics::PROCESSOR_PERPETUAL,
            Self::ComputerPerpetual => metrics::COMPUTER_PERPETUAL,
            Self::NamedUserPlusPerpetual => metrics::NAMED_USER_PLUS_PERPETUAL,
            Self::Other(name) => name,
        }
    }

    pub fn family(&self) -> Option<MetricFamily> {
        match self {
            Self::ProcessorPerpetual | Self::ComputerPerpetual => {
                Some(MetricFamily::ProcessorEquivalent)
            }
            Self::NamedUserPlusPerpetual => Some(MetricFamily::NamedUser),
            Self::Other(_) => None,
        }
    }

    pub fn is_named_user(&self) -> bool {
        matches!(self, Self::NamedUserPlusPerpetual)
    }
}

impl From<String> for LicenseMetric {
    fn from(value: String) -> Self {
        match value.as_str() {
            metrics::PROCESSOR_PERPETUAL => Self::ProcessorPerpetual,
            metrics::COMPUTER_PERPETUAL => Self::ComputerPerpetual,
            metrics::NAMED_USER_PLUS_PERPETUAL => Self::NamedUserPlusPerpetual,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for LicenseMetric {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<LicenseMetric> for String {
    fn from(metric: LicenseMetric) -> Self {
        metric.as_str().to_string()
    }
}

impl fmt::Display for LicenseMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// License type reference data from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseType {
    pub id: String,
    #[serde(default)]
    pub item_description: String,
    pub metric: LicenseMetric,
    /// Product names that consume this license type, in catalog order
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl LicenseType {
    pub fn new(id: impl Into<String>, metric: LicenseMetric, aliases: &[&str]) -> Self {
        Self {
            id: id.into(),
            item_description: String::new(),
            metric,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.item_description = description.into();
        self
    }

    pub fn has_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias == name)
    }
}
