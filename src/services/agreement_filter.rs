use serde::{Deserialize, Serialize};

use crate::models::Agreement;

/// Criteria for searching allocated agreement views
///
/// Text fields match case-insensitive substrings and an empty string matches
/// everything. `None` leaves a criterion unconstrained. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgreementSearchFilter {
    pub agreement_id: String,
    pub license_type_id: String,
    pub item_description: String,
    pub csi: String,
    /// Exact metric name, compared case-insensitively
    pub metric: String,
    pub reference_number: String,
    pub unlimited: Option<bool>,
    pub catch_all: Option<bool>,
    pub licenses_count_lte: Option<f64>,
    pub licenses_count_gte: Option<f64>,
    pub users_count_lte: Option<f64>,
    pub users_count_gte: Option<f64>,
    pub available_count_lte: Option<f64>,
    pub available_count_gte: Option<f64>,
}

impl AgreementSearchFilter {
    pub fn matches(&self, agreement: &Agreement) -> bool {
        let metric = agreement
            .metric
            .as_ref()
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();

        contains_ignore_case(&agreement.agreement_id, &self.agreement_id)
            && contains_ignore_case(&agreement.license_type_id, &self.license_type_id)
            && contains_ignore_case(&agreement.item_description, &self.item_description)
            && contains_ignore_case(&agreement.csi, &self.csi)
            && (self.metric.is_empty() || metric == self.metric.to_lowercase())
            && contains_ignore_case(&agreement.reference_number, &self.reference_number)
            && self.unlimited.map_or(true, |u| agreement.unlimited == u)
            && self.catch_all.map_or(true, |c| agreement.catch_all == c)
            && within(
                agreement.licenses_count,
                self.licenses_count_gte,
                self.licenses_count_lte,
            )
            && within(agreement.users_count, self.users_count_gte, self.users_count_lte)
            && within(
                agreement.available_count,
                self.available_count_gte,
                self.available_count_lte,
            )
    }
}

fn contains_ignore_case(value: &str, needle: &str) -> bool {
    value.to_lowercase().contains(&needle.to_lowercase())
}

fn within(value: f64, lower: Option<f64>, upper: Option<f64>) -> bool {
    lower.map_or(true, |l| value >= l) && upper.map_or(true, |u| value <= u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LicenseMetric;

    fn agreement() -> Agreement {
        let mut agreement = Agreement::new("AGR-Alpha", "A90611", 10.0);
        agreement.csi = "CSI-42".to_string();
        agreement.item_description = "Oracle Database Enterprise Edition".to_string();
        agreement.metric = Some(LicenseMetric::ProcessorPerpetual);
        agreement.licenses_count = 10.0;
        agreement.available_count = 3.0;
        agreement
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(AgreementSearchFilter::default().matches(&agreement()));
    }

    #[test]
    fn test_text_fields_are_case_insensitive_substrings() {
        let filter = AgreementSearchFilter {
            agreement_id: "alpha".to_string(),
            item_description: "ENTERPRISE".to_string(),
            ..Default::default()
        };
        assert!(filter.matches(&agreement()));

        let filter = AgreementSearchFilter {
            csi: "43".to_string(),
            ..Default::default()
        };
        assert!(!filter.matches(&agreement()));
    }

    #[test]
    fn test_metric_is_exact() {
        let filter = AgreementSearchFilter {
            metric: "processor perpetual".to_string(),
            ..Default::default()
        };
        assert!(filter.matches(&agreement()));

        let filter = AgreementSearchFilter {
            metric: "Processor".to_string(),
            ..Default::default()
        };
        assert!(!filter.matches(&agreement()));
    }

    #[test]
    fn test_flags_and_bounds() {
        let filter = AgreementSearchFilter {
            unlimited: Some(false),
            catch_all: Some(false),
            available_count_gte: Some(3.0),
            available_count_lte: Some(3.0),
            licenses_count_gte: Some(10.0),
            ..Default::default()
        };
        assert!(filter.matches(&agreement()));

        let filter = AgreementSearchFilter {
            unlimited: Some(true),
            ..Default::default()
        };
        assert!(!filter.matches(&agreement()));

        let filter = AgreementSearchFilter {
            users_count_gte: Some(1.0),
            ..Default::default()
        };
        assert!(!filter.matches(&agreement()));
    }
}
