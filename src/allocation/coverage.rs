//! Metric-specific coverage of one host usage by one agreement.

use crate::constants::units::NAMED_USERS_PER_PROCESSOR;
use crate::models::{Agreement, HostUsage, MetricFamily};

/// Units moved by a single coverage step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    /// Subtracted from the host usage's uncovered `license_count`
    pub host_units: f64,
    /// Credited to the associated host, in the agreement's native unit
    pub credited: f64,
}

/// Cover as much of `host` as `agreement` allows, mutating both.
///
/// Processor-equivalent metrics move one unit per license. Named-user
/// metrics spend 25 users per processor-equivalent license, rounding down to
/// whole licenses; the host balance drops by licenses while the agreement
/// and the credit move in users. Unlimited agreements cover the whole
/// balance and drop their availability to zero.
///
/// Returns `None` when the agreement has no known metric; nothing is
/// mutated in that case.
pub fn cover_host(agreement: &mut Agreement, host: &mut HostUsage) -> Option<Coverage> {
    let family = agreement.metric.as_ref().and_then(|m| m.family())?;

    let coverage = match family {
        MetricFamily::ProcessorEquivalent => {
            let covered = if agreement.unlimited {
                agreement.available_count = 0.0;
                host.license_count
            } else {
                let covered = agreement.available_count.min(host.license_count);
                agreement.available_count -= covered;
                covered
            };

            Coverage {
                host_units: covered,
                credited: covered,
            }
        }
        MetricFamily::NamedUser => {
            let covered = if agreement.unlimited {
                agreement.available_count = 0.0;
                host.license_count
            } else {
                let covered = (agreement
                    .available_count
                    .min(host.license_count * NAMED_USERS_PER_PROCESSOR)
                    / NAMED_USERS_PER_PROCESSOR)
                    .floor()
                    .min(host.license_count);
                agreement.available_count -= covered * NAMED_USERS_PER_PROCESSOR;
                covered
            };

            Coverage {
                host_units: covered,
                credited: covered * NAMED_USERS_PER_PROCESSOR,
            }
        }
    };

    host.license_count -= coverage.host_units;

    Some(coverage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LicenseMetric;

    fn agreement(metric: LicenseMetric, count: f64) -> Agreement {
        let mut agreement = Agreement::new("AGR", "LT", count);
        agreement.metric = Some(metric);
        agreement
    }

    #[test]
    fn test_processor_coverage_is_capped_by_availability() {
        let mut agr = agreement(LicenseMetric::ProcessorPerpetual, 10.0);
        let mut host = HostUsage::new("db01", "Oracle ENT", 15.0);

        let coverage = cover_host(&mut agr, &mut host).unwrap();

        assert_eq!(coverage.host_units, 10.0);
        assert_eq!(coverage.credited, 10.0);
        assert_eq!(agr.available_count, 0.0);
        assert_eq!(host.license_count, 5.0);
    }

    #[test]
    fn test_computer_metric_uses_processor_rule() {
        let mut agr = agreement(LicenseMetric::ComputerPerpetual, 4.0);
        let mut host = HostUsage::new("db01", "Oracle STD", 1.0);

        cover_host(&mut agr, &mut host).unwrap();

        assert_eq!(agr.available_count, 3.0);
        assert_eq!(host.license_count, 0.0);
    }

    #[test]
    fn test_named_user_coverage_converts_units() {
        let mut agr = agreement(LicenseMetric::NamedUserPlusPerpetual, 100.0);
        let mut host = HostUsage::new("db01", "Oracle ENT", 3.0);

        let coverage = cover_host(&mut agr, &mut host).unwrap();

        assert_eq!(coverage.host_units, 3.0);
        assert_eq!(coverage.credited, 75.0);
        assert_eq!(agr.available_count, 25.0);
        assert_eq!(host.license_count, 0.0);
    }

    #[test]
    fn test_named_user_coverage_rounds_down_to_whole_licenses() {
        let mut agr = agreement(LicenseMetric::NamedUserPlusPerpetual, 60.0);
        let mut host = HostUsage::new("db01", "Oracle ENT", 4.0);

        let coverage = cover_host(&mut agr, &mut host).unwrap();

        assert_eq!(coverage.host_units, 2.0);
        assert_eq!(agr.available_count, 10.0);
        assert_eq!(host.license_count, 2.0);

        let again = cover_host(&mut agr, &mut host).unwrap();
        assert_eq!(again.host_units, 0.0);
        assert_eq!(agr.available_count, 10.0);
    }

    #[test]
    fn test_unlimited_covers_everything() {
        let mut agr = agreement(LicenseMetric::NamedUserPlusPerpetual, 0.0).unlimited();
        agr.available_count = 5.0;
        let mut host = HostUsage::new("db01", "Oracle ENT", 7.0);

        let coverage = cover_host(&mut agr, &mut host).unwrap();

        assert_eq!(coverage.host_units, 7.0);
        assert_eq!(coverage.credited, 175.0);
        assert_eq!(agr.available_count, 0.0);
        assert_eq!(host.license_count, 0.0);
    }

    #[test]
    fn test_unknown_metric_leaves_records_untouched() {
        let mut agr = agreement(LicenseMetric::from("Application User"), 10.0);
        let mut host = HostUsage::new("db01", "Oracle ENT", 3.0);

        assert!(cover_host(&mut agr, &mut host).is_none());
        assert_eq!(agr.available_count, 10.0);
        assert_eq!(host.license_count, 3.0);

        let mut unset = Agreement::new("AGR", "LT", 10.0);
        assert!(cover_host(&mut unset, &mut host).is_none());
    }
}
