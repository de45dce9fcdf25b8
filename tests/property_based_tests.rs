mod common;

use std::collections::HashMap;

use common::strategies::*;
use common::*;
use compliance_core::allocation::finalizer::finalize_coverage;
use compliance_core::allocation::{AllocationContext, AllocationEngine, Diagnostics, HostUsageIndex};
use compliance_core::constants::units::NAMED_USERS_PER_PROCESSOR;
use proptest::prelude::*;

proptest! {
    /// Property: allocation never over-covers nor over-credits a host usage
    #[test]
    fn host_balances_stay_within_consumption(
        mut agreements in agreements_strategy(),
        mut hosts in host_usages_strategy(),
    ) {
        let engine = AllocationEngine::new(AllocationContext::new(catalog()));
        engine.allocate(&mut agreements, &mut hosts).unwrap();

        for host in &hosts {
            prop_assert!(host.license_count >= 0.0, "negative balance: {:?}", host);
            prop_assert!(host.license_count <= host.original_count, "balance grew: {:?}", host);
        }
    }

    /// Property: limited direct agreements never credit more than they own
    #[test]
    fn limited_agreements_never_credit_more_than_purchased(
        mut agreements in agreements_strategy(),
        mut hosts in host_usages_strategy(),
    ) {
        let engine = AllocationEngine::new(AllocationContext::new(catalog()));
        engine.allocate(&mut agreements, &mut hosts).unwrap();

        for agreement in agreements.iter().filter(|a| !a.unlimited && !a.catch_all) {
            let credited: f64 = agreement.hosts.iter().map(|h| h.covered_licenses_count).sum();
            prop_assert!(
                credited <= agreement.count,
                "{} credited {} of {}",
                agreement.agreement_id,
                credited,
                agreement.count
            );
        }
    }

    /// Property: named-user agreements spend whole processor-equivalents
    #[test]
    fn named_user_credits_are_multiples_of_ratio(
        mut agreements in agreements_strategy(),
        mut hosts in host_usages_strategy(),
    ) {
        let engine = AllocationEngine::new(AllocationContext::new(catalog()));
        engine.allocate(&mut agreements, &mut hosts).unwrap();

        for agreement in agreements.iter().filter(|a| a.is_named_user() && !a.unlimited) {
            for associated in &agreement.hosts {
                let processors = associated.covered_licenses_count / NAMED_USERS_PER_PROCESSOR;
                prop_assert_eq!(processors, processors.floor());
            }
        }
    }

    /// Property: finalizing an already finalized snapshot changes nothing
    #[test]
    fn finalizer_is_idempotent(
        mut agreements in agreements_strategy(),
        mut hosts in host_usages_strategy(),
    ) {
        let context = AllocationContext::new(catalog());
        AllocationEngine::new(context.clone())
            .allocate(&mut agreements, &mut hosts)
            .unwrap();
        let finalized = agreements.clone();

        let index = HostUsageIndex::build(&hosts);
        let mut diagnostics = Diagnostics::new();
        finalize_coverage(&context, &mut agreements, &hosts, &index, &mut diagnostics);

        prop_assert_eq!(agreements, finalized);
    }

    /// Property: allocation only ever moves units, never invents them
    #[test]
    fn covered_units_never_exceed_consumption_per_license_name(
        mut agreements in agreements_strategy(),
        mut hosts in host_usages_strategy(),
    ) {
        let engine = AllocationEngine::new(AllocationContext::new(catalog()));
        let report = engine.allocate(&mut agreements, &mut hosts).unwrap();

        let consumed: HashMap<&str, f64> = hosts.iter().fold(HashMap::new(), |mut acc, h| {
            *acc.entry(h.license_name.as_str()).or_default() += h.original_count;
            acc
        });
        for summary in &report.license_compliance {
            prop_assert_eq!(summary.consumed, consumed[summary.license_name.as_str()]);
            prop_assert!(summary.covered <= summary.consumed);
        }
    }

    /// Property: tenth-unit counts cause no drift past the balance bounds
    #[test]
    fn fractional_counts_keep_balances_and_totals_bounded(
        mut agreements in fractional_agreements_strategy(),
        mut hosts in fractional_host_usages_strategy(),
    ) {
        let engine = AllocationEngine::new(AllocationContext::new(catalog()));
        let report = engine.allocate(&mut agreements, &mut hosts).unwrap();

        for host in &hosts {
            prop_assert!(host.license_count >= 0.0, "negative balance: {:?}", host);
            prop_assert!(host.license_count <= host.original_count, "balance grew: {:?}", host);
        }
        for summary in &report.license_compliance {
            prop_assert!(summary.covered >= 0.0);
            prop_assert!(summary.covered <= summary.consumed);
        }
        for agreement in agreements.iter().filter(|a| a.is_named_user() && !a.unlimited) {
            for associated in &agreement.hosts {
                let processors = associated.covered_licenses_count / NAMED_USERS_PER_PROCESSOR;
                prop_assert_eq!(processors, processors.floor());
            }
        }
    }
}
