#![allow(dead_code)]

use compliance_core::models::{Agreement, HostUsage};
use proptest::prelude::*;

use super::builders::{AgreementBuilder, COMPUTER_TYPE, NAMED_USER_TYPE, PROCESSOR_TYPE};

pub const HOSTNAMES: &[&str] = &["db01", "db02", "db03", "db04", "db05", "db06"];
pub const LICENSE_NAMES: &[&str] = &["Oracle ENT", "Oracle ENT Cluster", "Oracle EE", "Oracle STD", "MySQL"];

/// Whole-unit license counts, as consumption is reported
pub fn count_strategy() -> impl Strategy<Value = f64> {
    (0u32..40).prop_map(f64::from)
}

/// Counts in tenths, as core factors produce for processor licenses
pub fn fractional_count_strategy() -> impl Strategy<Value = f64> {
    (0u32..400).prop_map(|tenths| f64::from(tenths) / 10.0)
}

pub fn hostname_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(HOSTNAMES)
}

pub fn license_type_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![PROCESSOR_TYPE, NAMED_USER_TYPE, COMPUTER_TYPE, "UNKNOWN"])
}

/// Host usages with unique (host, license name) pairs
pub fn host_usages_strategy() -> impl Strategy<Value = Vec<HostUsage>> {
    host_usages_with(count_strategy())
}

pub fn fractional_host_usages_strategy() -> impl Strategy<Value = Vec<HostUsage>> {
    host_usages_with(fractional_count_strategy())
}

fn host_usages_with(
    counts: impl Strategy<Value = f64>,
) -> impl Strategy<Value = Vec<HostUsage>> {
    prop::collection::btree_map(
        (hostname_strategy(), prop::sample::select(LICENSE_NAMES)),
        counts,
        0..20,
    )
    .prop_map(|usages| {
        usages
            .into_iter()
            .map(|((name, license_name), count)| HostUsage::new(name, license_name, count))
            .collect()
    })
}

pub fn agreement_strategy() -> impl Strategy<Value = Agreement> {
    agreement_with((0u32..200).prop_map(f64::from))
}

pub fn fractional_agreement_strategy() -> impl Strategy<Value = Agreement> {
    agreement_with((0u32..2000).prop_map(|tenths| f64::from(tenths) / 10.0))
}

fn agreement_with(counts: impl Strategy<Value = f64>) -> impl Strategy<Value = Agreement> {
    (
        license_type_strategy(),
        counts,
        any::<bool>(),
        prop::bool::weighted(0.2),
        prop::sample::subsequence(HOSTNAMES, 0..=3),
    )
        .prop_map(|(license_type_id, count, catch_all, unlimited, hosts)| {
            let mut builder = AgreementBuilder::new("AGR", license_type_id).with_count(count);
            if catch_all {
                builder = builder.catch_all();
            }
            if unlimited {
                builder = builder.unlimited();
            }
            for host in hosts {
                builder = builder.with_host(host);
            }
            builder.build()
        })
}

pub fn agreements_strategy() -> impl Strategy<Value = Vec<Agreement>> {
    numbered(agreement_strategy())
}

pub fn fractional_agreements_strategy() -> impl Strategy<Value = Vec<Agreement>> {
    numbered(fractional_agreement_strategy())
}

fn numbered(agreement: impl Strategy<Value = Agreement>) -> impl Strategy<Value = Vec<Agreement>> {
    prop::collection::vec(agreement, 0..8).prop_map(|mut agreements| {
        for (i, agreement) in agreements.iter_mut().enumerate() {
            agreement.agreement_id = format!("AGR-{i}");
        }
        agreements
    })
}
