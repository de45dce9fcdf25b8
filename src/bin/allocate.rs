//! # License Allocation CLI
//!
//! Runs the allocation engine over a JSON snapshot of agreements, the
//! license-type catalog and host consumption, then prints the allocated
//! agreements, the remaining host shortfalls and the diagnostics.

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use compliance_core::allocation::{AllocationContext, AllocationEngine, AllocationReport};
use compliance_core::config::{ComplianceConfig, ConfigManager};
use compliance_core::logging::{init_structured_logging_with, log_allocation_run};
use compliance_core::models::{Agreement, AssociatedLicenseTypeRequest, HostUsage, LicenseType};
use compliance_core::validation::validate_add_request;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Parser)]
#[command(name = "allocate")]
#[command(about = "Allocate license agreements to the hosts consuming them")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// JSON snapshot with agreements, license_types, host_usages and optional known_hosts
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Configuration directory path (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log the intermediate state of every allocation pass
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    agreements: Vec<AssociatedLicenseTypeRequest>,
    license_types: Vec<LicenseType>,
    host_usages: Vec<HostUsage>,
    #[serde(default)]
    known_hosts: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct AllocationOutput<'a> {
    agreements: &'a [Agreement],
    host_usages: &'a [HostUsage],
    report: &'a AllocationReport,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Allocation failed: {:#}", e);
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    init_structured_logging_with(&config.logging);

    let raw = fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing snapshot {}", cli.snapshot.display()))?;

    let mut agreements = allocation_views(&snapshot.agreements)?;
    let mut hosts = snapshot.host_usages;

    let mut context = AllocationContext::from_config(&config.allocation, snapshot.license_types)
        .with_debug(cli.debug || config.allocation.debug_assignment_algorithm);
    if let Some(known_hosts) = snapshot.known_hosts {
        if config.allocation.validate_host_references {
            context = context.with_known_hosts(known_hosts);
        }
    }

    let report = AllocationEngine::new(context).allocate(&mut agreements, &mut hosts)?;
    log_allocation_run("cli", agreements.len(), &report);

    match cli.format {
        OutputFormat::Json => {
            let output = AllocationOutput {
                agreements: &agreements,
                host_usages: &hosts,
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => print_table(&agreements, &hosts, &report),
    }

    Ok(())
}

/// Validate snapshot agreements and build their allocation views
fn allocation_views(requests: &[AssociatedLicenseTypeRequest]) -> Result<Vec<Agreement>> {
    requests
        .iter()
        .map(|request| {
            validate_add_request(request)
                .with_context(|| format!("invalid agreement {}", request.agreement_id))?;
            Ok(request.to_allocation_view())
        })
        .collect()
}

fn load_config(cli: &Cli) -> Result<ComplianceConfig> {
    let manager = match &cli.config_dir {
        Some(dir) => ConfigManager::load_from_directory(Some(dir.clone()))
            .with_context(|| format!("loading configuration from {}", dir.display()))?,
        None => ConfigManager::load_or_default().context("loading configuration")?,
    };

    Ok(manager.config().clone())
}

fn print_table(agreements: &[Agreement], hosts: &[HostUsage], report: &AllocationReport) {
    println!(
        "{:<20} {:<12} {:<28} {:>10} {:>12} {:>10}",
        "AGREEMENT", "LICENSE", "METRIC", "COUNT", "AVAILABLE", "CATCH-ALL"
    );
    for agreement in agreements {
        let count = if agreement.unlimited {
            "unlimited".to_string()
        } else {
            agreement.count.to_string()
        };
        println!(
            "{:<20} {:<12} {:<28} {:>10} {:>12} {:>10}",
            agreement.agreement_id,
            agreement.license_type_id,
            agreement
                .metric
                .as_ref()
                .map(|m| m.as_str())
                .unwrap_or("-"),
            count,
            agreement.available_count,
            if agreement.catch_all { "yes" } else { "no" }
        );
    }

    let uncovered: Vec<&HostUsage> = hosts.iter().filter(|h| h.is_uncovered()).collect();
    if !uncovered.is_empty() {
        println!();
        println!("{:<24} {:<28} {:>10} {:>10}", "HOST", "LICENSE NAME", "CONSUMED", "UNCOVERED");
        for host in uncovered {
            println!(
                "{:<24} {:<28} {:>10} {:>10}",
                host.name, host.license_name, host.original_count, host.license_count
            );
        }
    }

    if !report.diagnostics.is_empty() {
        println!();
        println!("Diagnostics:");
        for diagnostic in &report.diagnostics {
            println!(
                "  [{}] {}: {}",
                diagnostic.kind, diagnostic.subject, diagnostic.context
            );
        }
    }

    println!();
    println!(
        "Resolved hosts: {}  Unresolved hosts: {}  Compliant: {}",
        report.resolved_hosts,
        report.unresolved_hosts,
        if report.is_compliant() { "yes" } else { "no" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "agreements": [
            {"agreement_id": "AGR-1", "csi": "CSI-1", "license_type_id": "PROC",
             "reference_number": "", "unlimited": false, "count": 3.0,
             "catch_all": false, "hosts": ["db01"]}
        ],
        "license_types": [
            {"id": "PROC", "item_description": "Oracle Database Enterprise Edition",
             "metric": "Processor Perpetual", "aliases": ["Oracle ENT"]}
        ],
        "host_usages": [
            {"name": "db01", "license_name": "Oracle ENT", "original_count": 4.0}
        ]
    }"#;

    #[test]
    fn test_snapshot_without_balances_parses() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();

        assert_eq!(snapshot.host_usages[0].license_count, 4.0);
        assert_eq!(allocation_views(&snapshot.agreements).unwrap().len(), 1);
    }

    #[test]
    fn test_negative_agreement_count_rejected() {
        let mut snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
        snapshot.agreements[0].count = -5.0;

        let err = allocation_views(&snapshot.agreements).unwrap_err();
        assert!(format!("{err:#}").contains("AGR-1"));
    }
}
