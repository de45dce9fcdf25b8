//! Structured anomaly channel for the allocation engine.
//!
//! Non-fatal conditions are collected here instead of aborting the run, so the
//! arithmetic stays deterministic and testable without capturing logs. Every
//! record is also emitted as a tracing event for operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Host license name matches no license-type alias
    UnresolvedAlias,
    /// Agreement references a license type missing from the catalog
    UnknownLicenseType,
    /// Agreement metric has no coverage rule
    UnknownMetric,
    /// Agreement still had capacity while its hosts stayed uncovered
    IdleCapacity,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnresolvedAlias => "unresolved_alias",
            Self::UnknownLicenseType => "unknown_license_type",
            Self::UnknownMetric => "unknown_metric",
            Self::IdleCapacity => "idle_capacity",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Agreement id or host name the record is about
    pub subject: String,
    pub context: String,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        context: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            subject: subject.into(),
            context: context.into(),
        };

        match kind {
            DiagnosticKind::IdleCapacity => warn!(
                kind = %diagnostic.kind,
                subject = %diagnostic.subject,
                context = %diagnostic.context,
                "Allocation anomaly"
            ),
            _ => error!(
                kind = %diagnostic.kind,
                subject = %diagnostic.subject,
                context = %diagnostic.context,
                "Allocation anomaly"
            ),
        }

        self.records.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.records.iter().filter(|d| d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}
