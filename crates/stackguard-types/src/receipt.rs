use crate::ResourceId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use time::OffsetDateTime;

/// Stable schema identifier for stackguard reports.
pub const SCHEMA_REPORT_V1: &str = "stackguard.report.v1";

/// Finding severity, ordered from least to most severe.
///
/// `Info` is reserved for engine findings (a rule that could not be evaluated).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule category. Consumers filter and group findings by category.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Encryption,
    Network,
    Identity,
    Audit,
    Resilience,
    /// Findings produced by the engine itself (rule faults), never by a rule.
    Engine,
}

impl Category {
    /// Categories a rule may belong to.
    pub const RULE_CATEGORIES: [Category; 5] = [
        Category::Encryption,
        Category::Network,
        Category::Identity,
        Category::Audit,
        Category::Resilience,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Encryption => "encryption",
            Category::Network => "network",
            Category::Identity => "identity",
            Category::Audit => "audit",
            Category::Resilience => "resilience",
            Category::Engine => "engine",
        }
    }

    pub fn parse(v: &str) -> Option<Category> {
        match v {
            "encryption" => Some(Category::Encryption),
            "network" => Some(Category::Network),
            "identity" => Some(Category::Identity),
            "audit" => Some(Category::Audit),
            "resilience" => Some(Category::Resilience),
            "engine" => Some(Category::Engine),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub severity: Severity,
    pub rule_id: String,
    pub category: Category,

    /// The primary offending resource.
    pub resource_id: ResourceId,

    /// Other resources that take part in the violation (e.g. the security group
    /// that opens a database to the internet).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<ResourceId>,

    pub message: String,
    pub remediation: String,

    /// Tags of the offending resource, carried for context only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `rule_id + resource_id + related ids`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Rule-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

/// Overall outcome of a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No findings at or above the threshold.
    Clean,
    /// At least one finding at or above the threshold.
    Violations,
    /// One or more rules failed; the analysis is incomplete.
    Partial,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub info: u32,
}

impl SeverityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = SeverityCounts::default();
        for f in findings {
            match f.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low + self.info
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Stackguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ScanData {
    pub profile: String,

    pub resources_scanned: u32,
    pub relationships_scanned: u32,
    pub rules_evaluated: u32,
    pub rules_failed: u32,

    pub counts: SeverityCounts,

    /// Graph document items rejected during construction (lenient loading only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<String>,
}

/// A generic report envelope.
///
/// Keeping this generic allows callers to embed their own summary data while
/// the outer shape stays stable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = ScanData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub data: TData,
}

pub type StackguardReport = ReportEnvelope<ScanData>;
