use serde::{Deserialize, Serialize};
use stackguard_types::{Category, Finding, Severity, SeverityCounts, Verdict};

/// Counters describing one evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub profile: String,
    pub resources_scanned: u32,
    pub relationships_scanned: u32,
    pub rules_evaluated: u32,
    pub rules_failed: u32,
    pub counts: SeverityCounts,
}

/// Result of one evaluation: sorted, deduplicated findings plus a summary.
///
/// Findings are immutable once the report is built; consumers get read-only views.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    findings: Vec<Finding>,
    summary: ScanSummary,
}

impl Report {
    pub(crate) fn new(findings: Vec<Finding>, summary: ScanSummary) -> Self {
        Self { findings, summary }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> + '_ {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Finding> + '_ {
        self.findings.iter().filter(move |f| f.category == category)
    }

    pub fn by_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.rule_id == rule_id)
    }

    /// No findings of any kind, engine findings included.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// No findings at or above `threshold`.
    pub fn is_clean_at(&self, threshold: Severity) -> bool {
        self.findings.iter().all(|f| f.severity < threshold)
    }

    /// At least one rule could not be evaluated.
    pub fn is_degraded(&self) -> bool {
        self.findings.iter().any(|f| f.category == Category::Engine)
    }

    /// `Partial` whenever degraded, so an incomplete analysis never reads as clean.
    pub fn verdict(&self, threshold: Severity) -> Verdict {
        if self.is_degraded() {
            Verdict::Partial
        } else if self.is_clean_at(threshold) {
            Verdict::Clean
        } else {
            Verdict::Violations
        }
    }

    pub fn into_parts(self) -> (Vec<Finding>, ScanSummary) {
        (self.findings, self.summary)
    }
}
