//! Stable DTOs and IDs used across the stackguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted findings and report envelope
//! - stable string IDs for rules and categories
//! - the resource identifier newtype shared by the graph and findings
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;
pub mod resource_id;

pub use explain::{ExamplePair, Explanation, all_rule_ids, lookup_explanation};
pub use receipt::{
    Category, Finding, ReportEnvelope, SCHEMA_REPORT_V1, ScanData, Severity, SeverityCounts,
    StackguardReport, ToolMeta, Verdict,
};
pub use resource_id::ResourceId;
