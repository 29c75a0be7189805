//! Use case orchestration for stackguard.
//!
//! This crate provides the application layer: use cases that coordinate graph
//! loading, settings, and the domain engine. It is intentionally thin and
//! delegates heavy lifting to the appropriate layers.
//!
//! Callers handle I/O; every use case takes and returns in-memory values.

#![forbid(unsafe_code)]

mod document;
mod explain;
mod report;
mod scan;

pub use document::{
    GraphDocument, LoadMode, LoadedGraph, RelationshipDoc, ResourceDoc, SCHEMA_GRAPH_V1,
    load_graph, parse_graph_json,
};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use report::{parse_report_json, serialize_report};
pub use scan::{ScanError, ScanInput, ScanOutput, run_scan, verdict_exit_code};
