//! The `scan` use case: load a graph document, evaluate the rules, produce a report.

use crate::document::{self, LoadMode};
use anyhow::Context;
use stackguard_domain::{
    EvaluationOptions, RegistryView, Report, ResourceGraph, RuleRegistry, evaluate_with,
};
use stackguard_settings::{Overrides, ResolvedConfig, StackguardConfigV1};
use stackguard_types::{
    ReportEnvelope, SCHEMA_REPORT_V1, ScanData, StackguardReport, ToolMeta, Verdict,
};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, info_span, warn};

/// Failures a caller may want to tell apart from ordinary input errors.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan did not finish within {}ms", .limit.as_millis())]
    Timeout { limit: Duration },
}

/// Input for the scan use case.
#[derive(Clone, Debug)]
pub struct ScanInput<'a> {
    /// Graph document contents (`stackguard.graph.v1` JSON).
    pub graph_json: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Caller overrides.
    pub overrides: Overrides,
    pub mode: LoadMode,
}

/// Output from the scan use case.
#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub report: StackguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the scan use case: parse config, load the graph, evaluate, produce the envelope.
pub fn run_scan(input: ScanInput<'_>) -> anyhow::Result<ScanOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        StackguardConfigV1::default()
    } else {
        stackguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = stackguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let span = info_span!("scan", profile = %resolved.selection.profile);
    let _guard = span.enter();

    let doc = document::parse_graph_json(input.graph_json)?;
    let loaded = document::load_graph(&doc, input.mode).context("load graph")?;
    if !loaded.rejected.is_empty() {
        warn!(
            rejected = loaded.rejected.len(),
            "graph loaded with rejected items"
        );
    }

    let view = RuleRegistry::builtin()
        .filter(&resolved.selection)
        .context("build rule selection")?;
    let options = EvaluationOptions {
        parallel: resolved.parallel,
    };

    let report = match resolved.timeout {
        Some(limit) => evaluate_with_deadline(loaded.graph, view, options, limit)?,
        None => evaluate_with(&loaded.graph, &view, options),
    };

    let verdict = report.verdict(resolved.fail_on);
    let (findings, summary) = report.into_parts();
    let finished_at = OffsetDateTime::now_utc();

    info!(
        ?verdict,
        findings = findings.len(),
        rules_failed = summary.rules_failed,
        "scan finished"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "stackguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict,
        findings,
        data: ScanData {
            profile: summary.profile,
            resources_scanned: summary.resources_scanned,
            relationships_scanned: summary.relationships_scanned,
            rules_evaluated: summary.rules_evaluated,
            rules_failed: summary.rules_failed,
            counts: summary.counts,
            rejected: loaded.rejected,
        },
    };

    Ok(ScanOutput {
        report,
        resolved_config: resolved,
    })
}

/// Evaluate on a worker thread and give up once `limit` has passed.
///
/// The engine has no cancellation points; on timeout the worker is detached
/// and its result dropped when it eventually finishes.
fn evaluate_with_deadline(
    graph: ResourceGraph,
    view: RegistryView,
    options: EvaluationOptions,
    limit: Duration,
) -> anyhow::Result<Report> {
    let (tx, rx) = mpsc::sync_channel(1);
    thread::Builder::new()
        .name("stackguard-scan".to_string())
        .spawn(move || {
            let report = evaluate_with(&graph, &view, options);
            let _ = tx.send(report);
        })
        .context("spawn scan worker")?;

    match rx.recv_timeout(limit) {
        Ok(report) => Ok(report),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(limit_ms = limit.as_millis() as u64, "scan timed out");
            Err(ScanError::Timeout { limit }.into())
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            anyhow::bail!("scan worker stopped without producing a report")
        }
    }
}

/// Map verdict to exit code: 0 = clean, 2 = violations, 3 = partial analysis.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Clean => 0,
        Verdict::Violations => 2,
        Verdict::Partial => 3,
    }
}
