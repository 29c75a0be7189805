use crate::fingerprint::fingerprint_for_finding;
use crate::graph::ResourceGraph;
use crate::registry::RegistryView;
use crate::report::{Report, ScanSummary};
use crate::rule::Rule;
use rayon::prelude::*;
use serde_json::json;
use stackguard_types::{Category, Finding, ResourceId, Severity, SeverityCounts, ids};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

/// Knobs that change how rules are scheduled, never what they report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Run scheduled rules on the rayon pool. Output is identical to sequential mode.
    pub parallel: bool,
}

impl EvaluationOptions {
    pub fn parallel() -> Self {
        Self { parallel: true }
    }
}

pub fn evaluate(graph: &ResourceGraph, view: &RegistryView) -> Report {
    evaluate_with(graph, view, EvaluationOptions::default())
}

pub fn evaluate_with(
    graph: &ResourceGraph,
    view: &RegistryView,
    options: EvaluationOptions,
) -> Report {
    let span = info_span!(
        "evaluate",
        profile = view.profile(),
        resources = graph.len(),
        parallel = options.parallel
    );
    let _guard = span.enter();

    let scheduled = plan(graph, view);
    let outcomes: Vec<RuleOutcome> = if options.parallel {
        scheduled
            .par_iter()
            .map(|rule| run_rule(rule.as_ref(), graph))
            .collect()
    } else {
        scheduled
            .iter()
            .map(|rule| run_rule(rule.as_ref(), graph))
            .collect()
    };

    let mut findings = Vec::new();
    let mut rules_failed = 0u32;
    for (rule, outcome) in scheduled.iter().zip(outcomes) {
        match outcome {
            RuleOutcome::Findings(emitted) => {
                debug!(rule = rule.id(), findings = emitted.len(), "rule evaluated");
                findings.extend(
                    emitted
                        .into_iter()
                        .filter_map(|f| apply_policy(view, rule.id(), f)),
                );
            }
            RuleOutcome::Failed(error) => {
                warn!(
                    rule = rule.id(),
                    %error,
                    "rule failed; continuing with remaining rules"
                );
                rules_failed += 1;
                findings.push(rule_failure(rule.id(), &error));
            }
        }
    }

    // Deterministic ordering before dedup, so the kept duplicate never
    // depends on scheduling.
    findings.sort_by(compare_findings);
    let mut seen = BTreeSet::new();
    findings.retain(|f| seen.insert((f.rule_id.clone(), f.resource_id.clone())));

    let summary = ScanSummary {
        profile: view.profile().to_string(),
        resources_scanned: graph.len() as u32,
        relationships_scanned: graph.relationships().len() as u32,
        rules_evaluated: scheduled.len() as u32,
        rules_failed,
        counts: SeverityCounts::from_findings(&findings),
    };

    info!(
        rules = summary.rules_evaluated,
        failed = summary.rules_failed,
        findings = findings.len(),
        "evaluation finished"
    );

    Report::new(findings, summary)
}

/// Rules scheduled for `graph`, in execution order.
///
/// Kinds are visited in the fixed kind order (only those present in the
/// graph); within a kind, rules keep registry order. A rule that applies to
/// several kinds is scheduled once, at its first kind.
pub fn plan<'v>(graph: &ResourceGraph, view: &'v RegistryView) -> Vec<&'v Arc<dyn Rule>> {
    let mut scheduled: Vec<&Arc<dyn Rule>> = Vec::new();
    let mut seen = BTreeSet::new();
    for kind in graph.kinds_present() {
        for rule in view.rules_for(kind) {
            if seen.insert(rule.id()) {
                scheduled.push(rule);
            }
        }
    }
    scheduled
}

enum RuleOutcome {
    Findings(Vec<Finding>),
    Failed(String),
}

fn run_rule(rule: &dyn Rule, graph: &ResourceGraph) -> RuleOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(graph))) {
        Ok(Ok(findings)) => RuleOutcome::Findings(findings),
        Ok(Err(err)) => RuleOutcome::Failed(err.message().to_string()),
        Err(payload) => RuleOutcome::Failed(format!("panicked: {}", panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

/// Severity override, allowlist suppression and fingerprinting.
fn apply_policy(view: &RegistryView, rule_id: &str, mut finding: Finding) -> Option<Finding> {
    if view.is_allowed(rule_id, &finding.resource_id) {
        return None;
    }
    if let Some(severity) = view.severity_override(rule_id) {
        finding.severity = severity;
    }
    if finding.fingerprint.is_none() {
        finding.fingerprint = Some(fingerprint_for_finding(
            &finding.rule_id,
            &finding.resource_id,
            &finding.related,
        ));
    }
    Some(finding)
}

fn rule_failure(rule_id: &str, error: &str) -> Finding {
    let resource_id = ResourceId::new(rule_id);
    let fingerprint = fingerprint_for_finding(ids::RULE_ENGINE_RULE_FAILURE, &resource_id, &[]);
    Finding {
        severity: Severity::Info,
        rule_id: ids::RULE_ENGINE_RULE_FAILURE.to_string(),
        category: Category::Engine,
        resource_id,
        related: Vec::new(),
        message: format!("rule '{rule_id}' could not be evaluated: {error}"),
        remediation: "Results for this rule are missing; fix the rule or exclude it and re-run."
            .to_string(),
        tags: BTreeMap::new(),
        fingerprint: Some(fingerprint),
        data: json!({ "failed_rule": rule_id, "error": error }),
    }
}

fn compare_findings(a: &Finding, b: &Finding) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) severity (critical -> info)
    // 2) rule_id
    // 3) resource_id
    // 4) related ids
    // 5) message
    b.severity
        .cmp(&a.severity)
        .then_with(|| a.rule_id.cmp(&b.rule_id))
        .then_with(|| a.resource_id.cmp(&b.resource_id))
        .then_with(|| a.related.cmp(&b.related))
        .then_with(|| a.message.cmp(&b.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::model::{Resource, ResourceKind};
    use crate::policy::RuleSelection;
    use crate::registry::RuleRegistry;
    use crate::rule::{FnRule, RuleMeta};
    use crate::test_support::{finding_for, hardened_stack, healthcare_stack};

    struct Failing(RuleMeta);

    impl Rule for Failing {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }

        fn evaluate(&self, _graph: &ResourceGraph) -> Result<Vec<Finding>, RuleError> {
            Err(RuleError::new("property bag corrupted"))
        }
    }

    struct Panicking(RuleMeta);

    impl Rule for Panicking {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }

        fn evaluate(&self, _graph: &ResourceGraph) -> Result<Vec<Finding>, RuleError> {
            panic!("index out of bounds")
        }
    }

    fn meta(id: &'static str, applies_to: &'static [ResourceKind]) -> RuleMeta {
        RuleMeta {
            id,
            category: Category::Audit,
            severity: Severity::Low,
            applies_to,
            remediation: "fix it",
        }
    }

    fn flag_every_database(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
        for db in graph.resources_of_kind(ResourceKind::Database) {
            out.push(finding_for(meta, db, "flagged"));
            // Emitted twice on purpose; the engine keeps one.
            out.push(finding_for(meta, db, "flagged again"));
        }
    }

    fn single_db_graph() -> ResourceGraph {
        let mut b = ResourceGraph::builder();
        b.add_resource(Resource::new("db", ResourceKind::Database))
            .unwrap();
        b.build()
    }

    #[test]
    fn failing_and_panicking_rules_become_engine_findings() {
        let mut reg = RuleRegistry::new();
        reg.register(Failing(meta("test.fails", &[ResourceKind::Database])))
            .unwrap();
        reg.register(Panicking(meta("test.panics", &[ResourceKind::Database])))
            .unwrap();
        reg.register(FnRule::new(
            meta("test.flags", &[ResourceKind::Database]),
            flag_every_database,
        ))
        .unwrap();

        let report = evaluate(&single_db_graph(), &reg.view());

        let engine: Vec<_> = report.by_category(Category::Engine).collect();
        assert_eq!(engine.len(), 2);
        assert!(engine.iter().all(|f| f.severity == Severity::Info));
        assert!(engine.iter().all(|f| f.rule_id == ids::RULE_ENGINE_RULE_FAILURE));
        let failed: BTreeSet<_> = engine.iter().map(|f| f.resource_id.as_str()).collect();
        assert_eq!(failed, BTreeSet::from(["test.fails", "test.panics"]));
        assert!(engine.iter().any(|f| f.message.contains("property bag corrupted")));
        assert!(engine.iter().any(|f| f.message.contains("index out of bounds")));

        // The healthy rule still reported.
        assert_eq!(report.by_rule("test.flags").count(), 1);
        assert_eq!(report.summary().rules_failed, 2);
        assert_eq!(report.summary().rules_evaluated, 3);
        assert!(report.is_degraded());
    }

    #[test]
    fn failing_rule_leaves_other_findings_untouched() {
        let graph = healthcare_stack();
        let baseline = evaluate(&graph, &RuleRegistry::builtin().view());

        let mut reg = RuleRegistry::builtin();
        reg.register(Panicking(meta("test.panics", &[ResourceKind::Database])))
            .unwrap();
        let degraded = evaluate(&graph, &reg.view());

        let others: Vec<Finding> = degraded
            .findings()
            .iter()
            .filter(|f| f.category != Category::Engine)
            .cloned()
            .collect();
        assert_eq!(others, baseline.findings());
        assert_eq!(degraded.len(), baseline.len() + 1);
        assert_eq!(degraded.verdict(Severity::Low), stackguard_types::Verdict::Partial);
    }

    #[test]
    fn exposed_database_yields_encryption_exposure_and_ingress_findings() {
        let mut b = ResourceGraph::builder();
        b.add_resource(
            Resource::new("DBSecurityGroup", ResourceKind::SecurityGroup)
                .with("ingress", vec![crate::test_support::any_ipv4(5432)]),
        )
        .unwrap();
        b.add_resource(
            Resource::new("PatientDB", ResourceKind::Database)
                .with("encrypted", false)
                .with("publiclyAccessible", true),
        )
        .unwrap();
        b.add_relationship(
            "DBSecurityGroup",
            "PatientDB",
            crate::model::RelationKind::Secures,
        )
        .unwrap();
        let report = evaluate(&b.build(), &RuleRegistry::builtin().view());

        let on_db: BTreeSet<&str> = report
            .findings()
            .iter()
            .filter(|f| f.resource_id.as_str() == "PatientDB")
            .map(|f| f.rule_id.as_str())
            .collect();
        for expected in [
            ids::RULE_ENCRYPTION_STORAGE_AT_REST,
            ids::RULE_NETWORK_PUBLICLY_ACCESSIBLE,
            ids::RULE_NETWORK_OPEN_INGRESS,
        ] {
            assert!(on_db.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn unauthenticated_endpoint_is_reported_once_on_the_endpoint() {
        let graph = crate::test_support::graph(
            vec![
                Resource::new("PatientAPI/patients/GET", ResourceKind::ApiEndpoint)
                    .with("authorizationType", "none"),
                Resource::new("PatientAPIFunction", ResourceKind::ComputeFunction),
                crate::test_support::phi(Resource::new("PatientDB", ResourceKind::Database)),
            ],
            &[
                (
                    "PatientAPI/patients/GET",
                    "PatientAPIFunction",
                    crate::model::RelationKind::Exposes,
                ),
                (
                    "PatientAPIFunction",
                    "PatientDB",
                    crate::model::RelationKind::Writes,
                ),
            ],
        );
        let report = evaluate(&graph, &RuleRegistry::builtin().view());

        let unauth: Vec<_> = report
            .by_rule(ids::RULE_IDENTITY_UNAUTHENTICATED_ENDPOINT)
            .collect();
        assert_eq!(unauth.len(), 1);
        assert_eq!(unauth[0].resource_id.as_str(), "PatientAPI/patients/GET");
    }

    #[test]
    fn healthcare_stack_covers_every_violation_category() {
        let report = evaluate(&healthcare_stack(), &RuleRegistry::builtin().view());
        for rule_id in [
            ids::RULE_ENCRYPTION_STORAGE_AT_REST,
            ids::RULE_NETWORK_PUBLICLY_ACCESSIBLE,
            ids::RULE_IDENTITY_HARDCODED_SECRET,
            ids::RULE_AUDIT_MISSING_ACCESS_LOG,
            ids::RULE_IDENTITY_WILDCARD_POLICY,
            ids::RULE_IDENTITY_UNAUTHENTICATED_ENDPOINT,
            ids::RULE_NETWORK_NO_PRIVATE_SUBNET,
            ids::RULE_NETWORK_PUBLIC_SUBNET,
        ] {
            assert!(report.by_rule(rule_id).next().is_some(), "no {rule_id} finding");
        }
        assert_eq!(report.verdict(Severity::High), stackguard_types::Verdict::Violations);
    }

    #[test]
    fn duplicate_rule_and_resource_pairs_are_collapsed() {
        let mut reg = RuleRegistry::new();
        reg.register(FnRule::new(
            meta("test.flags", &[ResourceKind::Database]),
            flag_every_database,
        ))
        .unwrap();

        let report = evaluate(&single_db_graph(), &reg.view());
        assert_eq!(report.len(), 1);
        assert_eq!(report.findings()[0].message, "flagged");
    }

    #[test]
    fn rule_spanning_several_kinds_is_scheduled_once() {
        let mut reg = RuleRegistry::new();
        reg.register(FnRule::new(
            meta(
                "test.multi",
                &[ResourceKind::Database, ResourceKind::ObjectStore],
            ),
            flag_every_database,
        ))
        .unwrap();
        reg.register(FnRule::new(
            meta("test.keys", &[ResourceKind::Key]),
            flag_every_database,
        ))
        .unwrap();

        let mut b = ResourceGraph::builder();
        b.add_resource(Resource::new("bucket", ResourceKind::ObjectStore))
            .unwrap();
        b.add_resource(Resource::new("db", ResourceKind::Database))
            .unwrap();
        let graph = b.build();
        let view = reg.view();

        let ids: Vec<_> = plan(&graph, &view).iter().map(|r| r.id()).collect();
        assert_eq!(ids, ["test.multi"]);
    }

    #[test]
    fn findings_are_sorted_by_severity_then_rule_then_resource() {
        let graph = healthcare_stack();
        let report = evaluate(&graph, &RuleRegistry::builtin().view());

        for pair in report.findings().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.severity > b.severity
                    || (a.severity == b.severity
                        && (a.rule_id.as_str(), a.resource_id.as_str())
                            < (b.rule_id.as_str(), b.resource_id.as_str())),
                "{} {} before {} {}",
                a.rule_id,
                a.resource_id,
                b.rule_id,
                b.resource_id
            );
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let graph = healthcare_stack();
        let view = RuleRegistry::builtin().view();
        let seq = evaluate(&graph, &view);
        let par = evaluate_with(&graph, &view, EvaluationOptions::parallel());
        assert_eq!(seq, par);
    }

    #[test]
    fn every_finding_carries_a_fingerprint() {
        let report = evaluate(&healthcare_stack(), &RuleRegistry::builtin().view());
        assert!(report.findings().iter().all(|f| f.fingerprint.is_some()));
    }

    #[test]
    fn severity_override_and_allowlist_are_applied() {
        let graph = healthcare_stack();
        let reg = RuleRegistry::builtin();
        let view = reg
            .filter(
                &RuleSelection::all()
                    .override_severity(ids::RULE_NETWORK_PUBLICLY_ACCESSIBLE, Severity::Medium)
                    .allow(ids::RULE_ENCRYPTION_STORAGE_AT_REST, "PatientData*"),
            )
            .unwrap();
        let report = evaluate(&graph, &view);

        let public: Vec<_> = report
            .by_rule(ids::RULE_NETWORK_PUBLICLY_ACCESSIBLE)
            .collect();
        assert!(!public.is_empty());
        assert!(public.iter().all(|f| f.severity == Severity::Medium));

        let at_rest: Vec<_> = report
            .by_rule(ids::RULE_ENCRYPTION_STORAGE_AT_REST)
            .map(|f| f.resource_id.as_str())
            .collect();
        assert_eq!(at_rest, ["PatientDB"]);
    }

    #[test]
    fn summary_counts_graph_and_findings() {
        let graph = healthcare_stack();
        let report = evaluate(&graph, &RuleRegistry::builtin().view());
        let summary = report.summary();
        assert_eq!(summary.resources_scanned as usize, graph.len());
        assert_eq!(
            summary.relationships_scanned as usize,
            graph.relationships().len()
        );
        assert_eq!(summary.counts.total() as usize, report.len());
        assert_eq!(summary.rules_failed, 0);
    }

    #[test]
    fn empty_graph_schedules_nothing() {
        let report = evaluate(&ResourceGraph::default(), &RuleRegistry::builtin().view());
        assert!(report.is_clean());
        assert_eq!(report.summary().rules_evaluated, 0);
    }

    #[test]
    fn hardened_stack_is_clean() {
        let report = evaluate(&hardened_stack(), &RuleRegistry::builtin().view());
        assert!(
            report.is_clean(),
            "unexpected findings: {:?}",
            report
                .findings()
                .iter()
                .map(|f| (&f.rule_id, f.resource_id.as_str()))
                .collect::<Vec<_>>()
        );
    }
}
