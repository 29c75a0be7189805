//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Report determinism under reordered graph construction
//! - Parallel and sequential evaluation agreeing
//! - Reachability terminating on arbitrary (cyclic) graphs
//! - Category views partitioning the finding set

use crate::engine::{EvaluationOptions, evaluate, evaluate_with};
use crate::graph::ResourceGraph;
use crate::model::{RelationKind, Resource, ResourceKind, Retention};
use crate::registry::RuleRegistry;
use crate::test_support::{Edge, any_ipv4, env, healthcare_fixture, patterns, phi};
use proptest::prelude::*;
use stackguard_types::{Category, Severity};
use std::collections::BTreeSet;

// ============================================================================
// Strategies for generating arbitrary graphs
// ============================================================================

const RELATIONS: [RelationKind; 8] = [
    RelationKind::MemberOf,
    RelationKind::Secures,
    RelationKind::AttachedPolicy,
    RelationKind::Reads,
    RelationKind::Writes,
    RelationKind::Exposes,
    RelationKind::LogsTo,
    RelationKind::EncryptedWith,
];

/// A schema-valid resource whose risky settings are driven by `flags`.
fn resource_from(i: usize, kind: ResourceKind, flags: [bool; 3]) -> Resource {
    let r = Resource::new(format!("r{i}"), kind);
    let r = if flags[2] { phi(r) } else { r };
    match kind {
        ResourceKind::Network => r.with("flowLogsEnabled", flags[1]),
        ResourceKind::Subnet => r.with("subnetType", if flags[0] { "public" } else { "private" }),
        ResourceKind::SecurityGroup => {
            if flags[0] {
                r.with("ingress", vec![any_ipv4(5432), any_ipv4(80)])
            } else {
                r
            }
        }
        ResourceKind::Database => r
            .with("encrypted", flags[0])
            .with("publiclyAccessible", flags[1]),
        ResourceKind::ObjectStore => r.with("encrypted", flags[0]).with("versioned", flags[1]),
        ResourceKind::ComputeFunction => {
            if flags[0] {
                r.with("environment", env(&[("DB_PASSWORD", "hunter22")]))
            } else {
                r
            }
        }
        ResourceKind::VirtualMachine => r.with("volumeEncrypted", flags[0]),
        ResourceKind::ApiEndpoint => {
            r.with("authorizationType", if flags[0] { "none" } else { "iam" })
        }
        ResourceKind::LogGroup => r.with(
            "retention",
            if flags[0] {
                Retention::Infinite
            } else {
                Retention::Days(30)
            },
        ),
        ResourceKind::Key => r.with("rotationEnabled", flags[0]),
        ResourceKind::IdentityPolicy => r.with(
            "actions",
            patterns(if flags[0] { &["*"] } else { &["s3:GetObject"] }),
        ),
        ResourceKind::Credential => r.with("exported", flags[0]),
    }
}

fn arb_graph() -> impl Strategy<Value = ResourceGraph> {
    (1usize..16)
        .prop_flat_map(|n| {
            (
                prop::collection::vec((0..ResourceKind::ALL.len(), any::<[bool; 3]>()), n),
                prop::collection::vec((0..n, 0..n, 0..RELATIONS.len()), 0..(n * 3)),
            )
        })
        .prop_map(|(nodes, edges)| {
            let mut b = ResourceGraph::builder();
            for (i, (kind, flags)) in nodes.into_iter().enumerate() {
                b.add_resource(resource_from(i, ResourceKind::ALL[kind], flags))
                    .unwrap();
            }
            for (from, to, rel) in edges {
                b.add_relationship(&format!("r{from}"), &format!("r{to}"), RELATIONS[rel])
                    .unwrap();
            }
            b.build()
        })
}

fn build(resources: Vec<Resource>, edges: &[Edge]) -> ResourceGraph {
    crate::test_support::graph(resources, edges)
}

/// Identity of a finding that does not depend on construction order.
fn summary_key(report: &crate::report::Report) -> Vec<(Severity, String, String, String)> {
    report
        .findings()
        .iter()
        .map(|f| {
            (
                f.severity,
                f.rule_id.clone(),
                f.resource_id.to_string(),
                f.message.clone(),
            )
        })
        .collect()
}

/// Naive fixed-point closure: every resource with a `kind` path into `target`.
fn ancestors(graph: &ResourceGraph, target: &str, kind: RelationKind) -> BTreeSet<String> {
    let mut found: BTreeSet<String> = BTreeSet::new();
    let mut frontier = vec![target.to_string()];
    while let Some(id) = frontier.pop() {
        for rel in graph.relationships() {
            if rel.kind == kind && rel.to.as_str() == id && found.insert(rel.from.to_string()) {
                frontier.push(rel.from.to_string());
            }
        }
    }
    found
}

// ============================================================================
// Engine properties
// ============================================================================

proptest! {
    /// Reordering resource and relationship insertion does not change the report.
    #[test]
    fn report_is_independent_of_insertion_order(
        resources in Just(healthcare_fixture().resources).prop_shuffle(),
        edges in Just(healthcare_fixture().edges).prop_shuffle(),
    ) {
        let view = RuleRegistry::builtin().view();
        let baseline = evaluate(&healthcare_fixture().build(), &view);
        let shuffled = evaluate(&build(resources, &edges), &view);

        prop_assert_eq!(summary_key(&baseline), summary_key(&shuffled));
    }

    /// Parallel scheduling is an implementation detail.
    #[test]
    fn parallel_evaluation_matches_sequential(graph in arb_graph()) {
        let view = RuleRegistry::builtin().view();
        let seq = evaluate(&graph, &view);
        let par = evaluate_with(&graph, &view, EvaluationOptions::parallel());
        prop_assert_eq!(seq, par);
    }

    /// Repeated evaluation of the same graph is byte-identical.
    #[test]
    fn repeated_evaluation_is_identical(graph in arb_graph()) {
        let view = RuleRegistry::builtin().view();
        let a = serde_json::to_string(&evaluate(&graph, &view)).unwrap();
        let b = serde_json::to_string(&evaluate(&graph, &view)).unwrap();
        prop_assert_eq!(a, b);
    }

    /// No two findings share a (rule, resource) pair and order is severity-first.
    #[test]
    fn findings_are_unique_and_sorted(graph in arb_graph()) {
        let report = evaluate(&graph, &RuleRegistry::builtin().view());
        let mut pairs = BTreeSet::new();
        for f in report.findings() {
            prop_assert!(pairs.insert((f.rule_id.clone(), f.resource_id.clone())));
        }
        for pair in report.findings().windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
        }
    }

    /// Category views partition the report.
    #[test]
    fn category_views_partition_the_report(graph in arb_graph()) {
        let registry = RuleRegistry::builtin();
        let report = evaluate(&graph, &registry.view());

        let mut union = Vec::new();
        for category in registry.categories() {
            union.extend(report.by_category(category).cloned());
        }
        prop_assert_eq!(report.by_category(Category::Engine).count(), 0);
        prop_assert_eq!(union.len(), report.len());
        for f in report.findings() {
            prop_assert!(union.contains(f));
        }
    }
}

// ============================================================================
// Graph properties
// ============================================================================

proptest! {
    /// Backward reachability terminates on cycles and agrees with a naive closure.
    #[test]
    fn reachability_matches_naive_closure(
        graph in arb_graph(),
        start in 0usize..16,
        target in 0usize..16,
        rel in 0..RELATIONS.len(),
    ) {
        let start = format!("r{}", start % graph.len());
        let target = format!("r{}", target % graph.len());
        let kind = RELATIONS[rel];

        let expected = ancestors(&graph, &start, kind);
        let reachable = graph.is_reachable_from(&start, kind, |r| r.id.as_str() == target);
        prop_assert_eq!(reachable, target != start && expected.contains(&target));

        if let Some(found) = graph.reachable_from(&start, kind, |_| true) {
            prop_assert!(found.id.as_str() != start);
            prop_assert!(expected.contains(found.id.as_str()));
        }
    }
}
