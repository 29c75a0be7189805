//! Public facade over the stackguard engine.
//!
//! Build a [`ResourceGraph`], pick the rules with a [`RuleSelection`], and
//! evaluate:
//!
//! ```
//! use stackguard::{Resource, ResourceGraph, ResourceKind, RuleRegistry, RuleSelection, evaluate};
//!
//! let mut builder = ResourceGraph::builder();
//! builder
//!     .add_resource(Resource::new("Orders", ResourceKind::Database).with("encrypted", false))
//!     .unwrap();
//! let graph = builder.build();
//!
//! let view = RuleRegistry::builtin()
//!     .filter(&RuleSelection::only_categories([stackguard::Category::Encryption]))
//!     .unwrap();
//! let report = evaluate(&graph, &view);
//! assert_eq!(report.findings()[0].rule_id, "encryption.storage-at-rest");
//! ```

#![forbid(unsafe_code)]

pub use stackguard_domain::{
    EvaluationOptions, FnRule, GraphBuilder, GraphError, IngressRule, IngressSource, Pattern,
    PropertyValue, RegistryError, RegistryView, RelationKind, Relationship, Report, Resource,
    ResourceGraph, ResourceKind, Retention, Rule, RuleError, RuleFn, RuleMeta, RulePolicy,
    RuleRegistry, RuleSelection, ScanSummary, SchemaViolation, evaluate, evaluate_with, plan,
};
pub use stackguard_types::{
    Category, Finding, ResourceId, Severity, SeverityCounts, Verdict, ids, lookup_explanation,
};

/// Evaluate every built-in rule against `graph`.
pub fn evaluate_builtin(graph: &ResourceGraph) -> Report {
    evaluate(graph, &RuleRegistry::builtin().view())
}
