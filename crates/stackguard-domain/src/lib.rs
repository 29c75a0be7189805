//! Pure policy evaluation over a normalized resource graph (no IO).
//!
//! Input: a [`ResourceGraph`] built elsewhere and a [`RegistryView`] of rules.
//! Output: a deterministic [`Report`] of findings plus summary counters.

#![forbid(unsafe_code)]

pub mod error;
pub mod graph;
pub mod model;
pub mod policy;
pub mod registry;
pub mod report;
pub mod rule;
pub mod rules;
pub mod schema;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{EvaluationOptions, evaluate, evaluate_with, plan};
pub use error::{GraphError, RegistryError, RuleError, SchemaViolation};
pub use fingerprint::fingerprint_for_finding;
pub use graph::{GraphBuilder, Relationship, ResourceGraph};
pub use model::{
    IngressRule, IngressSource, Pattern, PropertyValue, RelationKind, Resource, ResourceKind,
    Retention,
};
pub use policy::{RulePolicy, RuleSelection};
pub use registry::{RegistryView, RuleRegistry};
pub use report::{Report, ScanSummary};
pub use rule::{FnRule, Rule, RuleFn, RuleMeta};
