use crate::error::RuleError;
use crate::graph::ResourceGraph;
use crate::model::ResourceKind;
use stackguard_types::{Category, Finding, Severity};
use std::fmt;

/// Static description of a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleMeta {
    /// Stable namespaced id, e.g. `encryption.storage-at-rest`.
    pub id: &'static str,
    pub category: Category,
    /// Default severity. Rules may raise or lower it per finding (e.g. for
    /// sensitive resources); a registry view may override it.
    pub severity: Severity,
    /// Resource kinds the rule inspects.
    pub applies_to: &'static [ResourceKind],
    /// Short actionable remediation carried into every finding.
    pub remediation: &'static str,
}

/// A pure check over the whole graph.
///
/// Implementations must be deterministic and free of I/O: the same graph in
/// yields the same findings out.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn evaluate(&self, graph: &ResourceGraph) -> Result<Vec<Finding>, RuleError>;

    fn id(&self) -> &'static str {
        self.meta().id
    }

    fn applies_to(&self, kind: ResourceKind) -> bool {
        self.meta().applies_to.contains(&kind)
    }
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("id", &self.id()).finish()
    }
}

/// Signature of the built-in rule bodies.
pub type RuleFn = fn(&RuleMeta, &ResourceGraph, &mut Vec<Finding>);

/// A rule backed by a plain function. All built-in rules are `FnRule`s.
#[derive(Clone)]
pub struct FnRule {
    meta: RuleMeta,
    run: RuleFn,
}

impl FnRule {
    pub fn new(meta: RuleMeta, run: RuleFn) -> Self {
        Self { meta, run }
    }
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("meta", &self.meta).finish()
    }
}

impl Rule for FnRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn evaluate(&self, graph: &ResourceGraph) -> Result<Vec<Finding>, RuleError> {
        let mut out = Vec::new();
        (self.run)(&self.meta, graph, &mut out);
        Ok(out)
    }
}
