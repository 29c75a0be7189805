use crate::error::RegistryError;
use crate::model::ResourceKind;
use crate::policy::RuleSelection;
use crate::rule::Rule;
use crate::rules;
use globset::{Glob, GlobSet, GlobSetBuilder};
use stackguard_types::{Category, ResourceId, Severity};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Catalog of known rules, in registration order.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    ids: BTreeSet<&'static str>,
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.id()))
            .finish()
    }
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in rule.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for rule in rules::builtin_rules() {
            registry
                .register(rule)
                .expect("built-in rule ids are unique");
        }
        registry
    }

    pub fn register<R: Rule + 'static>(&mut self, rule: R) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(rule))
    }

    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) -> Result<(), RegistryError> {
        let id = rule.id();
        if !self.ids.insert(id) {
            return Err(RegistryError::DuplicateRuleId { id: id.to_string() });
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.id() == id).map(|r| r.as_ref())
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Rules inspecting `kind`, in registration order.
    pub fn rules_for(&self, kind: ResourceKind) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules().filter(move |r| r.applies_to(kind))
    }

    pub fn categories(&self) -> BTreeSet<Category> {
        self.rules.iter().map(|r| r.meta().category).collect()
    }

    /// Unrestricted view over every registered rule.
    pub fn view(&self) -> RegistryView {
        RegistryView {
            profile: "default".to_string(),
            rules: self.rules.clone(),
            severity_overrides: BTreeMap::new(),
            allow: BTreeMap::new(),
        }
    }

    /// Restricted view for a partial or adjusted scan. The registry itself is not modified.
    pub fn filter(&self, selection: &RuleSelection) -> Result<RegistryView, RegistryError> {
        let mut rules = Vec::new();
        let mut severity_overrides = BTreeMap::new();
        let mut allow = BTreeMap::new();

        for rule in &self.rules {
            let meta = rule.meta();
            if !selection.includes(meta) {
                continue;
            }
            if let Some(policy) = selection.rule_policy(meta.id) {
                if let Some(severity) = policy.severity {
                    severity_overrides.insert(meta.id, severity);
                }
                if let Some(set) = build_allowlist(meta.id, &policy.allow)? {
                    allow.insert(meta.id, set);
                }
            }
            rules.push(Arc::clone(rule));
        }

        Ok(RegistryView {
            profile: selection.profile.clone(),
            rules,
            severity_overrides,
            allow,
        })
    }
}

fn build_allowlist(rule_id: &str, patterns: &[String]) -> Result<Option<GlobSet>, RegistryError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let invalid = |pattern: &str| RegistryError::InvalidAllowPattern {
        rule_id: rule_id.to_string(),
        pattern: pattern.to_string(),
    };

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // Treat allowlist entries as glob patterns over resource ids (case-sensitive).
        builder.add(Glob::new(pattern).map_err(|_| invalid(pattern))?);
    }
    builder
        .build()
        .map(Some)
        .map_err(|_| invalid(&patterns.join(",")))
}

/// An immutable, possibly restricted snapshot of the registry used for one evaluation.
#[derive(Clone)]
pub struct RegistryView {
    profile: String,
    rules: Vec<Arc<dyn Rule>>,
    severity_overrides: BTreeMap<&'static str, Severity>,
    allow: BTreeMap<&'static str, GlobSet>,
}

impl fmt::Debug for RegistryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryView")
            .field("profile", &self.profile)
            .field(
                "rules",
                &self.rules.iter().map(|r| r.id()).collect::<Vec<_>>(),
            )
            .field("severity_overrides", &self.severity_overrides)
            .finish()
    }
}

impl RegistryView {
    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, rule_id: &str) -> bool {
        self.rules.iter().any(|r| r.id() == rule_id)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Arc<dyn Rule>> + '_ {
        self.rules.iter()
    }

    /// Rules inspecting `kind`, in registration order.
    pub fn rules_for(&self, kind: ResourceKind) -> impl Iterator<Item = &Arc<dyn Rule>> + '_ {
        self.rules.iter().filter(move |r| r.applies_to(kind))
    }

    pub fn categories(&self) -> BTreeSet<Category> {
        self.rules.iter().map(|r| r.meta().category).collect()
    }

    pub fn severity_override(&self, rule_id: &str) -> Option<Severity> {
        self.severity_overrides.get(rule_id).copied()
    }

    pub fn is_allowed(&self, rule_id: &str, resource_id: &ResourceId) -> bool {
        self.allow
            .get(rule_id)
            .map(|set| set.is_match(resource_id.as_str()))
            .unwrap_or(false)
    }
}
