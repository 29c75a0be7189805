use crate::rule::RuleMeta;
use stackguard_types::{Category, Severity};
use std::collections::{BTreeMap, BTreeSet};

/// Per-rule adjustments layered over the registry defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RulePolicy {
    /// `Some(true)` forces the rule on even when its category is not selected;
    /// `Some(false)` turns it off.
    pub enabled: Option<bool>,
    /// Replaces the severity of every finding the rule emits.
    pub severity: Option<Severity>,
    /// Glob patterns over resource ids whose findings are suppressed.
    pub allow: Vec<String>,
}

impl RulePolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            ..Self::default()
        }
    }

    pub fn with_severity(severity: Severity) -> Self {
        Self {
            severity: Some(severity),
            ..Self::default()
        }
    }
}

/// Which rules take part in a scan and how their findings are adjusted.
///
/// This is the only configuration the engine consumes; it is produced by the
/// settings layer (profiles + config) or built directly by callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSelection {
    pub profile: String,
    /// Enabled categories; `None` selects every category.
    pub categories: Option<BTreeSet<Category>>,
    pub excluded: BTreeSet<String>,
    pub rules: BTreeMap<String, RulePolicy>,
}

impl Default for RuleSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl RuleSelection {
    pub fn all() -> Self {
        Self {
            profile: "default".to_string(),
            categories: None,
            excluded: BTreeSet::new(),
            rules: BTreeMap::new(),
        }
    }

    pub fn only_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: Some(categories.into_iter().collect()),
            ..Self::all()
        }
    }

    pub fn exclude(mut self, rule_id: &str) -> Self {
        self.excluded.insert(rule_id.to_string());
        self
    }

    pub fn override_severity(mut self, rule_id: &str, severity: Severity) -> Self {
        self.rules.entry(rule_id.to_string()).or_default().severity = Some(severity);
        self
    }

    pub fn allow(mut self, rule_id: &str, pattern: &str) -> Self {
        self.rules
            .entry(rule_id.to_string())
            .or_default()
            .allow
            .push(pattern.to_string());
        self
    }

    pub fn rule_policy(&self, rule_id: &str) -> Option<&RulePolicy> {
        self.rules.get(rule_id)
    }

    /// Whether a rule takes part in evaluation.
    ///
    /// Exclusion always wins; an explicit per-rule `enabled` beats the category filter.
    pub fn includes(&self, meta: &RuleMeta) -> bool {
        if self.excluded.contains(meta.id) {
            return false;
        }
        if let Some(enabled) = self.rule_policy(meta.id).and_then(|p| p.enabled) {
            return enabled;
        }
        self.categories
            .as_ref()
            .map(|c| c.contains(&meta.category))
            .unwrap_or(true)
    }
}
