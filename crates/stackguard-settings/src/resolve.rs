use crate::{model::StackguardConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use stackguard_domain::policy::RuleSelection;
use stackguard_types::{Category, Severity, all_rule_ids};
use std::time::Duration;

/// Values supplied by the caller (flags, environment) that beat the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub fail_on: Option<String>,
    pub parallel: Option<bool>,
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub selection: RuleSelection,
    pub fail_on: Severity,
    pub parallel: bool,
    pub timeout: Option<Duration>,
}

pub fn resolve_config(
    cfg: StackguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());

    let Some(preset) = presets::preset(&profile) else {
        anyhow::bail!(
            "unknown profile: {profile} (expected {})",
            presets::PROFILES.join("|")
        );
    };
    let mut selection = preset.selection;

    // Categories replace the profile's selection wholesale.
    if let Some(categories) = cfg.categories.as_ref() {
        let parsed = categories
            .iter()
            .map(|c| parse_category(c))
            .collect::<anyhow::Result<Vec<_>>>()
            .context("invalid categories")?;
        selection.categories = Some(parsed.into_iter().collect());
    }

    for rule_id in &cfg.exclude {
        ensure_known_rule(rule_id).context("invalid exclude entry")?;
        selection.excluded.insert(rule_id.clone());
    }

    // per-rule overrides
    for (rule_id, rc) in cfg.rules.iter() {
        ensure_known_rule(rule_id)?;
        let entry = selection.rules.entry(rule_id.clone()).or_default();

        if let Some(enabled) = rc.enabled {
            entry.enabled = Some(enabled);
        }
        if let Some(sev) = rc.severity.as_deref() {
            entry.severity = Some(
                parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?,
            );
        }
        if !rc.allow.is_empty() {
            validate_allowlist(rule_id, &rc.allow)?;
            entry.allow.extend(rc.allow.iter().cloned());
        }
    }

    let fail_on = match overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        Some(v) => parse_severity(v).context("invalid fail_on")?,
        None => preset.fail_on,
    };

    let parallel = overrides.parallel.or(cfg.parallel).unwrap_or(false);
    let timeout = overrides
        .timeout_ms
        .or(cfg.timeout_ms)
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis);

    Ok(ResolvedConfig {
        selection,
        fail_on,
        parallel,
        timeout,
    })
}

fn ensure_known_rule(rule_id: &str) -> anyhow::Result<()> {
    if all_rule_ids().contains(&rule_id) {
        Ok(())
    } else {
        anyhow::bail!("unknown rule id: {rule_id}")
    }
}

fn validate_allowlist(rule_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {rule_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_category(v: &str) -> anyhow::Result<Category> {
    Category::parse(v)
        .filter(|c| *c != Category::Engine)
        .with_context(|| {
            format!(
                "unknown category: {v} (expected encryption|network|identity|audit|resilience)"
            )
        })
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "critical" => Ok(Severity::Critical),
        "high" => Ok(Severity::High),
        "medium" => Ok(Severity::Medium),
        "low" => Ok(Severity::Low),
        other => anyhow::bail!("unknown severity: {other} (expected critical|high|medium|low)"),
    }
}
