use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable schema identifier for stackguard configuration files.
pub const SCHEMA_CONFIG_V1: &str = "stackguard.config.v1";

/// `stackguard.toml` schema v1.
///
/// This is a *user-facing* config model: values stay as strings here and are
/// validated during resolution, so error messages can name the offending key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StackguardConfigV1 {
    /// Optional schema string for tooling (`stackguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `production` (default), `development` or `audit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Restrict evaluation to these categories. Replaces the profile's selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,

    /// Rule ids that never run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Lowest severity that turns the verdict into `violations`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Evaluate independent rules in parallel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,

    /// Wall-clock budget for one scan, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Map of rule_id -> config.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Override the profile's enable/disable. `true` also beats the category filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override severity: `critical`, `high`, `medium`, `low`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Glob patterns over resource ids whose findings are suppressed.
    #[serde(default)]
    pub allow: Vec<String>,
}
