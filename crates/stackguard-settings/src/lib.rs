//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{RuleConfig, SCHEMA_CONFIG_V1, StackguardConfigV1};
pub use presets::{DEFAULT_PROFILE, PROFILES, Preset, preset};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `stackguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<StackguardConfigV1> {
    let cfg: StackguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the rule selection used by the engine (profile + overrides + per-rule config).
pub fn resolve_config(
    cfg: StackguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
