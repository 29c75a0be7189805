use stackguard_domain::policy::RuleSelection;
use stackguard_types::{Category, Severity, ids};

pub const DEFAULT_PROFILE: &str = "production";
pub const PROFILES: &[&str] = &["production", "development", "audit"];

/// A profile's rule selection plus its default verdict threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    pub selection: RuleSelection,
    pub fail_on: Severity,
}

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into the config file.
pub fn preset(profile: &str) -> Option<Preset> {
    let preset = match profile {
        "production" => production_profile(),
        "development" => development_profile(),
        "audit" => audit_profile(),
        _ => return None,
    };
    Some(preset)
}

fn named(mut selection: RuleSelection, profile: &str) -> RuleSelection {
    selection.profile = profile.to_string();
    selection
}

fn production_profile() -> Preset {
    Preset {
        selection: named(RuleSelection::all(), "production"),
        fail_on: Severity::Low,
    }
}

fn development_profile() -> Preset {
    // Sandboxes are often reachable on purpose; keep those findings visible
    // but out of the failing range, and skip availability concerns.
    let selection = RuleSelection::only_categories(
        Category::RULE_CATEGORIES
            .into_iter()
            .filter(|c| *c != Category::Resilience),
    )
    .override_severity(ids::RULE_NETWORK_PUBLICLY_ACCESSIBLE, Severity::Medium)
    .override_severity(ids::RULE_NETWORK_OPEN_INGRESS, Severity::Medium);

    Preset {
        selection: named(selection, "development"),
        fail_on: Severity::High,
    }
}

fn audit_profile() -> Preset {
    Preset {
        selection: named(
            RuleSelection::only_categories([Category::Audit, Category::Encryption]),
            "audit",
        ),
        fail_on: Severity::Medium,
    }
}
