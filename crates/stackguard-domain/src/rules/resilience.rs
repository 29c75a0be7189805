use super::utils::{finding, label};
use crate::graph::ResourceGraph;
use crate::model::ResourceKind;
use crate::rule::{FnRule, RuleMeta};
use serde_json::json;
use stackguard_types::{Category, Finding, Severity, ids};

const BACKUP_RETENTION: RuleMeta = RuleMeta {
    id: ids::RULE_RESILIENCE_BACKUP_RETENTION,
    category: Category::Resilience,
    severity: Severity::High,
    applies_to: &[ResourceKind::Database],
    remediation: "Enable automated backups with a retention period of at least 7 days.",
};

const DELETION_PROTECTION: RuleMeta = RuleMeta {
    id: ids::RULE_RESILIENCE_DELETION_PROTECTION,
    category: Category::Resilience,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::Database, ResourceKind::ObjectStore],
    remediation: "Retain or snapshot the resource on stack deletion and enable deletion protection.",
};

const MULTI_AZ: RuleMeta = RuleMeta {
    id: ids::RULE_RESILIENCE_MULTI_AZ,
    category: Category::Resilience,
    severity: Severity::Low,
    applies_to: &[ResourceKind::Database],
    remediation: "Run the database across multiple availability zones.",
};

const ENDPOINT_THROTTLING: RuleMeta = RuleMeta {
    id: ids::RULE_RESILIENCE_ENDPOINT_THROTTLING,
    category: Category::Resilience,
    severity: Severity::Low,
    applies_to: &[ResourceKind::ApiEndpoint],
    remediation: "Configure rate and burst throttling limits.",
};

const FUNCTION_TIMEOUT: RuleMeta = RuleMeta {
    id: ids::RULE_RESILIENCE_FUNCTION_TIMEOUT,
    category: Category::Resilience,
    severity: Severity::Low,
    applies_to: &[ResourceKind::ComputeFunction],
    remediation: "Lower the timeout to what a single request needs; move long work to a queue.",
};

/// Longest timeout accepted for a request-serving function.
pub const MAX_FUNCTION_TIMEOUT_SECONDS: i64 = 300;

pub fn rules() -> Vec<FnRule> {
    vec![
        FnRule::new(BACKUP_RETENTION, backup_retention),
        FnRule::new(DELETION_PROTECTION, deletion_protection),
        FnRule::new(MULTI_AZ, multi_az),
        FnRule::new(ENDPOINT_THROTTLING, endpoint_throttling),
        FnRule::new(FUNCTION_TIMEOUT, function_timeout),
    ]
}

fn backup_retention(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for db in graph.resources_of_kind(ResourceKind::Database) {
        let days = db.int_prop("backupRetentionDays").unwrap_or(0);
        if days > 0 {
            continue;
        }
        let mut f = finding(meta, db, format!("{} has no automated backups", label(db)));
        f.data = json!({ "backup_retention_days": db.int_prop("backupRetentionDays") });
        out.push(f);
    }
}

fn deletion_protection(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for kind in meta.applies_to {
        for resource in graph.resources_of_kind(*kind) {
            let mut reasons = Vec::new();
            if resource.text_prop("removalPolicy") == Some("destroy") {
                reasons.push("removal policy destroys it with the stack");
            }
            match resource.kind {
                ResourceKind::Database
                    if resource.bool_prop("deletionProtection") != Some(true) =>
                {
                    reasons.push("deletion protection is off");
                }
                ResourceKind::ObjectStore
                    if resource.bool_prop("autoDeleteObjects") == Some(true) =>
                {
                    reasons.push("objects are deleted automatically");
                }
                _ => {}
            }
            if reasons.is_empty() {
                continue;
            }
            let mut f = finding(
                meta,
                resource,
                format!(
                    "{} can be deleted with its data: {}",
                    label(resource),
                    reasons.join("; ")
                ),
            );
            f.data = json!({ "reasons": reasons });
            out.push(f);
        }
    }
}

fn multi_az(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for db in graph.resources_of_kind(ResourceKind::Database) {
        if db.bool_prop("multiAz") != Some(true) {
            out.push(finding(
                meta,
                db,
                format!("{} runs in a single availability zone", label(db)),
            ));
        }
    }
}

fn endpoint_throttling(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for endpoint in graph.resources_of_kind(ResourceKind::ApiEndpoint) {
        if endpoint.int_prop("throttlingRateLimit").is_none() {
            out.push(finding(
                meta,
                endpoint,
                format!("{} has no throttling limits", label(endpoint)),
            ));
        }
    }
}

fn function_timeout(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for func in graph.resources_of_kind(ResourceKind::ComputeFunction) {
        let Some(seconds) = func.int_prop("timeoutSeconds") else {
            continue;
        };
        if seconds <= MAX_FUNCTION_TIMEOUT_SECONDS {
            continue;
        }
        let mut f = finding(
            meta,
            func,
            format!(
                "{} may run for {seconds} seconds per invocation",
                label(func)
            ),
        );
        f.data = json!({
            "timeout_seconds": seconds,
            "limit_seconds": MAX_FUNCTION_TIMEOUT_SECONDS,
        });
        out.push(f);
    }
}
